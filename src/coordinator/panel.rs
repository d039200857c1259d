//! 共享面板
//!
//! 启动按钮、设置按钮和进度条在窗口中只有一份，同一时刻只展示一个安装的状态。

use serde::Serialize;

use super::operation::{Operation, OperationState};

/// 面板当前状态（渲染层只读）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelState {
    /// 面板当前展示的安装
    pub owner: Option<String>,
    pub launch_enabled: bool,
    pub settings_enabled: bool,
    pub progress_visible: bool,
    pub progress_label: String,
    pub progress_percent: u8,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            owner: None,
            launch_enabled: true,
            settings_enabled: true,
            progress_visible: false,
            progress_label: String::new(),
            progress_percent: 0,
        }
    }
}

impl PanelState {
    pub fn is_owned_by(&self, install_id: &str) -> bool {
        self.owner.as_deref() == Some(install_id)
    }

    /// 按某个安装的操作记录重新绘制面板
    pub(crate) fn render(&mut self, install_id: &str, op: Option<&Operation>) {
        self.owner = Some(install_id.to_string());
        match op {
            Some(op) if op.state == OperationState::Busy => {
                self.launch_enabled = false;
                self.settings_enabled = false;
                self.progress_visible = true;
                self.progress_label = op.label.clone();
                self.progress_percent = op.percent;
            }
            _ => {
                self.launch_enabled = true;
                self.settings_enabled = true;
                self.progress_visible = false;
                self.progress_label = op.map(|o| o.label.clone()).unwrap_or_default();
                self.progress_percent = op.map(|o| o.percent).unwrap_or(0);
            }
        }
    }
}

/// 宿主进程信号
pub trait HostSignals: Send + Sync {
    /// 请求宿主在移动期间阻止退出（建议性）
    fn prevent_exit(&self, prevent: bool);

    /// 面板状态变化
    fn panel_changed(&self, _panel: &PanelState) {}
}
