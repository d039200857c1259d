use chrono::{DateTime, Local};
use serde::Serialize;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationState {
    #[default]
    Idle,
    Busy,
}

/// 单个安装的移动操作记录
#[derive(Debug, Default)]
pub(crate) struct Operation {
    pub state: OperationState,
    pub install_name: String,
    pub install_type: String,
    pub label: String,
    pub percent: u8,
    pub started_at: Option<DateTime<Local>>,
    /// 忙碌窗口序号，每次进入 Busy 递增；过期的定时任务据此自行退出
    pub window: u64,
    pub ticker: Option<JoinHandle<()>>,
}

impl Operation {
    pub fn is_busy(&self) -> bool {
        self.state == OperationState::Busy
    }

    pub fn matches(&self, install_name: &str, install_type: &str) -> bool {
        self.install_name == install_name && self.install_type == install_type
    }

    pub fn stop_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }

    pub fn snapshot(&self, install_id: &str) -> OperationSnapshot {
        OperationSnapshot {
            install_id: install_id.to_string(),
            state: self.state,
            install_name: self.install_name.clone(),
            install_type: self.install_type.clone(),
            label: self.label.clone(),
            percent: self.percent,
            started_at: self.started_at,
        }
    }
}

/// 对外暴露的只读快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationSnapshot {
    pub install_id: String,
    pub state: OperationState,
    pub install_name: String,
    pub install_type: String,
    pub label: String,
    pub percent: u8,
    pub started_at: Option<DateTime<Local>>,
}
