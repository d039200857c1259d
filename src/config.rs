//! 视图层配置
//!
//! 所有字段都有默认值，宿主可以只提供需要覆盖的部分。

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::utils::logs::LogLevel;

/// 系统通知的固定标题
pub const NOTIFICATION_TITLE: &str = "KeqingLauncher";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub notification_title: String,
    pub log_level: LogLevel,
    pub coordinator: CoordinatorConfig,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            notification_title: NOTIFICATION_TITLE.to_string(),
            log_level: LogLevel::Error,
            coordinator: CoordinatorConfig::default(),
        }
    }
}

impl ViewConfig {
    /// 从 JSON 读取配置，缺失字段使用默认值
    pub fn from_json(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|e| format!("无效的视图配置: {}", e))
    }
}

/// 移动操作协调器的时间参数（毫秒）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// 进入忙碌状态后多久开始进度动画
    pub ticker_start_delay_ms: u64,
    /// 进度动画每步间隔
    pub tick_interval_ms: u64,
    /// 完成后多久隐藏进度条
    pub hide_delay_ms: u64,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            ticker_start_delay_ms: 300,
            tick_interval_ms: 100,
            hide_delay_ms: 500,
        }
    }
}

impl CoordinatorConfig {
    pub fn ticker_start_delay(&self) -> Duration {
        Duration::from_millis(self.ticker_start_delay_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        // interval 不接受零周期
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_delay_ms)
    }
}
