//! 后端推送事件
//!
//! 后端以 `(事件名, JSON 负载)` 的形式推送事件，这里解析为类型化的枚举。

use serde::{Deserialize, Serialize};

use crate::error::{ViewError, ViewResult};

pub const MOVE_PROGRESS: &str = "move_progress";
pub const MOVE_COMPLETE: &str = "move_complete";
pub const TELEMETRY_BLOCK: &str = "telemetry_block";
/// 视图层发往宿主进程的事件
pub const PREVENT_EXIT: &str = "prevent_exit";

/// 移动进度（每个文件一次）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveProgress {
    pub install_id: String,
    pub install_name: String,
    pub install_type: String,
    pub file: String,
}

/// 移动完成
///
/// 后端目前不携带 `install_id`，只给出安装名称和类型。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveComplete {
    #[serde(default)]
    pub install_id: Option<String>,
    pub install_name: String,
    pub install_type: String,
}

/// 屏蔽遥测服务器的结果码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryBlock {
    Failed,
    Blocked,
    AlreadyBlocked,
}

impl TelemetryBlock {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(TelemetryBlock::Failed),
            1 => Some(TelemetryBlock::Blocked),
            2 => Some(TelemetryBlock::AlreadyBlocked),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    MoveProgress(MoveProgress),
    MoveComplete(MoveComplete),
    TelemetryBlock(TelemetryBlock),
}

impl BackendEvent {
    /// 根据事件名解析负载
    pub fn parse(event: &str, payload: &str) -> ViewResult<Self> {
        let bad = |message: String| ViewError::UnknownEvent {
            event: event.to_string(),
            message,
        };

        match event {
            MOVE_PROGRESS => serde_json::from_str(payload)
                .map(BackendEvent::MoveProgress)
                .map_err(|e| bad(e.to_string())),
            MOVE_COMPLETE => serde_json::from_str(payload)
                .map(BackendEvent::MoveComplete)
                .map_err(|e| bad(e.to_string())),
            TELEMETRY_BLOCK => {
                let code: i64 = serde_json::from_str(payload).map_err(|e| bad(e.to_string()))?;
                TelemetryBlock::from_code(code)
                    .map(BackendEvent::TelemetryBlock)
                    .ok_or_else(|| bad(format!("未知结果码 {}", code)))
            }
            _ => Err(bad("未订阅的事件".to_string())),
        }
    }
}
