//! 错误类型
//!
//! 视图层所有阶段共享同一套错误分类。任何错误都不会终止进程，
//! 只会让对应阶段保留旧状态并记录日志。

use thiserror::Error;

/// 视图层错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// 后端返回 `null`（没有任何行）
    #[error("{command} 返回空结果")]
    EmptyResult { command: &'static str },

    /// 游戏清单找不到对应的 manifest 记录
    #[error("游戏清单 '{biz}' 没有匹配的 manifest 记录")]
    JoinFailure { biz: String },

    /// 请求被拒绝或调用失败
    #[error("调用 {command} 失败: {message}")]
    Transport {
        command: &'static str,
        message: String,
    },

    /// 负载无法解析
    #[error("解析 {command} 的返回数据失败: {message}")]
    Decode {
        command: &'static str,
        message: String,
    },

    /// 通知权限被拒绝
    #[error("通知权限被拒绝")]
    PermissionDenied,

    /// 未知事件或无法识别的事件负载
    #[error("无法处理事件 '{event}': {message}")]
    UnknownEvent { event: String, message: String },
}

impl ViewError {
    /// 是否属于空结果（不计为故障）
    pub fn is_empty_result(&self) -> bool {
        matches!(self, ViewError::EmptyResult { .. })
    }
}

pub type ViewResult<T> = Result<T, ViewError>;
