//! 系统通知
//!
//! 每次发送前都重新检查权限：未授权时请求一次，仍被拒绝则静默丢弃。
//! 权限状态不做缓存。

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use serde::Serialize;

use crate::error::{ViewError, ViewResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
    Prompt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NotifyIcon {
    #[serde(rename = "dialog-information")]
    Information,
    #[serde(rename = "dialog-error")]
    Error,
}

impl NotifyIcon {
    pub fn as_str(self) -> &'static str {
        match self {
            NotifyIcon::Information => "dialog-information",
            NotifyIcon::Error => "dialog-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: NotifyIcon,
    pub auto_cancel: bool,
}

/// 宿主侧的通知能力
#[async_trait]
pub trait NotificationHost: Send + Sync {
    async fn permission_granted(&self) -> bool;
    async fn request_permission(&self) -> PermissionState;
    async fn show(&self, notification: Notification) -> Result<(), String>;
}

pub struct Notifier {
    host: Arc<dyn NotificationHost>,
    title: String,
}

impl Notifier {
    pub fn new(host: Arc<dyn NotificationHost>, title: impl Into<String>) -> Self {
        Self {
            host,
            title: title.into(),
        }
    }

    async fn check_permission(&self) -> bool {
        if self.host.permission_granted().await {
            return true;
        }
        self.host.request_permission().await == PermissionState::Granted
    }

    /// 发送通知；权限被拒绝时返回 `PermissionDenied`，调用方不需要处理
    pub async fn send(&self, body: impl Into<String>, icon: NotifyIcon) -> ViewResult<()> {
        if !self.check_permission().await {
            debug!("没有通知权限，丢弃通知");
            return Err(ViewError::PermissionDenied);
        }

        let notification = Notification {
            title: self.title.clone(),
            body: body.into(),
            icon,
            auto_cancel: true,
        };
        self.host.show(notification).await.map_err(|message| {
            warn!("发送通知失败: {}", message);
            ViewError::Transport {
                command: "notification",
                message,
            }
        })
    }
}
