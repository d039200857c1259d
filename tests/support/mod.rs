//! 集成测试共用的后端桩和宿主桩
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use keqing_launcher_view_lib::coordinator::{HostSignals, PanelState};
use keqing_launcher_view_lib::utils::notify::{
    Notification, NotificationHost, Notifier, PermissionState,
};
use keqing_launcher_view_lib::{CoordinatorConfig, LauncherBackend, OperationCoordinator};
use parking_lot::Mutex;
use serde_json::Value;

// ==================== 后端桩 ====================

#[derive(Clone)]
enum Reply {
    Json(String),
    Null,
    Fail(String),
}

/// 按 `命令` 或 `命令:参数` 返回预设结果，未设置的命令返回 `null`
#[derive(Default)]
pub struct MockBackend {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, key: &str, value: Value) -> &Self {
        self.replies
            .lock()
            .insert(key.to_string(), Reply::Json(value.to_string()));
        self
    }

    pub fn reply_null(&self, key: &str) -> &Self {
        self.replies.lock().insert(key.to_string(), Reply::Null);
        self
    }

    pub fn fail(&self, key: &str, message: &str) -> &Self {
        self.replies
            .lock()
            .insert(key.to_string(), Reply::Fail(message.to_string()));
        self
    }

    pub fn calls_to(&self, command: &str) -> Vec<Value> {
        self.calls
            .lock()
            .iter()
            .filter(|(c, _)| c == command)
            .map(|(_, args)| args.clone())
            .collect()
    }

    fn key(command: &str, args: &Value) -> String {
        if let Some(repo) = args.get("repositoryId").and_then(Value::as_str) {
            return format!("{}:{}", command, repo);
        }
        if command.starts_with("get_") {
            if let Some(id) = args.get("id").and_then(Value::as_str) {
                return format!("{}:{}", command, id);
            }
        }
        command.to_string()
    }
}

#[async_trait]
impl LauncherBackend for MockBackend {
    async fn invoke(&self, command: &'static str, args: Value) -> Result<Option<String>, String> {
        let key = Self::key(command, &args);
        self.calls.lock().push((command.to_string(), args));
        // 让出一次，模拟异步 IPC
        tokio::task::yield_now().await;
        match self.replies.lock().get(&key).cloned() {
            Some(Reply::Json(raw)) => Ok(Some(raw)),
            Some(Reply::Fail(message)) => Err(message),
            Some(Reply::Null) | None => Ok(None),
        }
    }
}

// ==================== 宿主桩 ====================

#[derive(Default)]
pub struct RecordingHost {
    pub prevent_exit: Mutex<Vec<bool>>,
    pub panels: Mutex<Vec<PanelState>>,
}

impl HostSignals for RecordingHost {
    fn prevent_exit(&self, prevent: bool) {
        self.prevent_exit.lock().push(prevent);
    }

    fn panel_changed(&self, panel: &PanelState) {
        self.panels.lock().push(panel.clone());
    }
}

pub struct FakeNotifications {
    pub granted: bool,
    pub requests: AtomicUsize,
    pub shown: Mutex<Vec<Notification>>,
}

impl FakeNotifications {
    pub fn bodies(&self) -> Vec<String> {
        self.shown.lock().iter().map(|n| n.body.clone()).collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationHost for FakeNotifications {
    async fn permission_granted(&self) -> bool {
        self.granted
    }

    async fn request_permission(&self) -> PermissionState {
        self.requests.fetch_add(1, Ordering::SeqCst);
        PermissionState::Denied
    }

    async fn show(&self, notification: Notification) -> Result<(), String> {
        self.shown.lock().push(notification);
        Ok(())
    }
}

pub struct Harness {
    pub coordinator: OperationCoordinator,
    pub host: Arc<RecordingHost>,
    pub notifications: Arc<FakeNotifications>,
}

pub fn harness(granted: bool) -> Harness {
    let host = Arc::new(RecordingHost::default());
    let notifications = Arc::new(FakeNotifications {
        granted,
        requests: AtomicUsize::new(0),
        shown: Mutex::new(Vec::new()),
    });
    let coordinator = OperationCoordinator::new(
        CoordinatorConfig::default(),
        host.clone(),
        Notifier::new(notifications.clone(), "KeqingLauncher"),
    );
    Harness {
        coordinator,
        host,
        notifications,
    }
}
