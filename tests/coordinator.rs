mod support;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use keqing_launcher_view_lib::coordinator::MOVE_COMPLETE_LABEL;
use keqing_launcher_view_lib::utils::notify::{
    Notification, NotificationHost, Notifier, NotifyIcon, PermissionState,
};
use keqing_launcher_view_lib::{
    CoordinatorConfig, OperationCoordinator, OperationState, RawEvent, ViewError,
};
use serde_json::json;
use support::{Harness, RecordingHost, harness};
use tokio::sync::Notify;
use tokio::time::sleep;

const STARTED: &str = "Moving of Genshin's game files started. You can not launch any game until move is completed.";
const COMPLETE: &str = "Moving of Genshin's game files complete. You can now again launch all installed games.";

fn progress(id: &str, name: &str, file: &str) -> String {
    json!({
        "install_id": id,
        "install_name": name,
        "install_type": "game",
        "file": file,
    })
    .to_string()
}

fn complete(name: &str) -> String {
    json!({ "install_name": name, "install_type": "game" }).to_string()
}

async fn send(h: &Harness, event: &str, payload: String) {
    h.coordinator.handle_raw(event, &payload).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn single_move_lifecycle() {
    let h = harness(true);

    send(&h, "move_progress", progress("i1", "Genshin", "a")).await;
    assert_eq!(h.coordinator.state_of("i1"), OperationState::Busy);
    let panel = h.coordinator.panel();
    assert_eq!(panel.owner.as_deref(), Some("i1"));
    assert!(!panel.launch_enabled);
    assert!(!panel.settings_enabled);
    assert!(panel.progress_visible);
    assert_eq!(panel.progress_label, "Moving \"a\"");

    send(&h, "move_progress", progress("i1", "Genshin", "b")).await;
    assert_eq!(h.coordinator.state_of("i1"), OperationState::Busy);
    assert_eq!(h.coordinator.panel().progress_label, "Moving \"b\"");
    assert!(h.coordinator.exit_blocked());

    send(&h, "move_complete", complete("Genshin")).await;
    assert_eq!(h.coordinator.state_of("i1"), OperationState::Idle);
    assert!(!h.coordinator.exit_blocked());

    let panel = h.coordinator.panel();
    assert!(panel.launch_enabled);
    assert!(panel.settings_enabled);
    assert_eq!(panel.progress_label, MOVE_COMPLETE_LABEL);
    assert_eq!(panel.progress_percent, 100);
    assert!(panel.progress_visible);

    // 一个忙碌窗口只有一次开始通知和一次完成通知
    assert_eq!(h.notifications.bodies(), vec![STARTED, COMPLETE]);
    assert_eq!(*h.host.prevent_exit.lock(), vec![true, false]);

    sleep(Duration::from_millis(600)).await;
    assert!(!h.coordinator.panel().progress_visible);
}

#[tokio::test(start_paused = true)]
async fn other_install_does_not_touch_busy_owner() {
    let h = harness(true);

    send(&h, "move_progress", progress("i1", "Genshin", "a")).await;
    send(&h, "move_progress", progress("i2", "Star Rail", "x")).await;

    let first = h.coordinator.operation("i1").unwrap();
    assert_eq!(first.label, "Moving \"a\"");
    assert_eq!(h.coordinator.state_of("i2"), OperationState::Busy);
    assert_eq!(h.coordinator.in_flight(), 2);

    let panel = h.coordinator.panel();
    assert_eq!(panel.owner.as_deref(), Some("i1"));
    assert_eq!(panel.progress_label, "Moving \"a\"");

    send(&h, "move_complete", complete("Star Rail")).await;
    assert_eq!(h.coordinator.state_of("i1"), OperationState::Busy);
    assert_eq!(h.coordinator.state_of("i2"), OperationState::Idle);
    // 完成的不是面板所属的安装，面板保持不变
    assert_eq!(h.coordinator.panel().progress_label, "Moving \"a\"");
    assert_eq!(*h.host.prevent_exit.lock(), vec![true]);

    send(&h, "move_complete", complete("Genshin")).await;
    assert_eq!(*h.host.prevent_exit.lock(), vec![true, false]);
    assert!(!h.coordinator.exit_blocked());
}

#[tokio::test(start_paused = true)]
async fn ticker_advances_and_stops_on_completion() {
    let h = harness(true);
    send(&h, "move_progress", progress("i1", "Genshin", "a")).await;

    sleep(Duration::from_millis(200)).await;
    assert_eq!(h.coordinator.operation("i1").unwrap().percent, 0);

    sleep(Duration::from_millis(800)).await;
    let percent = h.coordinator.operation("i1").unwrap().percent;
    assert!(percent > 0 && percent < 100, "percent = {}", percent);
    assert_eq!(h.coordinator.panel().progress_percent, percent);

    send(&h, "move_complete", complete("Genshin")).await;
    sleep(Duration::from_secs(5)).await;
    assert_eq!(h.coordinator.operation("i1").unwrap().percent, 100);
}

#[tokio::test(start_paused = true)]
async fn ticker_never_reaches_completion_on_its_own() {
    let h = harness(true);
    send(&h, "move_progress", progress("i1", "Genshin", "a")).await;

    sleep(Duration::from_secs(30)).await;

    let op = h.coordinator.operation("i1").unwrap();
    assert_eq!(op.state, OperationState::Busy);
    assert_eq!(op.percent, 99);
}

#[tokio::test(start_paused = true)]
async fn restarted_move_keeps_progress_visible() {
    let h = harness(true);
    send(&h, "move_progress", progress("i1", "Genshin", "a")).await;
    send(&h, "move_complete", complete("Genshin")).await;

    sleep(Duration::from_millis(100)).await;
    send(&h, "move_progress", progress("i1", "Genshin", "c")).await;

    // 上一个窗口的隐藏任务不能影响新的窗口
    sleep(Duration::from_millis(600)).await;
    let panel = h.coordinator.panel();
    assert!(panel.progress_visible);
    assert_eq!(panel.progress_label, "Moving \"c\"");
    assert_eq!(*h.host.prevent_exit.lock(), vec![true, false, true]);
    assert_eq!(h.notifications.bodies().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn completion_with_install_id_routes_exactly() {
    let h = harness(true);
    send(&h, "move_progress", progress("i1", "Genshin", "a")).await;
    send(&h, "move_progress", progress("i2", "Genshin", "b")).await;

    let payload = json!({
        "install_id": "i2",
        "install_name": "Genshin",
        "install_type": "game",
    })
    .to_string();
    send(&h, "move_complete", payload).await;

    assert_eq!(h.coordinator.state_of("i1"), OperationState::Busy);
    assert_eq!(h.coordinator.state_of("i2"), OperationState::Idle);
}

#[tokio::test(start_paused = true)]
async fn unmatched_completion_is_ignored() {
    let h = harness(true);
    send(&h, "move_complete", complete("Genshin")).await;

    assert_eq!(h.coordinator.state_of("i1"), OperationState::Idle);
    assert!(h.notifications.bodies().is_empty());
    assert!(h.host.prevent_exit.lock().is_empty());
    assert_eq!(h.coordinator.in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn denied_permission_drops_notifications_only() {
    let h = harness(false);
    send(&h, "move_progress", progress("i1", "Genshin", "a")).await;
    send(&h, "move_complete", complete("Genshin")).await;

    assert!(h.notifications.bodies().is_empty());
    // 每次发送前都重新请求权限
    assert_eq!(h.notifications.request_count(), 2);
    assert_eq!(h.coordinator.state_of("i1"), OperationState::Idle);
    assert_eq!(*h.host.prevent_exit.lock(), vec![true, false]);
}

#[tokio::test]
async fn telemetry_results_are_announced() {
    let h = harness(true);

    h.coordinator.handle_raw("telemetry_block", "1").await.unwrap();
    h.coordinator.handle_raw("telemetry_block", "2").await.unwrap();
    h.coordinator.handle_raw("telemetry_block", "0").await.unwrap();

    let shown = h.notifications.shown.lock();
    assert_eq!(shown.len(), 3);
    assert_eq!(shown[0].body, "Successfully blocked telemetry servers.");
    assert_eq!(shown[0].icon, NotifyIcon::Information);
    assert_eq!(shown[1].body, "Telemetry servers already blocked.");
    assert_eq!(
        shown[2].body,
        "Failed to block telemetry servers, Please press \"Block telemetry\" in launcher settings!"
    );
    assert_eq!(shown[2].icon, NotifyIcon::Error);
    assert!(shown.iter().all(|n| n.title == "KeqingLauncher" && n.auto_cancel));
}

#[tokio::test]
async fn malformed_events_are_rejected() {
    let h = harness(true);

    let err = h
        .coordinator
        .handle_raw("move_progress", r#"{"install_id":"i1"}"#)
        .await
        .unwrap_err();
    assert!(matches!(err, ViewError::UnknownEvent { .. }));
    assert!(h.coordinator.handle_raw("telemetry_block", "5").await.is_err());
    assert_eq!(h.coordinator.in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn focus_switches_panel_owner() {
    let h = harness(true);
    send(&h, "move_progress", progress("i1", "Genshin", "a")).await;

    h.coordinator.focus_install("i2");
    let panel = h.coordinator.panel();
    assert_eq!(panel.owner.as_deref(), Some("i2"));
    assert!(panel.launch_enabled);
    assert!(!panel.progress_visible);

    // 面板不属于 i1 时，i1 的进度不会写到面板上
    send(&h, "move_progress", progress("i1", "Genshin", "b")).await;
    assert_eq!(h.coordinator.panel().owner.as_deref(), Some("i2"));

    h.coordinator.focus_install("i1");
    let panel = h.coordinator.panel();
    assert_eq!(panel.owner.as_deref(), Some("i1"));
    assert!(!panel.launch_enabled);
    assert!(panel.progress_visible);
    assert_eq!(panel.progress_label, "Moving \"b\"");
    assert_eq!(h.host.panels.lock().last(), Some(&panel));
}

#[tokio::test(start_paused = true)]
async fn subscribed_channel_processes_events_in_order() {
    let h = harness(true);
    let tx = h.coordinator.subscribe();

    tx.send(RawEvent::new("move_progress", progress("i1", "Genshin", "a")))
        .unwrap();
    tx.send(RawEvent::new("bogus", "{}")).unwrap();
    tx.send(RawEvent::new("move_complete", complete("Genshin")))
        .unwrap();
    sleep(Duration::from_millis(10)).await;

    assert_eq!(h.coordinator.state_of("i1"), OperationState::Idle);
    assert_eq!(h.notifications.bodies(), vec![STARTED, COMPLETE]);
    assert_eq!(*h.host.prevent_exit.lock(), vec![true, false]);
}

/// 完成通知会一直挂起，直到测试放行
struct SlowCompletionNotice {
    release: Notify,
}

#[async_trait]
impl NotificationHost for SlowCompletionNotice {
    async fn permission_granted(&self) -> bool {
        true
    }

    async fn request_permission(&self) -> PermissionState {
        PermissionState::Granted
    }

    async fn show(&self, notification: Notification) -> Result<(), String> {
        if notification.body.contains("files complete.") {
            self.release.notified().await;
        }
        Ok(())
    }
}

#[tokio::test]
async fn exit_is_allowed_before_completion_notice_is_delivered() {
    let host = Arc::new(RecordingHost::default());
    let notices = Arc::new(SlowCompletionNotice {
        release: Notify::new(),
    });
    let coordinator = OperationCoordinator::new(
        CoordinatorConfig::default(),
        host.clone(),
        Notifier::new(notices.clone(), "KeqingLauncher"),
    );

    coordinator
        .handle_raw("move_progress", &progress("i1", "Genshin", "a"))
        .await
        .unwrap();

    let pending = tokio::spawn({
        let coordinator = coordinator.clone();
        async move {
            coordinator
                .handle_raw("move_complete", &complete("Genshin"))
                .await
        }
    });
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    assert_eq!(*host.prevent_exit.lock(), vec![true, false]);
    assert!(!coordinator.exit_blocked());
    assert!(!pending.is_finished());

    notices.release.notify_one();
    pending.await.unwrap().unwrap();
}
