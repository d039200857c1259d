//! 移动操作协调器
//!
//! 监听后端推送的 `move_progress` / `move_complete` / `telemetry_block` 事件，
//! 为每个安装维护一个 Idle -> Busy -> Idle 状态机，驱动共享面板、进度动画、
//! 系统通知以及宿主的防退出信号。
//!
//! 两类移动事件经由同一个通道进入同一份共享状态，不依赖模块级全局变量。

mod operation;
mod panel;
mod ticker;

pub use operation::{OperationSnapshot, OperationState};
pub use panel::{HostSignals, PanelState};

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Local;
use log::{debug, info, warn};
use parking_lot::RwLock;
use tokio::sync::mpsc;

use crate::backend::events::{BackendEvent, MoveComplete, MoveProgress, TelemetryBlock};
use crate::config::CoordinatorConfig;
use crate::error::{ViewError, ViewResult};
use crate::utils::notify::{Notifier, NotifyIcon};
use operation::Operation;

/// 完成后面板上显示的文字
pub const MOVE_COMPLETE_LABEL: &str = "Installation move complete!";

/// 原始事件（事件名 + JSON 负载）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub name: String,
    pub payload: String,
}

impl RawEvent {
    pub fn new(name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
        }
    }
}

pub type EventSender = mpsc::UnboundedSender<RawEvent>;

#[derive(Default)]
pub(crate) struct CoordinatorState {
    operations: HashMap<String, Operation>,
    panel: PanelState,
    /// 用户当前查看的安装；为空时面板归第一个进入忙碌的安装
    focus: Option<String>,
    /// 进行中的移动操作数量，大于 0 时阻止退出
    in_flight: usize,
}

pub(crate) struct Shared {
    state: RwLock<CoordinatorState>,
    host: Arc<dyn HostSignals>,
    notifier: Notifier,
    config: CoordinatorConfig,
}

#[derive(Clone)]
pub struct OperationCoordinator {
    shared: Arc<Shared>,
}

impl OperationCoordinator {
    pub fn new(config: CoordinatorConfig, host: Arc<dyn HostSignals>, notifier: Notifier) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: RwLock::new(CoordinatorState::default()),
                host,
                notifier,
                config,
            }),
        }
    }

    // ==================== 事件入口 ====================

    /// 创建事件通道并在后台消费，返回发送端
    pub fn subscribe(&self) -> EventSender {
        let (tx, rx) = mpsc::unbounded_channel();
        let coordinator = self.clone();
        tokio::spawn(async move { coordinator.run(rx).await });
        tx
    }

    /// 按到达顺序逐个处理事件，直到发送端全部关闭
    pub async fn run(&self, mut rx: mpsc::UnboundedReceiver<RawEvent>) {
        while let Some(event) = rx.recv().await {
            if let Err(e) = self.handle_raw(&event.name, &event.payload).await {
                warn!("{}", e);
            }
        }
        debug!("事件通道已关闭，协调器退出");
    }

    pub async fn handle_raw(&self, name: &str, payload: &str) -> ViewResult<()> {
        let event = BackendEvent::parse(name, payload)?;
        self.handle(event).await;
        Ok(())
    }

    pub async fn handle(&self, event: BackendEvent) {
        match event {
            BackendEvent::MoveProgress(progress) => self.on_move_progress(progress).await,
            BackendEvent::MoveComplete(complete) => self.on_move_complete(complete).await,
            BackendEvent::TelemetryBlock(result) => self.on_telemetry_block(result).await,
        }
    }

    // ==================== 移动事件 ====================

    async fn on_move_progress(&self, progress: MoveProgress) {
        let shared = &self.shared;
        let install_id = progress.install_id.clone();

        let (entered, panel, advisory_raised, window) = {
            let mut guard = shared.state.write();
            let state = &mut *guard;

            let op = state.operations.entry(install_id.clone()).or_default();
            op.install_name = progress.install_name;
            op.install_type = progress.install_type;
            op.label = format!("Moving \"{}\"", progress.file);

            let entered = !op.is_busy();
            if entered {
                op.state = OperationState::Busy;
                op.started_at = Some(Local::now());
                op.window += 1;
                op.percent = 0;
            }
            let window = op.window;

            if entered && state.focus.is_none() {
                let owner_busy = state
                    .panel
                    .owner
                    .as_ref()
                    .and_then(|owner| state.operations.get(owner))
                    .is_some_and(Operation::is_busy);
                if !owner_busy {
                    state.panel.owner = Some(install_id.clone());
                }
            }

            let panel = if state.panel.is_owned_by(&install_id) {
                if entered {
                    state.panel.launch_enabled = false;
                    state.panel.settings_enabled = false;
                    state.panel.progress_visible = true;
                    state.panel.progress_percent = 0;
                }
                if let Some(op) = state.operations.get(&install_id) {
                    state.panel.progress_label = op.label.clone();
                }
                Some(state.panel.clone())
            } else {
                None
            };

            let mut advisory_raised = false;
            if entered {
                state.in_flight += 1;
                advisory_raised = state.in_flight == 1;
            }
            (entered, panel, advisory_raised, window)
        };

        if let Some(panel) = panel {
            shared.host.panel_changed(&panel);
        }
        if !entered {
            return;
        }

        if advisory_raised {
            shared.host.prevent_exit(true);
        }
        info!("安装 {} 开始移动文件（窗口 {}）", install_id, window);

        let handle = ticker::spawn_ticker(shared.clone(), install_id.clone(), window);
        let (install_name, install_type) = {
            let mut state = shared.state.write();
            match state.operations.get_mut(&install_id) {
                Some(op) => {
                    op.ticker = Some(handle);
                    (op.install_name.clone(), op.install_type.clone())
                }
                None => {
                    handle.abort();
                    return;
                }
            }
        };

        self.notify(
            format!(
                "Moving of {}'s {} files started. You can not launch any game until move is completed.",
                install_name, install_type
            ),
            NotifyIcon::Information,
        )
        .await;
    }

    /// 找到完成事件对应的安装：优先使用 `install_id`，否则按名称和类型匹配忙碌中的安装
    fn resolve_completed(state: &CoordinatorState, complete: &MoveComplete) -> Option<String> {
        if let Some(id) = &complete.install_id {
            return state
                .operations
                .get(id)
                .filter(|op| op.is_busy())
                .map(|_| id.clone());
        }
        state
            .operations
            .iter()
            .filter(|(_, op)| op.is_busy() && op.matches(&complete.install_name, &complete.install_type))
            .min_by_key(|(_, op)| op.started_at)
            .map(|(id, _)| id.clone())
    }

    async fn on_move_complete(&self, complete: MoveComplete) {
        let shared = &self.shared;

        let (install_id, panel, advisory_cleared, window) = {
            let mut guard = shared.state.write();
            let state = &mut *guard;

            let Some(install_id) = Self::resolve_completed(state, &complete) else {
                warn!(
                    "收到 {} 的 {} 移动完成事件，但没有对应的进行中操作",
                    complete.install_name, complete.install_type
                );
                return;
            };

            let Some(op) = state.operations.get_mut(&install_id) else {
                return;
            };
            op.state = OperationState::Idle;
            op.label = MOVE_COMPLETE_LABEL.to_string();
            op.percent = 100;
            op.stop_ticker();
            let window = op.window;
            if let Some(started_at) = op.started_at {
                let elapsed = Local::now() - started_at;
                info!(
                    "安装 {} 移动完成，耗时 {} 秒",
                    install_id,
                    elapsed.num_seconds()
                );
            }

            let panel = if state.panel.is_owned_by(&install_id) {
                state.panel.launch_enabled = true;
                state.panel.settings_enabled = true;
                state.panel.progress_label = MOVE_COMPLETE_LABEL.to_string();
                state.panel.progress_percent = 100;
                Some(state.panel.clone())
            } else {
                None
            };

            let was_in_flight = state.in_flight > 0;
            state.in_flight = state.in_flight.saturating_sub(1);
            let advisory_cleared = was_in_flight && state.in_flight == 0;
            (install_id, panel, advisory_cleared, window)
        };

        if let Some(panel) = panel {
            shared.host.panel_changed(&panel);
            ticker::spawn_hide(shared.clone(), install_id.clone(), window);
        }
        // 通知可能要等待权限弹窗，先解除退出限制
        if advisory_cleared {
            shared.host.prevent_exit(false);
        }

        self.notify(
            format!(
                "Moving of {}'s {} files complete. You can now again launch all installed games.",
                complete.install_name, complete.install_type
            ),
            NotifyIcon::Information,
        )
        .await;
    }

    // ==================== 遥测屏蔽 ====================

    async fn on_telemetry_block(&self, result: TelemetryBlock) {
        let (body, icon) = match result {
            TelemetryBlock::Blocked => (
                "Successfully blocked telemetry servers.",
                NotifyIcon::Information,
            ),
            TelemetryBlock::AlreadyBlocked => {
                ("Telemetry servers already blocked.", NotifyIcon::Information)
            }
            TelemetryBlock::Failed => (
                "Failed to block telemetry servers, Please press \"Block telemetry\" in launcher settings!",
                NotifyIcon::Error,
            ),
        };
        info!("遥测屏蔽结果: {:?}", result);
        self.notify(body, icon).await;
    }

    async fn notify(&self, body: impl Into<String>, icon: NotifyIcon) {
        match self.shared.notifier.send(body, icon).await {
            Ok(()) | Err(ViewError::PermissionDenied) => {}
            Err(e) => warn!("{}", e),
        }
    }

    // ==================== 面板与查询 ====================

    /// 切换面板展示的安装（用户在界面上选中了另一个安装）
    pub fn focus_install(&self, install_id: &str) {
        let panel = {
            let mut guard = self.shared.state.write();
            let state = &mut *guard;
            state.focus = Some(install_id.to_string());
            let op = state.operations.get(install_id);
            state.panel.render(install_id, op);
            state.panel.clone()
        };
        self.shared.host.panel_changed(&panel);
    }

    pub fn panel(&self) -> PanelState {
        self.shared.state.read().panel.clone()
    }

    pub fn operation(&self, install_id: &str) -> Option<OperationSnapshot> {
        self.shared
            .state
            .read()
            .operations
            .get(install_id)
            .map(|op| op.snapshot(install_id))
    }

    pub fn state_of(&self, install_id: &str) -> OperationState {
        self.shared
            .state
            .read()
            .operations
            .get(install_id)
            .map(|op| op.state)
            .unwrap_or_default()
    }

    /// 是否仍有进行中的移动（宿主据此决定能否退出）
    pub fn exit_blocked(&self) -> bool {
        self.shared.state.read().in_flight > 0
    }

    pub fn in_flight(&self) -> usize {
        self.shared.state.read().in_flight
    }
}
