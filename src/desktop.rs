//! Tauri 宿主集成
//!
//! 以插件形式接入宿主应用：
//! - 把后端发出的移动/遥测事件转发给协调器
//! - 将防退出信号和面板状态发给前端，并在移动期间拦截窗口关闭与应用退出
//! - 用 tauri-plugin-notification 发送系统通知
//! - 提供读取视图模型、刷新、选择等命令

use std::sync::Arc;

use async_trait::async_trait;
use log::{error, info, warn};
use serde::Serialize;
use serde_json::Value;
use tauri::plugin::{Builder, TauriPlugin};
use tauri::{AppHandle, Emitter, Listener, Manager, RunEvent, Runtime, State, WindowEvent};
use tauri_plugin_log::{Target, TargetKind, TimezoneStrategy};
use tauri_plugin_notification::{NotificationExt, PermissionState as TauriPermission};
use tokio::sync::mpsc;

use crate::backend::LauncherBackend;
use crate::backend::events::{MOVE_COMPLETE, MOVE_PROGRESS, PREVENT_EXIT, TELEMETRY_BLOCK};
use crate::config::ViewConfig;
use crate::coordinator::{HostSignals, OperationCoordinator, PanelState, RawEvent};
use crate::utils::logs::{self, LogLevel};
use crate::utils::notify::{Notification, NotificationHost, Notifier, PermissionState};
use crate::view::{AggregationReport, Aggregator, InstallSettingChange, ViewModel};

/// 面板状态变化时发给前端的事件
pub const PANEL_STATE: &str = "panel_state";
/// 视图模型刷新完成时发给前端的事件
pub const VIEW_MODEL_CHANGED: &str = "view_model_changed";

// ==================== 宿主实现 ====================

struct TauriHost<R: Runtime> {
    app: AppHandle<R>,
}

impl<R: Runtime> HostSignals for TauriHost<R> {
    fn prevent_exit(&self, prevent: bool) {
        if let Err(e) = self.app.emit(PREVENT_EXIT, prevent) {
            error!("无法发送 {} 事件: {}", PREVENT_EXIT, e);
        }
    }

    fn panel_changed(&self, panel: &PanelState) {
        if let Err(e) = self.app.emit(PANEL_STATE, panel) {
            warn!("无法发送 {} 事件: {}", PANEL_STATE, e);
        }
    }
}

struct TauriNotifications<R: Runtime> {
    app: AppHandle<R>,
}

#[async_trait]
impl<R: Runtime> NotificationHost for TauriNotifications<R> {
    async fn permission_granted(&self) -> bool {
        matches!(
            self.app.notification().permission_state(),
            Ok(TauriPermission::Granted)
        )
    }

    async fn request_permission(&self) -> PermissionState {
        match self.app.notification().request_permission() {
            Ok(TauriPermission::Granted) => PermissionState::Granted,
            Ok(TauriPermission::Denied) => PermissionState::Denied,
            Ok(_) => PermissionState::Prompt,
            Err(e) => {
                warn!("请求通知权限失败: {}", e);
                PermissionState::Denied
            }
        }
    }

    async fn show(&self, notification: Notification) -> Result<(), String> {
        self.app
            .notification()
            .builder()
            .title(notification.title)
            .body(notification.body)
            .icon(notification.icon.as_str())
            .auto_cancel()
            .show()
            .map_err(|e| e.to_string())
    }
}

// ==================== 插件状态 ====================

/// 注册到 Tauri 状态管理中的视图层
pub struct ViewState {
    pub aggregator: Arc<Aggregator>,
    pub coordinator: OperationCoordinator,
}

/// 聚合结果摘要（发给前端）
#[derive(Debug, Serialize)]
pub struct RefreshSummary {
    pub faults: Vec<String>,
    pub empty: usize,
}

impl From<AggregationReport> for RefreshSummary {
    fn from(report: AggregationReport) -> Self {
        Self {
            faults: report
                .faults
                .iter()
                .map(|f| format!("{:?}: {}", f.stage, f.error))
                .collect(),
            empty: report.empty.len(),
        }
    }
}

fn emit_view_model<R: Runtime>(app: &AppHandle<R>, aggregator: &Aggregator) {
    if let Err(e) = app.emit(VIEW_MODEL_CHANGED, aggregator.snapshot()) {
        warn!("无法发送 {} 事件: {}", VIEW_MODEL_CHANGED, e);
    }
}

// ==================== 命令 ====================

#[tauri::command]
fn get_view_model(state: State<'_, ViewState>) -> ViewModel {
    state.aggregator.snapshot()
}

#[tauri::command]
async fn refresh_view<R: Runtime>(
    app: AppHandle<R>,
    state: State<'_, ViewState>,
) -> Result<RefreshSummary, String> {
    let report = state.aggregator.refresh().await;
    emit_view_model(&app, &state.aggregator);
    Ok(report.into())
}

#[tauri::command]
fn select_game(state: State<'_, ViewState>, biz: String) -> Result<ViewModel, String> {
    if !state.aggregator.select_game(&biz) {
        return Err(format!("游戏 {} 不存在", biz));
    }
    let view = state.aggregator.snapshot();
    if let Some(install) = &view.current_install {
        state.coordinator.focus_install(install);
    }
    Ok(view)
}

#[tauri::command]
fn select_install(state: State<'_, ViewState>, id: String) -> Result<ViewModel, String> {
    if !state.aggregator.select_install(&id) {
        return Err(format!("安装 {} 不存在", id));
    }
    state.coordinator.focus_install(&id);
    Ok(state.aggregator.snapshot())
}

#[tauri::command]
fn get_panel_state(state: State<'_, ViewState>) -> PanelState {
    state.coordinator.panel()
}

#[tauri::command]
async fn get_install_preload(
    state: State<'_, ViewState>,
    id: String,
) -> Result<Option<Value>, String> {
    state
        .aggregator
        .preload_for_install(&id)
        .await
        .map_err(|e| format!("查询预下载信息失败: {}", e))
}

#[tauri::command]
async fn set_launcher_action(
    state: State<'_, ViewState>,
    action: String,
) -> Result<ViewModel, String> {
    state
        .aggregator
        .set_launcher_action(&action)
        .await
        .map_err(|e| format!("更新启动器行为失败: {}", e))?;
    Ok(state.aggregator.snapshot())
}

#[tauri::command]
async fn update_install_setting(
    state: State<'_, ViewState>,
    id: String,
    change: InstallSettingChange,
) -> Result<ViewModel, String> {
    state
        .aggregator
        .update_install_setting(&id, change)
        .await
        .map_err(|e| format!("更新安装设置失败: {}", e))?;
    Ok(state.aggregator.snapshot())
}

#[tauri::command]
fn set_view_log_level(level: String) -> Result<(), String> {
    logs::set_view_log_level(&level)
}

#[tauri::command]
fn get_view_log_level() -> LogLevel {
    logs::get_view_log_level()
}

// ==================== 插件 ====================

/// 日志插件（开发环境同时输出到标准输出和日志目录）
pub fn log_plugin<R: Runtime>() -> TauriPlugin<R> {
    let builder = tauri_plugin_log::Builder::default()
        .timezone_strategy(TimezoneStrategy::UseLocal)
        .level(log::LevelFilter::Debug); // 允许运行时动态调整到任意级别

    if cfg!(debug_assertions) {
        builder
            .targets([
                Target::new(TargetKind::LogDir {
                    file_name: Some("view-debug".into()),
                }),
                Target::new(TargetKind::Stdout),
            ])
            .build()
    } else {
        builder.build()
    }
}

/// 视图层插件
///
/// 宿主需要同时注册 `tauri_plugin_notification::init()`。
pub fn init<R: Runtime>(backend: Arc<dyn LauncherBackend>, config: ViewConfig) -> TauriPlugin<R> {
    Builder::<R>::new("keqing-view")
        .invoke_handler(tauri::generate_handler![
            get_view_model,
            refresh_view,
            select_game,
            select_install,
            get_panel_state,
            get_install_preload,
            set_launcher_action,
            update_install_setting,
            set_view_log_level,
            get_view_log_level,
        ])
        .setup(move |app, _api| {
            log::set_max_level(config.log_level.to_filter());

            let notifier = Notifier::new(
                Arc::new(TauriNotifications { app: app.clone() }),
                config.notification_title.clone(),
            );
            let coordinator = OperationCoordinator::new(
                config.coordinator.clone(),
                Arc::new(TauriHost { app: app.clone() }),
                notifier,
            );
            let aggregator = Arc::new(Aggregator::new(backend));

            // 转发后端事件
            let (tx, rx) = mpsc::unbounded_channel::<RawEvent>();
            for name in [MOVE_PROGRESS, MOVE_COMPLETE, TELEMETRY_BLOCK] {
                let tx = tx.clone();
                app.listen_any(name, move |event| {
                    if tx.send(RawEvent::new(name, event.payload())).is_err() {
                        warn!("协调器已停止，丢弃事件 {}", name);
                    }
                });
            }

            let runner = coordinator.clone();
            tauri::async_runtime::spawn(async move { runner.run(rx).await });

            // 挂载时执行一次完整聚合
            let handle = app.clone();
            let initial = aggregator.clone();
            tauri::async_runtime::spawn(async move {
                let report = initial.refresh().await;
                if !report.is_clean() {
                    warn!("首次聚合存在 {} 个错误", report.faults.len());
                }
                emit_view_model(&handle, &initial);
            });

            app.manage(ViewState {
                aggregator,
                coordinator,
            });
            info!("视图层插件初始化完成");
            Ok(())
        })
        .on_event(|app, event| {
            let blocked = app
                .try_state::<ViewState>()
                .is_some_and(|state| state.coordinator.exit_blocked());
            if !blocked {
                return;
            }
            match event {
                RunEvent::ExitRequested { api, .. } => {
                    warn!("文件移动进行中，阻止应用退出");
                    api.prevent_exit();
                }
                RunEvent::WindowEvent {
                    event: WindowEvent::CloseRequested { api, .. },
                    ..
                } => {
                    warn!("文件移动进行中，阻止关闭窗口");
                    api.prevent_close();
                }
                _ => {}
            }
        })
        .build()
}
