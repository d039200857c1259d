//! KeqingLauncher 视图层核心
//!
//! - [`view`]：从后端多个集合聚合出渲染用的视图模型
//! - [`coordinator`]：根据后端推送的移动事件驱动界面状态、通知和防退出信号
//!
//! 后端命令、通知和宿主信号都通过 trait 注入；启用 `desktop` 特性后
//! [`desktop`] 模块提供基于 Tauri 的实现。

pub mod backend;
pub mod config;
pub mod coordinator;
pub mod entity;
pub mod error;
pub mod utils;
pub mod view;

#[cfg(feature = "desktop")]
pub mod desktop;

pub use backend::{BackendClient, BackendEvent, LauncherBackend};
pub use config::{CoordinatorConfig, ViewConfig};
pub use coordinator::{HostSignals, OperationCoordinator, OperationState, PanelState, RawEvent};
pub use error::{ViewError, ViewResult};
pub use utils::notify::{NotificationHost, Notifier};
pub use view::{AggregationReport, Aggregator, Stage, ViewModel};
