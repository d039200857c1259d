//! 后端命令边界
//!
//! 视图层只通过 `invoke(命令名, 参数)` 访问后端，返回值是 JSON 字符串，
//! `None` 表示后端返回了 `null`。

use async_trait::async_trait;
use serde_json::Value;

// ==================== 查询命令 ====================

pub const LIST_REPOSITORIES: &str = "list_repositories";
pub const LIST_MANIFESTS_BY_REPOSITORY_ID: &str = "list_manifests_by_repository_id";
pub const LIST_GAME_MANIFESTS: &str = "list_game_manifests";
pub const LIST_INSTALLS: &str = "list_installs";
pub const LIST_SETTINGS: &str = "list_settings";
pub const GET_GAME_MANIFEST_BY_MANIFEST_ID: &str = "get_game_manifest_by_manifest_id";
pub const GET_INSTALL_BY_ID: &str = "get_install_by_id";

// ==================== 更新命令（成功后刷新所属范围） ====================

pub const UPDATE_SETTINGS_LAUNCHER_ACTION: &str = "update_settings_launcher_action";
pub const UPDATE_INSTALL_FPS_VALUE: &str = "update_install_fps_value";
pub const UPDATE_INSTALL_RUNNER_VERSION: &str = "update_install_runner_version";
pub const UPDATE_INSTALL_DXVK_VERSION: &str = "update_install_dxvk_version";
pub const UPDATE_INSTALL_ENV_VARS: &str = "update_install_env_vars";
pub const UPDATE_INSTALL_PRE_LAUNCH_CMD: &str = "update_install_pre_launch_cmd";
pub const UPDATE_INSTALL_LAUNCH_CMD: &str = "update_install_launch_cmd";

/// 后端命令层
///
/// 实现方负责传输（Tauri IPC、进程内调用或测试桩）。错误以字符串返回，
/// 由 [`BackendClient`](super::BackendClient) 统一归类。
#[async_trait]
pub trait LauncherBackend: Send + Sync {
    async fn invoke(&self, command: &'static str, args: Value) -> Result<Option<String>, String>;
}
