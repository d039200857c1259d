use serde::{Deserialize, Serialize};

/// 已安装游戏（侧边栏和启动按钮使用的精简视图）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallRecord {
    pub id: String,
    pub manifest_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub game_icon: String,
    #[serde(default)]
    pub game_background: String,
}

/// 单个安装的完整设置（`get_install_by_id`）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallSettings {
    pub id: String,
    pub manifest_id: String,
    pub version: String,
    pub name: String,
    pub directory: String,
    pub runner_path: String,
    pub dxvk_path: String,
    pub runner_version: String,
    pub dxvk_version: String,
    pub runner_prefix: String,
    pub game_icon: String,
    pub game_background: String,
    pub ignore_updates: bool,
    pub skip_hash_check: bool,
    pub use_jadeite: bool,
    pub use_xxmi: bool,
    pub use_fps_unlock: bool,
    pub env_vars: String,
    pub pre_launch_command: String,
    pub launch_command: String,
    pub launch_args: String,
    pub fps_value: String,
}
