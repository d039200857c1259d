//! 全局设置 JSON 结构体

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_game_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xxmi_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps_unlock_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jadeite_path: Option<String>,
    pub third_party_repo_updates: bool,
    /// 启动游戏后启动器的行为（如 `exit`、`minimize`、`keep`）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launcher_action: Option<String>,
}
