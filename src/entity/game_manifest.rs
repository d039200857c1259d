//! 游戏清单 JSON 结构体
//!
//! 来自 `list_game_manifests`。聚合器会把对应 manifest 记录的
//! `id`/`enabled`/`filename` 写入 `manifest_*` 字段。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameAssets {
    pub game_icon: String,
    pub game_background: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameExtra {
    /// 预下载信息，结构由后端决定
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preload: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameManifest {
    pub biz: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub assets: GameAssets,
    #[serde(default)]
    pub extra: GameExtra,

    // === 聚合时写入的字段 ===
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_file: Option<String>,

    /// 其余字段（版本列表等）原样保留给渲染层
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

