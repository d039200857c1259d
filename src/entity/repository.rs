use serde::{Deserialize, Serialize};

use super::manifest::ManifestRecord;

/// 清单仓库
///
/// `manifests` 由聚合器在拉取完成后填充，后端返回时不包含该字段。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: String,
    #[serde(default)]
    pub github_id: Option<String>,
    #[serde(default)]
    pub manifests: Vec<ManifestRecord>,
}
