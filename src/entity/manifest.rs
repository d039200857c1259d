//! manifest 表记录
//!
//! `filename` 去掉扩展名后即业务键 `biz`，用于和游戏清单做连接。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestRecord {
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub enabled: bool,
    /// 仅供展示，连接始终使用 `filename`
    #[serde(default)]
    pub biz: String,
}

impl ManifestRecord {
    /// 连接键：文件名去掉末尾扩展名
    pub fn join_key(&self) -> &str {
        strip_extension(&self.filename)
    }
}

/// 去掉文件名的最后一个扩展名（`genshin.json` -> `genshin`）
pub fn strip_extension(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => filename,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_only_trailing_extension() {
        assert_eq!(strip_extension("genshin.json"), "genshin");
        assert_eq!(strip_extension("hkrpg.global.json"), "hkrpg.global");
        assert_eq!(strip_extension("nap"), "nap");
        assert_eq!(strip_extension(".json"), ".json");
    }

    #[test]
    fn join_key_comes_from_filename() {
        let record: ManifestRecord = serde_json::from_str(
            r#"{"id":"m1","filename":"bh3.json","enabled":true,"biz":"bh3_global"}"#,
        )
        .unwrap();
        assert_eq!(record.join_key(), "bh3");
        assert_eq!(record.display_name, "");
    }
}
