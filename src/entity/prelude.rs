//! 预导入模块
//!
//! 提供常用类型的快捷导入。

pub use super::game_manifest::{GameAssets, GameExtra, GameManifest};
pub use super::install::{InstallRecord, InstallSettings};
pub use super::manifest::ManifestRecord;
pub use super::repository::Repository;
pub use super::settings::GlobalSettings;
