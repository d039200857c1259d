//! 数据实体模块
//!
//! 后端返回的所有 JSON 数据结构，以及聚合后挂在上面的派生字段。

pub mod prelude;

// === 后端集合 ===
pub mod game_manifest;
pub mod install;
pub mod manifest;
pub mod repository;
pub mod settings;
