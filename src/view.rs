//! 视图模型聚合
//!
//! 从仓库、manifest、游戏清单、安装四个后端集合重建一份一致的视图模型。

pub mod aggregator;
pub mod enrich;
pub mod model;
pub mod settings;

pub use aggregator::{AggregationReport, Aggregator, Stage, StageFault};
pub use model::{SharedViewModel, ViewModel};
pub use settings::InstallSettingChange;
