//! 游戏清单补全
//!
//! 纯函数：结果只取决于两份输入，可以安全地重复执行。

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use log::warn;

use super::model::ViewModel;
use crate::entity::prelude::*;
use crate::error::{ViewError, ViewResult};

/// 按连接键索引 manifest 记录，同一个键出现多条记录时取第一条
fn index_records(records: &[ManifestRecord]) -> HashMap<&str, &ManifestRecord> {
    let mut by_key: HashMap<&str, &ManifestRecord> = HashMap::with_capacity(records.len());
    for record in records {
        match by_key.entry(record.join_key()) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(first) => {
                warn!(
                    "manifest 键 '{}' 重复（{} 与 {}），使用第一条记录",
                    record.join_key(),
                    first.get().id,
                    record.id
                );
            }
        }
    }
    by_key
}

fn attach(mut game: GameManifest, record: &ManifestRecord) -> GameManifest {
    game.manifest_id = Some(record.id.clone());
    game.manifest_enabled = Some(record.enabled);
    game.manifest_file = Some(record.filename.clone());
    game
}

/// 用 manifest 记录补全游戏清单
///
/// 连接键为 `filename` 去掉扩展名后与 `biz` 相等。任何一个游戏找不到匹配
/// 记录时整批失败。
pub fn enrich(
    games: Vec<GameManifest>,
    records: &[ManifestRecord],
) -> ViewResult<Vec<GameManifest>> {
    let by_key = index_records(records);
    games
        .into_iter()
        .map(|game| -> ViewResult<GameManifest> {
            let record = by_key
                .get(game.biz.as_str())
                .ok_or_else(|| ViewError::JoinFailure {
                    biz: game.biz.clone(),
                })?;
            Ok(attach(game, record))
        })
        .collect()
}

/// 只补全能找到 manifest 记录的游戏，其余的丢弃
///
/// 用于部分仓库拉取失败的情况：缺失的记录属于失败的仓库，
/// 不应连累其他仓库的游戏。
pub fn enrich_available(
    games: Vec<GameManifest>,
    records: &[ManifestRecord],
) -> Vec<GameManifest> {
    let by_key = index_records(records);
    games
        .into_iter()
        .filter_map(|game| {
            let record = by_key.get(game.biz.as_str()).copied();
            match record {
                Some(record) => Some(attach(game, record)),
                None => {
                    warn!("游戏清单 '{}' 没有匹配的 manifest 记录，暂不显示", game.biz);
                    None
                }
            }
        })
        .collect()
}

/// 初始选择（先写者胜）
///
/// 仅在尚无选择且至少有一个游戏时生效，返回是否发生了选择。
pub fn select_initial(view: &mut ViewModel) -> bool {
    if view.current_game.is_some() {
        return false;
    }
    match view.games.first().cloned() {
        Some(first) => {
            view.apply_selection(&first);
            true
        }
        None => false,
    }
}
