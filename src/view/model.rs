use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

use crate::entity::prelude::*;

/// 渲染层读取的视图模型（派生数据，不持久化）
///
/// 各阶段独立写入，读者可能看到部分更新后的状态。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewModel {
    /// 已补全 `manifest_*` 字段的游戏清单
    pub games: Vec<GameManifest>,
    pub repos: Vec<Repository>,
    pub installs: Vec<InstallRecord>,
    /// 当前选中游戏（manifest 记录 ID）
    pub current_game: Option<String>,
    pub current_install: Option<String>,
    pub display_name: Option<String>,
    pub background: Option<String>,
    pub global_settings: Option<GlobalSettings>,
    /// 当前安装的完整设置，按需拉取
    pub install_settings: Option<InstallSettings>,
}

pub type SharedViewModel = Arc<RwLock<ViewModel>>;

impl ViewModel {
    pub fn game_by_biz(&self, biz: &str) -> Option<&GameManifest> {
        self.games.iter().find(|g| g.biz == biz)
    }

    pub fn install_by_id(&self, id: &str) -> Option<&InstallRecord> {
        self.installs.iter().find(|i| i.id == id)
    }

    /// 替换游戏列表；当前选择的游戏不在新列表中时一并清空选择
    pub(crate) fn replace_games(&mut self, games: Vec<GameManifest>) {
        self.games = games;
        let selected = self.current_game.as_deref();
        let still_listed = selected.is_some_and(|id| {
            self.games
                .iter()
                .any(|g| g.manifest_id.as_deref() == Some(id))
        });
        if selected.is_some() && !still_listed {
            self.clear_selection();
        }
    }

    pub(crate) fn clear_selection(&mut self) {
        self.current_game = None;
        self.display_name = None;
        self.background = None;
    }

    /// 把某个游戏设为当前选择（名称、背景一并切换）
    pub(crate) fn apply_selection(&mut self, game: &GameManifest) {
        self.current_game = game.manifest_id.clone();
        self.display_name = Some(game.display_name.clone());
        self.background = Some(game.assets.game_background.clone());
    }
}
