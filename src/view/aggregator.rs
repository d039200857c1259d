//! 聚合流水线
//!
//! 阶段依赖：
//! 1. 仓库列表必须先于 manifest 拉取完成
//! 2. 每个仓库的 manifest 并发拉取，各自独立写回
//! 3. 所有仓库结束后只拉取一次全局游戏清单并补全
//! 4. 安装列表、全局设置与上述流程并行
//!
//! 每个阶段自行捕获并记录错误，不回滚已经完成的阶段。

use std::sync::Arc;

use futures::future::join_all;
use log::{debug, error, info, warn};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;

use super::enrich::{enrich, enrich_available, select_initial};
use super::model::{SharedViewModel, ViewModel};
use crate::backend::{BackendClient, LauncherBackend};
use crate::entity::prelude::*;
use crate::error::{ViewError, ViewResult};

/// 流水线阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Repositories,
    Manifests,
    GameManifests,
    Enrichment,
    Installs,
    Settings,
}

/// 某个阶段的故障
#[derive(Debug, Clone, PartialEq)]
pub struct StageFault {
    pub stage: Stage,
    /// 故障范围（如仓库 ID），全局阶段为 `None`
    pub scope: Option<String>,
    pub error: ViewError,
}

/// 一次聚合的诊断结果
///
/// 空结果与故障分开记录：空结果按空集合处理，不算故障。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationReport {
    pub faults: Vec<StageFault>,
    pub empty: Vec<Stage>,
}

impl AggregationReport {
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }

    pub fn has_fault(&self, stage: Stage) -> bool {
        self.faults.iter().any(|f| f.stage == stage)
    }

    pub fn is_empty_stage(&self, stage: Stage) -> bool {
        self.empty.contains(&stage)
    }

    fn merge(&mut self, other: AggregationReport) {
        self.faults.extend(other.faults);
        self.empty.extend(other.empty);
    }

    fn fault(&mut self, stage: Stage, scope: Option<&str>, error: ViewError) {
        match scope {
            Some(scope) => error!("[{:?}] {} ({})", stage, error, scope),
            None => error!("[{:?}] {}", stage, error),
        }
        self.faults.push(StageFault {
            stage,
            scope: scope.map(str::to_string),
            error,
        });
    }

    /// 统一的空结果策略：空结果 -> 空集合，其余错误 -> 故障
    fn settle<T>(
        &mut self,
        stage: Stage,
        scope: Option<&str>,
        result: ViewResult<Vec<T>>,
    ) -> Option<Vec<T>> {
        match result {
            Ok(rows) => Some(rows),
            Err(ViewError::EmptyResult { command }) => {
                debug!("{} 没有返回数据，按空集合处理", command);
                self.empty.push(stage);
                Some(Vec::new())
            }
            Err(e) => {
                self.fault(stage, scope, e);
                None
            }
        }
    }
}

/// 视图模型聚合器
pub struct Aggregator {
    pub(crate) client: BackendClient,
    pub(crate) view: SharedViewModel,
}

impl Aggregator {
    pub fn new(backend: Arc<dyn LauncherBackend>) -> Self {
        Self {
            client: BackendClient::new(backend),
            view: Arc::new(RwLock::new(ViewModel::default())),
        }
    }

    /// 共享视图模型（渲染层只读）
    pub fn view(&self) -> SharedViewModel {
        self.view.clone()
    }

    pub fn snapshot(&self) -> ViewModel {
        self.view.read().clone()
    }

    // ==================== 完整刷新 ====================

    /// 完整执行一次聚合流水线
    pub async fn refresh(&self) -> AggregationReport {
        let (catalog, installs, settings) = tokio::join!(
            self.refresh_catalog(),
            self.load_installs(),
            self.load_settings_stage(),
        );

        let mut report = catalog;
        report.merge(installs);
        report.merge(settings);

        if report.is_clean() {
            info!("视图模型聚合完成");
        } else {
            warn!("视图模型聚合完成，但有 {} 个阶段出错", report.faults.len());
        }
        report
    }

    /// 仓库 -> manifest -> 游戏清单
    pub async fn refresh_catalog(&self) -> AggregationReport {
        let mut report = AggregationReport::default();

        let Some(repos) = self.load_repositories(&mut report).await else {
            return report;
        };

        let (records, complete) = self.load_all_manifests(&repos, &mut report).await;

        if records.is_empty() {
            debug!("没有可用的 manifest 记录，清空游戏列表");
            self.view.write().replace_games(Vec::new());
            return report;
        }

        report.merge(self.load_game_manifests(&records, complete).await);
        report
    }

    // ==================== 各阶段 ====================

    async fn load_repositories(&self, report: &mut AggregationReport) -> Option<Vec<Repository>> {
        let result = self.client.list_repositories().await;
        let repos = report.settle(Stage::Repositories, None, result)?;

        info!("已加载 {} 个仓库", repos.len());
        let repos: Vec<Repository> = repos
            .into_iter()
            .map(|mut r| {
                r.manifests.clear();
                r
            })
            .collect();
        self.view.write().repos = repos.clone();
        Some(repos)
    }

    /// 并发拉取所有仓库的 manifest，全部结束后返回合并列表（仓库顺序）
    ///
    /// 第二个返回值表示是否所有仓库都拉取成功。
    async fn load_all_manifests(
        &self,
        repos: &[Repository],
        report: &mut AggregationReport,
    ) -> (Vec<ManifestRecord>, bool) {
        let fetches = repos.iter().map(|repo| async move {
            let result = self.load_manifests_for(repo).await;
            (repo.id.as_str(), result)
        });

        let mut records = Vec::new();
        let mut complete = true;
        for (repo_id, result) in join_all(fetches).await {
            match report.settle(Stage::Manifests, Some(repo_id), result) {
                Some(rows) => records.extend(rows),
                None => complete = false,
            }
        }
        (records, complete)
    }

    /// 拉取单个仓库的 manifest 并立即写回该仓库
    pub async fn load_manifests_for(&self, repo: &Repository) -> ViewResult<Vec<ManifestRecord>> {
        let rows = self
            .client
            .list_manifests_by_repository_id(&repo.id)
            .await?;

        debug!("仓库 {} 返回 {} 条 manifest", repo.id, rows.len());
        let mut view = self.view.write();
        if let Some(target) = view.repos.iter_mut().find(|r| r.id == repo.id) {
            target.manifests = rows.clone();
        }
        Ok(rows)
    }

    /// 拉取全局游戏清单并用 manifest 记录补全
    ///
    /// `manifests_complete` 为 `false` 时说明有仓库拉取失败，找不到记录的游戏
    /// 只会被跳过；否则任何一个游戏缺少记录都会让整批补全失败。
    pub async fn load_game_manifests(
        &self,
        records: &[ManifestRecord],
        manifests_complete: bool,
    ) -> AggregationReport {
        let mut report = AggregationReport::default();

        let result = self.client.list_game_manifests().await;
        let Some(games) = report.settle(Stage::GameManifests, None, result) else {
            return report;
        };

        let enriched = if manifests_complete {
            match enrich(games, records) {
                Ok(enriched) => enriched,
                // 保留上一次成功的游戏列表
                Err(e) => {
                    report.fault(Stage::Enrichment, None, e);
                    return report;
                }
            }
        } else {
            enrich_available(games, records)
        };

        let mut view = self.view.write();
        view.replace_games(enriched);
        if select_initial(&mut view) {
            info!(
                "初始选择游戏: {}",
                view.current_game.as_deref().unwrap_or_default()
            );
        }
        report
    }

    /// 拉取安装列表，不影响当前选择
    pub async fn load_installs(&self) -> AggregationReport {
        let mut report = AggregationReport::default();
        let result = self.client.list_installs().await;
        if let Some(installs) = report.settle(Stage::Installs, None, result) {
            debug!("已加载 {} 个安装", installs.len());
            self.view.write().installs = installs;
        }
        report
    }

    async fn load_settings_stage(&self) -> AggregationReport {
        let mut report = AggregationReport::default();
        match self.refresh_settings().await {
            Ok(()) => {}
            Err(e @ ViewError::EmptyResult { .. }) => {
                debug!("{}", e);
                report.empty.push(Stage::Settings);
            }
            Err(e) => report.fault(Stage::Settings, None, e),
        }
        report
    }

    // ==================== 用户选择 ====================

    /// 选中侧边栏中的游戏，同时切换到该游戏的第一个安装
    pub fn select_game(&self, biz: &str) -> bool {
        let mut view = self.view.write();
        let Some(game) = view.game_by_biz(biz).cloned() else {
            warn!("选择的游戏 '{}' 不存在", biz);
            return false;
        };
        view.apply_selection(&game);

        let install = game.manifest_id.as_deref().and_then(|manifest_id| {
            view.installs
                .iter()
                .find(|i| i.manifest_id == manifest_id)
                .map(|i| i.id.clone())
        });
        if view.current_install != install {
            view.install_settings = None;
        }
        view.current_install = install;
        true
    }

    /// 选中某个安装
    pub fn select_install(&self, install_id: &str) -> bool {
        let mut view = self.view.write();
        let Some(install) = view.install_by_id(install_id).cloned() else {
            warn!("选择的安装 '{}' 不存在", install_id);
            return false;
        };
        if view.current_install.as_deref() != Some(install_id) {
            view.install_settings = None;
        }
        view.current_install = Some(install.id);
        view.background = Some(install.game_background);
        true
    }

    // ==================== 按需查询 ====================

    /// 查询安装对应游戏清单的预下载信息
    ///
    /// 安装和游戏清单之间只在这里通过 `manifest_id` 按需连接。
    pub async fn preload_for_install(&self, install_id: &str) -> ViewResult<Option<Value>> {
        let manifest_id = self
            .view
            .read()
            .install_by_id(install_id)
            .map(|i| i.manifest_id.clone());
        let Some(manifest_id) = manifest_id else {
            warn!("查询预下载时找不到安装 '{}'", install_id);
            return Ok(None);
        };

        let manifest = self
            .client
            .get_game_manifest_by_manifest_id(&manifest_id)
            .await?;
        Ok(manifest.and_then(|m| m.extra.preload))
    }
}
