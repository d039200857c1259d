//! 类型化的后端客户端
//!
//! 空结果策略按命令类型统一：
//! - 列表命令：`null` 和 `[]` 都返回 `ViewError::EmptyResult`，由调用方当作空集合
//! - 单对象命令：`null` 返回 `Ok(None)`
//! - 更新命令：`null` 视为未生效，返回 `ViewError::EmptyResult`

use std::sync::Arc;

use log::debug;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::command::{self, LauncherBackend};
use crate::entity::prelude::*;
use crate::error::{ViewError, ViewResult};

#[derive(Clone)]
pub struct BackendClient {
    backend: Arc<dyn LauncherBackend>,
}

impl BackendClient {
    pub fn new(backend: Arc<dyn LauncherBackend>) -> Self {
        Self { backend }
    }

    async fn call(&self, command: &'static str, args: Value) -> ViewResult<Option<String>> {
        debug!("invoke {} {}", command, args);
        self.backend
            .invoke(command, args)
            .await
            .map_err(|message| ViewError::Transport { command, message })
    }

    async fn fetch_one<T: DeserializeOwned>(
        &self,
        command: &'static str,
        args: Value,
    ) -> ViewResult<Option<T>> {
        match self.call(command, args).await? {
            None => Ok(None),
            Some(raw) => decode(command, &raw).map(Some),
        }
    }

    async fn fetch_rows<T: DeserializeOwned>(
        &self,
        command: &'static str,
        args: Value,
    ) -> ViewResult<Vec<T>> {
        let rows: Vec<T> = self
            .fetch_one(command, args)
            .await?
            .ok_or(ViewError::EmptyResult { command })?;
        if rows.is_empty() {
            return Err(ViewError::EmptyResult { command });
        }
        Ok(rows)
    }

    async fn update(&self, command: &'static str, args: Value) -> ViewResult<()> {
        self.call(command, args)
            .await?
            .map(|_| ())
            .ok_or(ViewError::EmptyResult { command })
    }

    // ==================== 列表 ====================

    pub async fn list_repositories(&self) -> ViewResult<Vec<Repository>> {
        self.fetch_rows(command::LIST_REPOSITORIES, json!({})).await
    }

    pub async fn list_manifests_by_repository_id(
        &self,
        repository_id: &str,
    ) -> ViewResult<Vec<ManifestRecord>> {
        self.fetch_rows(
            command::LIST_MANIFESTS_BY_REPOSITORY_ID,
            json!({ "repositoryId": repository_id }),
        )
        .await
    }

    pub async fn list_game_manifests(&self) -> ViewResult<Vec<GameManifest>> {
        self.fetch_rows(command::LIST_GAME_MANIFESTS, json!({})).await
    }

    pub async fn list_installs(&self) -> ViewResult<Vec<InstallRecord>> {
        self.fetch_rows(command::LIST_INSTALLS, json!({})).await
    }

    // ==================== 单对象 ====================

    pub async fn list_settings(&self) -> ViewResult<Option<GlobalSettings>> {
        self.fetch_one(command::LIST_SETTINGS, json!({})).await
    }

    pub async fn get_game_manifest_by_manifest_id(
        &self,
        manifest_id: &str,
    ) -> ViewResult<Option<GameManifest>> {
        self.fetch_one(
            command::GET_GAME_MANIFEST_BY_MANIFEST_ID,
            json!({ "id": manifest_id }),
        )
        .await
    }

    pub async fn get_install_by_id(&self, id: &str) -> ViewResult<Option<InstallSettings>> {
        self.fetch_one(command::GET_INSTALL_BY_ID, json!({ "id": id }))
            .await
    }

    // ==================== 更新 ====================

    pub async fn update_settings_launcher_action(&self, action: &str) -> ViewResult<()> {
        self.update(
            command::UPDATE_SETTINGS_LAUNCHER_ACTION,
            json!({ "action": action }),
        )
        .await
    }

    pub async fn update_install_fps_value(&self, fps: &str, id: &str) -> ViewResult<()> {
        self.update(
            command::UPDATE_INSTALL_FPS_VALUE,
            json!({ "fps": fps, "id": id }),
        )
        .await
    }

    pub async fn update_install_runner_version(&self, version: &str, id: &str) -> ViewResult<()> {
        self.update(
            command::UPDATE_INSTALL_RUNNER_VERSION,
            json!({ "version": version, "id": id }),
        )
        .await
    }

    pub async fn update_install_dxvk_version(&self, version: &str, id: &str) -> ViewResult<()> {
        self.update(
            command::UPDATE_INSTALL_DXVK_VERSION,
            json!({ "version": version, "id": id }),
        )
        .await
    }

    pub async fn update_install_env_vars(&self, env_vars: &str, id: &str) -> ViewResult<()> {
        self.update(
            command::UPDATE_INSTALL_ENV_VARS,
            json!({ "envVars": env_vars, "id": id }),
        )
        .await
    }

    pub async fn update_install_pre_launch_cmd(&self, cmd: &str, id: &str) -> ViewResult<()> {
        self.update(
            command::UPDATE_INSTALL_PRE_LAUNCH_CMD,
            json!({ "cmd": cmd, "id": id }),
        )
        .await
    }

    pub async fn update_install_launch_cmd(&self, cmd: &str, id: &str) -> ViewResult<()> {
        self.update(
            command::UPDATE_INSTALL_LAUNCH_CMD,
            json!({ "cmd": cmd, "id": id }),
        )
        .await
    }
}

fn decode<T: DeserializeOwned>(command: &'static str, raw: &str) -> ViewResult<T> {
    serde_json::from_str(raw).map_err(|e| ViewError::Decode {
        command,
        message: e.to_string(),
    })
}
