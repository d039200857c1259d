//! 设置的"更新后刷新"
//!
//! 每个更新命令成功后重新拉取它所属的范围：启动器行为刷新全局设置，
//! 安装相关的设置刷新该安装的完整设置。

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::aggregator::Aggregator;
use crate::error::{ViewError, ViewResult};

/// 单个安装可修改的设置项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InstallSettingChange {
    FpsValue(String),
    RunnerVersion(String),
    DxvkVersion(String),
    EnvVars(String),
    PreLaunchCmd(String),
    LaunchCmd(String),
}

impl Aggregator {
    /// 重新拉取全局设置
    pub async fn refresh_settings(&self) -> ViewResult<()> {
        let settings = self
            .client
            .list_settings()
            .await?
            .ok_or(ViewError::EmptyResult {
                command: crate::backend::command::LIST_SETTINGS,
            })?;
        self.view.write().global_settings = Some(settings);
        Ok(())
    }

    /// 重新拉取某个安装的完整设置
    ///
    /// 只有当它仍是当前安装时才写入视图模型。
    pub async fn refresh_install_settings(&self, install_id: &str) -> ViewResult<()> {
        let settings = self
            .client
            .get_install_by_id(install_id)
            .await?
            .ok_or(ViewError::EmptyResult {
                command: crate::backend::command::GET_INSTALL_BY_ID,
            })?;

        let mut view = self.view.write();
        if view.current_install.as_deref() == Some(install_id) {
            view.install_settings = Some(settings);
        } else {
            debug!("安装 {} 已不是当前安装，丢弃设置结果", install_id);
        }
        Ok(())
    }

    /// 修改启动游戏后启动器的行为
    pub async fn set_launcher_action(&self, action: &str) -> ViewResult<()> {
        self.client.update_settings_launcher_action(action).await?;
        info!("启动器行为已更新为 {}", action);
        self.refresh_settings().await
    }

    /// 修改单个安装的设置
    pub async fn update_install_setting(
        &self,
        install_id: &str,
        change: InstallSettingChange,
    ) -> ViewResult<()> {
        let client = &self.client;
        let result = match &change {
            InstallSettingChange::FpsValue(fps) => {
                client.update_install_fps_value(fps, install_id).await
            }
            InstallSettingChange::RunnerVersion(version) => {
                client.update_install_runner_version(version, install_id).await
            }
            InstallSettingChange::DxvkVersion(version) => {
                client.update_install_dxvk_version(version, install_id).await
            }
            InstallSettingChange::EnvVars(vars) => {
                client.update_install_env_vars(vars, install_id).await
            }
            InstallSettingChange::PreLaunchCmd(cmd) => {
                client.update_install_pre_launch_cmd(cmd, install_id).await
            }
            InstallSettingChange::LaunchCmd(cmd) => {
                client.update_install_launch_cmd(cmd, install_id).await
            }
        };

        if let Err(e) = result {
            warn!("更新安装 {} 的设置失败: {}", install_id, e);
            return Err(e);
        }
        debug!("安装 {} 设置已更新: {:?}", install_id, change);
        self.refresh_install_settings(install_id).await
    }
}
