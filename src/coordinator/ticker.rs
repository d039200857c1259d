//! 面板定时任务
//!
//! 进度动画只是视觉反馈，与实际传输的字节数或文件数无关。

use std::sync::Arc;

use log::debug;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval, sleep};

use super::Shared;

/// 进度动画上限，100% 留给完成事件
const TICKER_MAX_PERCENT: u8 = 99;

/// 启动进度动画：延迟后按固定间隔从 1% 走到 99%
pub(super) fn spawn_ticker(shared: Arc<Shared>, install_id: String, window: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        sleep(shared.config.ticker_start_delay()).await;

        let mut tick_interval = interval(shared.config.tick_interval());
        tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        for percent in 1..=TICKER_MAX_PERCENT {
            tick_interval.tick().await;

            let panel = {
                let mut state = shared.state.write();
                let Some(op) = state.operations.get_mut(&install_id) else {
                    break;
                };
                if op.window != window || !op.is_busy() {
                    break;
                }
                op.percent = percent;
                if state.panel.is_owned_by(&install_id) {
                    state.panel.progress_percent = percent;
                    Some(state.panel.clone())
                } else {
                    None
                }
            };

            if let Some(panel) = panel {
                shared.host.panel_changed(&panel);
            }
        }
        debug!("安装 {} 的进度动画结束", install_id);
    })
}

/// 完成后延迟隐藏进度条，让 100% 状态保留片刻
///
/// 如果期间同一安装又开始了新的忙碌窗口，或面板已切换到别的安装，则不做处理。
pub(super) fn spawn_hide(shared: Arc<Shared>, install_id: String, window: u64) {
    tokio::spawn(async move {
        sleep(shared.config.hide_delay()).await;

        let panel = {
            let mut state = shared.state.write();
            let still_done = state
                .operations
                .get(&install_id)
                .is_some_and(|op| op.window == window && !op.is_busy());
            if !still_done || !state.panel.is_owned_by(&install_id) {
                return;
            }
            state.panel.progress_visible = false;
            state.panel.clone()
        };
        shared.host.panel_changed(&panel);
    });
}
