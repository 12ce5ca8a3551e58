//! 成员上报（DiscoveryNodeServer）
//!
//! 启动时向发现服务注册当前进程（一次性调用），并启动周期任务刷新
//! 存活节点快照供监控读路径使用：
//! - `pulse` 为预留的空操作钩子，存活由发现服务自身机制（session/TTL）维护；
//! - 不做显式注销，依赖服务端过期；
//! - 与消费编排器相互独立，仅共享配置的只读访问。
//!
use super::provider::DiscoveryProviderFactory;
use super::snapshot::NodeSnapshot;
use crate::error::ConsistencyResult;
use crate::options::{ConsistencyOptions, DiscoveryOptions};
use bon::Builder;
use std::{sync::Arc, time::Duration};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// 成员上报服务：注册节点并维护存活节点快照
#[derive(Builder)]
pub struct DiscoveryNodeServer {
    options: DiscoveryOptions,
    provider_factory: Arc<dyn DiscoveryProviderFactory>,
    snapshot: Arc<NodeSnapshot>,
    /// 快照后台刷新间隔（对应配置面的 stats_polling_interval）
    #[builder(default = Duration::from_secs(2))]
    refresh_interval: Duration,
}

impl DiscoveryNodeServer {
    /// 按配置面装配：未配置 discovery 时返回 `None`（成员上报未启用）；
    /// 刷新间隔取配置面的 `stats_polling_interval`
    pub fn from_options(
        options: &ConsistencyOptions,
        provider_factory: Arc<dyn DiscoveryProviderFactory>,
        snapshot: Arc<NodeSnapshot>,
    ) -> Option<Self> {
        let discovery = options.discovery()?.clone();
        Some(
            Self::builder()
                .options(discovery)
                .provider_factory(provider_factory)
                .snapshot(snapshot)
                .refresh_interval(options.stats_polling_interval())
                .build(),
        )
    }

    /// 注册当前节点并启动快照刷新任务。
    /// 注册失败同步返回错误；刷新失败仅告警并保留上一次快照。
    pub async fn start(&self) -> ConsistencyResult<DiscoveryHandle> {
        let provider = self.provider_factory.create(&self.options)?;
        provider.register_node().await?;
        tracing::info!(
            node_id = %self.options.node_id(),
            node_name = %self.options.node_name(),
            "node registered with discovery provider"
        );

        let token = CancellationToken::new();
        let task = {
            let token = token.clone();
            let snapshot = self.snapshot.clone();
            let interval = self.refresh_interval;
            tokio::spawn(async move {
                let mut ticker = time::interval(interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

                loop {
                    tokio::select! {
                        _ = token.cancelled() => break,
                        _ = ticker.tick() => match provider.get_nodes().await {
                            Ok(nodes) => snapshot.replace(nodes),
                            Err(e) => {
                                tracing::warn!(error = %e, "node snapshot refresh failed");
                            }
                        }
                    }
                }
            })
        };

        Ok(DiscoveryHandle {
            token,
            task: Some(task),
        })
    }

    /// 周期性心跳钩子：空操作，存活由发现服务自身机制维护
    pub fn pulse(&self) {}
}

/// 快照刷新任务句柄：关闭时不做节点注销
pub struct DiscoveryHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl DiscoveryHandle {
    pub fn shutdown(&self) {
        self.token.cancel();
    }

    pub async fn join(mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for DiscoveryHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
