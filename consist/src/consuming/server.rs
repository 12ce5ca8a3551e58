//! 消费编排器（ConsumerServer）
//!
//! 统一编排“订阅 → 接收 → 持久化 → 分发”的长驻工作者：
//! - 启动时按分组键为每个分组建立一个专属监听工作者；
//! - 每条入站消息先以 `Received` 落库，再解析处理器并调用；
//! - 分发失败只记日志，记录停留在 `Received`（至少一次 + 人工排查）；
//! - 提供关闭与有界等待的 `ServerHandle`。
//!
use super::client::ConsumerClientFactory;
use super::handler::ConsumerContext;
use super::registry::SubscriberRegistry;
use crate::error::{ConsistencyError, ConsistencyResult};
use crate::message::{ConsistencyMessage, DeliverMessage};
use crate::options::ConsistencyOptions;
use crate::store::MessageStore;
use bon::Builder;
use std::{sync::Arc, time::Duration};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// ConsumerServer：
/// - `start` 为每个分组建立一个专属的长驻监听任务
/// - 工作者循环内严格顺序处理：persist -> resolve -> invoke -> persist
#[derive(Builder)]
pub struct ConsumerServer {
    registry: Arc<SubscriberRegistry>,
    client_factory: Arc<dyn ConsumerClientFactory>,
    message_store: Arc<dyn MessageStore>,
    #[builder(default)]
    options: ConsistencyOptions,
    #[builder(default)]
    config: ConsumerServerConfig,
}

impl ConsumerServer {
    /// 启动编排器，返回可用于关闭/等待的句柄。
    /// 每个分组键对应恰好一个工作者；客户端创建与订阅发生在工作者内部，
    /// 某个分组的装配失败不影响其余分组。
    pub fn start(self: Arc<Self>) -> ServerHandle {
        let token = CancellationToken::new();
        let groups = self.registry.candidates();
        let mut tasks: Vec<JoinHandle<()>> = Vec::with_capacity(groups.len());

        for (group, descriptors) in groups {
            let topics: Vec<String> = descriptors
                .iter()
                .map(|d| d.topic().to_string())
                .collect();
            tasks.push(tokio::spawn(self.clone().group_worker(
                group,
                topics,
                token.clone(),
            )));
        }

        ServerHandle {
            token,
            tasks,
            shutdown_timeout: self.config.shutdown_timeout,
        }
    }

    /// 分组工作者：持有独占客户端，订阅全部 topic 后进入监听循环。
    /// 客户端随函数作用域 Drop，所有退出路径都会释放连接资源。
    async fn group_worker(
        self: Arc<Self>,
        group: String,
        topics: Vec<String>,
        token: CancellationToken,
    ) {
        let mut client = match self
            .client_factory
            .create(&group, self.options.broker_url_list())
        {
            Ok(client) => client,
            Err(e) => {
                tracing::error!(group = %group, error = %e, "failed to create consumer client");
                return;
            }
        };

        for topic in &topics {
            if let Err(e) = client.subscribe(topic).await {
                tracing::error!(group = %group, topic = %topic, error = %e, "failed to subscribe");
                return;
            }
        }

        tracing::debug!(group = %group, topics = ?topics, "listening");

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!(group = %group, "cancelling");
                    break;
                }
                received = client.recv(self.config.poll_interval) => match received {
                    Ok(Some(message)) => {
                        // 落库失败意味着本次接收丢失（不重试），循环继续
                        if let Err(e) = self.on_message(&group, message).await {
                            tracing::error!(group = %group, error = %e, "failed to persist received message");
                        }
                    }
                    Ok(None) => {
                        // 轮询到期，无消息
                    }
                    Err(e) => {
                        tracing::error!(group = %group, error = %e, "consumer client stopped yielding");
                        break;
                    }
                }
            }
        }

        tracing::debug!(group = %group, "stopped");
    }

    /// 单条消息的处理管线：先以 `Received` 持久化，再解析与调用处理器。
    /// 持久化失败向上传播；解析/调用/更新失败在此处吞掉并记日志，
    /// 记录停留在 `Received`。
    async fn on_message(&self, group: &str, message: DeliverMessage) -> ConsistencyResult<()> {
        let mut record =
            ConsistencyMessage::received(message.message_key(), message.payload_summary());

        tracing::info!(group = %group, topic = %record.topic(), id = %record.id(), "message received");

        self.message_store.create(&record).await?;

        if let Err(e) = self.dispatch(&message, &mut record).await {
            tracing::error!(
                group = %group,
                topic = %record.topic(),
                id = %record.id(),
                error = %e,
                "message dispatch failed"
            );
        }

        Ok(())
    }

    async fn dispatch(
        &self,
        message: &DeliverMessage,
        record: &mut ConsistencyMessage,
    ) -> ConsistencyResult<()> {
        let descriptor = self.registry.resolve(message.message_key()).ok_or_else(|| {
            ConsistencyError::SubscriberNotFound {
                topic: message.message_key().to_string(),
            }
        })?;

        let ctx = ConsumerContext::new(&descriptor, message);
        descriptor
            .subscriber()
            .handle(ctx)
            .await
            .map_err(|e| ConsistencyError::Subscriber {
                name: descriptor.subscriber().name().to_string(),
                reason: e.to_string(),
            })?;

        record.mark_succeeded();
        self.message_store.update(record).await?;
        Ok(())
    }
}

/// 编排器运行参数
#[derive(Clone, Copy, Debug)]
pub struct ConsumerServerConfig {
    /// 监听循环的轮询间隔
    pub poll_interval: Duration,
    /// 关闭时等待全部工作者退出的上限
    pub shutdown_timeout: Duration,
}

impl Default for ConsumerServerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            shutdown_timeout: Duration::from_secs(60),
        }
    }
}

/// 编排器运行句柄：用于优雅关闭与有界等待
pub struct ServerHandle {
    token: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
    shutdown_timeout: Duration,
}

impl ServerHandle {
    /// 发出关闭信号；重复调用为空操作
    pub fn shutdown(&self) {
        self.token.cancel();
    }

    /// 等待全部工作者退出，上限为配置的关闭超时；
    /// 超时后直接返回（fail-open），不强制终止工作者。
    pub async fn join(mut self) {
        let tasks = std::mem::take(&mut self.tasks);

        let wait_all = async {
            for task in tasks {
                if let Err(e) = task.await {
                    if e.is_cancelled() {
                        // 预期的取消结果
                        continue;
                    }
                    tracing::error!(error = %e, "group worker terminated abnormally");
                }
            }
        };

        if tokio::time::timeout(self.shutdown_timeout, wait_all)
            .await
            .is_err()
        {
            tracing::warn!(
                timeout = ?self.shutdown_timeout,
                "shutdown wait exceeded bound, returning anyway"
            );
        }
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
