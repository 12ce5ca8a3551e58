//! 内存版消费客户端（InMemoryBroker / InMemoryConsumerClient）
//!
//! 基于 `tokio::sync::broadcast` 实现的进程内 broker，满足
//! `ConsumerClientFactory`/`ConsumerClient` 协议：
//! - `publish`：向全部分组广播一条消息；
//! - 客户端按自身订阅的 topic 过滤入站消息；
//! - 典型用途：测试环境、示例与本地开发。
//!
//! 注意：广播缓冲区溢出（Lagged）按告警处理并继续消费，符合
//! “至少一次、不静默丢失工作者”的语义。

use super::client::{ConsumerClient, ConsumerClientFactory};
use crate::error::{ConsistencyError, ConsistencyResult as Result};
use crate::message::DeliverMessage;
use async_trait::async_trait;
use futures_util::StreamExt;
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

/// 进程内 broker：工厂与发布端合一
#[derive(Clone)]
pub struct InMemoryBroker {
    tx: broadcast::Sender<DeliverMessage>,
}

impl InMemoryBroker {
    /// 创建进程内 broker，`capacity` 为广播缓冲区容量
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// 发布一条消息；当前无任何客户端时发送被忽略（非致命）
    pub fn publish(&self, message: DeliverMessage) {
        let _ = self.tx.send(message);
    }
}

impl ConsumerClientFactory for InMemoryBroker {
    fn create(&self, group: &str, _broker_urls: &[String]) -> Result<Box<dyn ConsumerClient>> {
        Ok(Box::new(InMemoryConsumerClient {
            group: group.to_string(),
            topics: HashSet::new(),
            stream: BroadcastStream::new(self.tx.subscribe()),
        }))
    }
}

/// 进程内消费客户端：每个分组工作者独占一个实例
pub struct InMemoryConsumerClient {
    group: String,
    topics: HashSet<String>,
    stream: BroadcastStream<DeliverMessage>,
}

#[async_trait]
impl ConsumerClient for InMemoryConsumerClient {
    async fn subscribe(&mut self, topic: &str) -> Result<()> {
        self.topics.insert(topic.to_string());
        Ok(())
    }

    async fn recv(&mut self, poll_interval: Duration) -> Result<Option<DeliverMessage>> {
        let next_matching = async {
            loop {
                match self.stream.next().await {
                    Some(Ok(message)) => {
                        if self.topics.contains(message.message_key()) {
                            break Ok(Some(message));
                        }
                        // 非本组订阅的消息，跳过
                    }
                    Some(Err(BroadcastStreamRecvError::Lagged(n))) => {
                        tracing::warn!(group = %self.group, skipped = n, "broadcast lagged");
                    }
                    None => {
                        break Err(ConsistencyError::broker_client(
                            self.group.clone(),
                            "broker channel closed",
                        ));
                    }
                }
            }
        };

        match tokio::time::timeout(poll_interval, next_matching).await {
            Ok(result) => result,
            // 轮询到期：无消息
            Err(_) => Ok(None),
        }
    }
}
