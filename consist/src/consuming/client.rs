//! 消费客户端（ConsumerClient）协议
//!
//! 定义编排器对 broker 连接的最小要求：按分组创建、订阅 topic、
//! 以固定轮询间隔拉取下一条消息。连接资源随客户端 `Drop` 释放，
//! 保证包括异常在内的所有退出路径都能归还资源。
//!
//! 具体 broker 协议（AMQP/Kafka 等）与确认语义由实现方负责；
//! 至少一次投递由实现方与“先持久化后分发”策略共同保证。
//!
use crate::error::ConsistencyResult as Result;
use crate::message::DeliverMessage;
use async_trait::async_trait;
use std::time::Duration;

/// 消费客户端：一个分组工作者独占一个实例
#[async_trait]
pub trait ConsumerClient: Send + Sync {
    /// 订阅一个 topic；同一客户端可多次调用以订阅分组内全部 topic
    async fn subscribe(&mut self, topic: &str) -> Result<()>;

    /// 等待下一条入站消息，最多 `poll_interval`；
    /// 轮询到期无消息时返回 `Ok(None)`，传输故障返回 `Err`
    async fn recv(&mut self, poll_interval: Duration) -> Result<Option<DeliverMessage>>;
}

/// 消费客户端工厂：按分组键与 broker 端点集合创建客户端
pub trait ConsumerClientFactory: Send + Sync {
    fn create(&self, group: &str, broker_urls: &[String]) -> Result<Box<dyn ConsumerClient>>;
}
