//! 订阅处理器（TopicSubscriber）
//!
//! 定义消费某个 topic 的处理逻辑与元信息（名称），以及一次分发的
//! 上下文载体 `ConsumerContext`（按消息构造，调用结束即丢弃）。
//!
use super::registry::ExecutorDescriptor;
use crate::message::DeliverMessage;
use async_trait::async_trait;

/// 订阅处理器：处理某一 topic 的入站消息
#[async_trait]
pub trait TopicSubscriber: Send + Sync {
    /// 处理器名称（用于失败日志与审计）
    fn name(&self) -> &str;

    /// 处理一条入站消息；返回错误时记录停留在 `Received`
    async fn handle(&self, ctx: ConsumerContext<'_>) -> anyhow::Result<()>;
}

/// 一次分发的上下文：描述符与原始消息的短生命周期配对
pub struct ConsumerContext<'a> {
    descriptor: &'a ExecutorDescriptor,
    message: &'a DeliverMessage,
}

impl<'a> ConsumerContext<'a> {
    pub(crate) fn new(descriptor: &'a ExecutorDescriptor, message: &'a DeliverMessage) -> Self {
        Self {
            descriptor,
            message,
        }
    }

    pub fn topic(&self) -> &str {
        self.descriptor.topic()
    }

    pub fn group(&self) -> &str {
        self.descriptor.group()
    }

    pub fn message(&self) -> &DeliverMessage {
        self.message
    }
}
