//! 消息存储（MessageStore）协议
//!
//! 定义审计记录的追加与更新能力，按 `id` 键入，要求在多个分组工作者
//! 并发写入下保持安全。具体存储后端（如 Postgres）由上层提供实现并注入。
//!
use crate::error::ConsistencyResult as Result;
use crate::message::ConsistencyMessage;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// 消息存储：持久化审计记录，容忍多工作者并发调用
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// 追加一条新记录（调用方保证 id 唯一）
    async fn create(&self, message: &ConsistencyMessage) -> Result<()>;

    /// 按 id 覆盖更新一条既有记录
    async fn update(&self, message: &ConsistencyMessage) -> Result<()>;
}

/// 内存版消息存储：测试与本地开发用途
#[derive(Clone, Default)]
pub struct InMemoryMessageStore {
    inner: Arc<Mutex<HashMap<String, ConsistencyMessage>>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按 id 查询一条记录
    pub fn find(&self, id: &str) -> Option<ConsistencyMessage> {
        self.inner.lock().unwrap().get(id).cloned()
    }

    /// 按 topic 查询记录（测试断言用）
    pub fn find_by_topic(&self, topic: &str) -> Vec<ConsistencyMessage> {
        self.inner
            .lock()
            .unwrap()
            .values()
            .filter(|m| m.topic() == topic)
            .cloned()
            .collect()
    }

    /// 当前全部记录的快照
    pub fn snapshot(&self) -> Vec<ConsistencyMessage> {
        self.inner.lock().unwrap().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn create(&self, message: &ConsistencyMessage) -> Result<()> {
        self.inner
            .lock()
            .unwrap()
            .insert(message.id().to_string(), message.clone());
        Ok(())
    }

    async fn update(&self, message: &ConsistencyMessage) -> Result<()> {
        self.inner
            .lock()
            .unwrap()
            .insert(message.id().to_string(), message.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageStatus;

    #[tokio::test]
    async fn create_then_update_overwrites_by_id() {
        let store = InMemoryMessageStore::new();
        let mut m = ConsistencyMessage::received("Trade.Created", "p");
        store.create(&m).await.unwrap();
        assert_eq!(store.find(m.id()).unwrap().status(), MessageStatus::Received);

        m.mark_succeeded();
        store.update(&m).await.unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.find(m.id()).unwrap().status(),
            MessageStatus::Succeeded
        );
    }
}
