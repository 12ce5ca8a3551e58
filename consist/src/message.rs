//! 消息模型（ConsistencyMessage / DeliverMessage）
//!
//! 定义入站消息的审计记录形态与来自消费客户端的原始投递单元：
//! - `ConsistencyMessage`：持久化的审计/发件箱式记录，记录接收与分发结果；
//! - `MessageStatus`：记录状态，先持久化 `Received` 再执行分发；
//! - `DeliverMessage`：一次投递的瞬态载体，按回调消费一次后丢弃。
//!
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// 消息状态：状态迁移单向且单次（Received -> Succeeded）。
/// 本核心不会自动迁移到 `Failed`，失败的记录停留在 `Received` 供人工排查。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageStatus {
    Received,
    Succeeded,
    Failed,
}

/// 入站（或出站）消息的审计记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsistencyMessage {
    /// 记录唯一标识符，创建时分配
    id: String,
    /// 路由键，与消费客户端的 message key 一致
    topic: String,
    /// 消息内容（入站记录允许人类可读摘要）
    payload: String,
    /// 记录状态
    status: MessageStatus,
    /// 记录创建时间
    added_at: DateTime<Utc>,
    /// 最近一次状态更新时间
    updated_at: DateTime<Utc>,
}

impl ConsistencyMessage {
    /// 以 `Received` 状态构造一条新记录，分配新的标识符
    pub fn received(topic: impl Into<String>, payload: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            topic: topic.into(),
            payload: payload.into(),
            status: MessageStatus::Received,
            added_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn status(&self) -> MessageStatus {
        self.status
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// 标记分发成功
    pub fn mark_succeeded(&mut self) {
        self.status = MessageStatus::Succeeded;
        self.updated_at = Utc::now();
    }

    /// 标记失败（本核心不自动调用，预留给外部补偿流程）
    pub fn mark_failed(&mut self) {
        self.status = MessageStatus::Failed;
        self.updated_at = Utc::now();
    }
}

/// 消费客户端投出的原始消息：瞬态，不直接持久化
#[derive(Debug, Clone, Builder)]
pub struct DeliverMessage {
    /// 消息键，对应订阅的 topic
    message_key: String,
    /// 消息体字节
    body: Vec<u8>,
    /// 可选头部
    #[builder(default)]
    headers: HashMap<String, String>,
}

impl DeliverMessage {
    pub fn new(message_key: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            message_key: message_key.into(),
            body: body.into(),
            headers: HashMap::new(),
        }
    }

    pub fn message_key(&self) -> &str {
        &self.message_key
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// 审计记录所用的可读摘要（消息体按 UTF-8 宽松解码）
    pub fn payload_summary(&self) -> String {
        format!("Received:{}", String::from_utf8_lossy(&self.body))
    }
}
