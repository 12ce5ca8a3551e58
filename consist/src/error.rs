//! 统一错误定义
//!
//! 聚焦消息存储、消费客户端、订阅分发与节点发现等最小必要集合，
//! 便于各实现层统一转换为 `ConsistencyError`。
//!
use thiserror::Error;

/// 统一错误类型（基础库最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConsistencyError {
    // --- 消息存储 ---
    #[error("message store error: {reason}")]
    MessageStore { reason: String },

    // --- 消费客户端 ---
    #[error("broker client error: group={group}, reason={reason}")]
    BrokerClient { group: String, reason: String },

    // --- 订阅与分发 ---
    #[error("no subscriber registered for topic: {topic}")]
    SubscriberNotFound { topic: String },
    #[error("subscriber error: name={name}, reason={reason}")]
    Subscriber { name: String, reason: String },
    #[error("duplicate subscription for topic: {topic}")]
    DuplicateTopic { topic: String },

    // --- 节点发现 ---
    #[error("discovery error: {reason}")]
    Discovery { reason: String },

    // --- 序列化 ---
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
}

impl ConsistencyError {
    pub fn message_store(reason: impl Into<String>) -> Self {
        Self::MessageStore {
            reason: reason.into(),
        }
    }

    pub fn broker_client(group: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BrokerClient {
            group: group.into(),
            reason: reason.into(),
        }
    }

    pub fn discovery(reason: impl Into<String>) -> Self {
        Self::Discovery {
            reason: reason.into(),
        }
    }
}

/// 统一 Result 类型别名
pub type ConsistencyResult<T> = Result<T, ConsistencyError>;
