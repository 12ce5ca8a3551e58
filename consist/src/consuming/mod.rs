//! 消费子系统（consuming）
//!
//! 提供入站消息消费的基础抽象与运行时：
//! - `TopicSubscriber`：按 topic 消费入站消息的处理器；
//! - `SubscriberRegistry`：启动时构建的 topic -> 处理器 注册表；
//! - `ConsumerClient`/`ConsumerClientFactory`：对 broker 连接的最小协议；
//! - `ConsumerServer`：按分组编排监听、持久化与分发的核心引擎。
//!
//! 该模块仅定义协议与引擎，不绑定具体 broker 实现，可对接任意消息系统或内存实现。
//!
pub mod client;
pub mod client_inmemory;
pub mod handler;
pub mod registry;
pub mod server;

pub use client::{ConsumerClient, ConsumerClientFactory};
pub use client_inmemory::{InMemoryBroker, InMemoryConsumerClient};
pub use handler::{ConsumerContext, TopicSubscriber};
pub use registry::{ExecutorDescriptor, SubscriberRegistry, SubscriberRegistryBuilder};
pub use server::{ConsumerServer, ConsumerServerConfig, ServerHandle};
