//! 可靠消息一致性基础库（consist）
//!
//! 在本地事务性存储与外部消息 broker 之间提供“至少一次”的消息消费编排，
//! 以及面向监控面的轻量集群成员信号：
//! - 消息模型（`message`）：审计记录 `ConsistencyMessage` 与投递单元 `DeliverMessage`
//! - 消息存储协议（`store`）：并发安全的追加/更新能力
//! - 消费子系统（`consuming`）：订阅注册表、消费客户端协议与分组编排引擎
//! - 节点发现（`discovery`）：成员注册、空操作心跳与节点快照
//! - 配置（`options`）与统一错误（`error`）
//!
//! 本 crate 尽量保持与存储与传输实现解耦，仅定义协议与最小必要的错误类型，
//! 以便在不同基础设施（例如 Postgres、AMQP/Kafka 等）上进行适配实现。
//!
//! 典型用法：
//! 1. 实现 `TopicSubscriber` 并通过 `SubscriberRegistry::builder` 声明式登记订阅；
//! 2. 选择 `MessageStore`/`ConsumerClientFactory` 的具体实现并注入；
//! 3. 构建 `ConsumerServer` 并 `start`，经由 `ServerHandle` 优雅关闭；
//! 4. 如配置了节点发现，另行启动 `DiscoveryNodeServer` 维护成员信号。
//!
pub mod consuming;
pub mod discovery;
pub mod error;
pub mod message;
pub mod options;
pub mod store;
