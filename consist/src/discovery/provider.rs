//! 发现服务（DiscoveryProvider）协议
//!
//! 定义成员上报对发现服务的最小要求：注册当前节点、查询存活节点。
//! 注册/心跳的具体协议（如 Consul 的 session/TTL）由实现方负责，
//! 本核心不做显式注销，依赖服务端过期机制。
//!
use super::node::Node;
use crate::error::ConsistencyResult as Result;
use crate::options::DiscoveryOptions;
use async_trait::async_trait;
use std::sync::Arc;

/// 发现服务：成员注册与存活节点查询
#[async_trait]
pub trait DiscoveryProvider: Send + Sync {
    /// 将当前进程注册到发现服务（一次性网络调用）
    async fn register_node(&self) -> Result<()>;

    /// 查询当前存活节点集合
    async fn get_nodes(&self) -> Result<Vec<Node>>;
}

/// 发现服务工厂：按配置创建 provider
pub trait DiscoveryProviderFactory: Send + Sync {
    fn create(&self, options: &DiscoveryOptions) -> Result<Arc<dyn DiscoveryProvider>>;
}
