//! 节点发现子系统（discovery）
//!
//! 提供轻量的集群成员信号：
//! - `DiscoveryProvider`：对发现服务的最小协议（注册、查询存活节点）；
//! - `DiscoveryNodeServer`：启动时注册当前进程，周期刷新节点快照；
//! - `NodeSnapshot`：监控读路径使用的非阻塞进程级快照。
//!
pub mod node;
pub mod provider;
pub mod server;
pub mod snapshot;

pub use node::Node;
pub use provider::{DiscoveryProvider, DiscoveryProviderFactory};
pub use server::{DiscoveryHandle, DiscoveryNodeServer};
pub use snapshot::NodeSnapshot;
