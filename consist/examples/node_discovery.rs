//! 成员上报与节点快照示例
//! 展示 注册当前节点 -> 周期刷新快照 -> 监控读路径非阻塞读取 的流程
use async_trait::async_trait;
use consist::discovery::{
    DiscoveryNodeServer, DiscoveryProvider, DiscoveryProviderFactory, Node, NodeSnapshot,
};
use consist::error::ConsistencyResult;
use consist::options::{ConsistencyOptions, DiscoveryOptions};
use std::{sync::Arc, time::Duration};

/// 内存版发现服务：固定返回两个存活节点
struct InMemoryDiscovery;

#[async_trait]
impl DiscoveryProvider for InMemoryDiscovery {
    async fn register_node(&self) -> ConsistencyResult<()> {
        println!("registered with discovery provider");
        Ok(())
    }

    async fn get_nodes(&self) -> ConsistencyResult<Vec<Node>> {
        Ok(vec![
            Node::builder()
                .id("n-1".to_string())
                .name("worker-1".to_string())
                .address("10.0.0.1".to_string())
                .port(5000)
                .build(),
            Node::builder()
                .id("n-2".to_string())
                .name("worker-2".to_string())
                .address("10.0.0.2".to_string())
                .port(5000)
                .build(),
        ])
    }
}

struct InMemoryDiscoveryFactory;

impl DiscoveryProviderFactory for InMemoryDiscoveryFactory {
    fn create(
        &self,
        _options: &DiscoveryOptions,
    ) -> ConsistencyResult<Arc<dyn DiscoveryProvider>> {
        Ok(Arc::new(InMemoryDiscovery))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    // discovery 配置存在即启用成员上报，快照刷新间隔取 stats_polling_interval
    let options = ConsistencyOptions::builder()
        .stats_polling_interval(Duration::from_millis(200))
        .discovery(
            DiscoveryOptions::builder()
                .node_id("n-1".to_string())
                .node_name("worker-1".to_string())
                .current_node_port(5000)
                .build(),
        )
        .build();

    let snapshot = Arc::new(NodeSnapshot::new());
    let server = DiscoveryNodeServer::from_options(
        &options,
        Arc::new(InMemoryDiscoveryFactory),
        snapshot.clone(),
    )
    .expect("discovery configured");

    let handle = server.start().await?;
    server.pulse(); // 空操作钩子，由外部调度器周期调用

    tokio::time::sleep(Duration::from_millis(500)).await;
    println!("server count: {}", snapshot.server_count());
    for node in snapshot.nodes() {
        println!("node: {} {} {}:{}", node.id(), node.name(), node.address(), node.port());
    }

    handle.shutdown();
    handle.join().await;
    Ok(())
}
