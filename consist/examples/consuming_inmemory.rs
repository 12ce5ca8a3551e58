//! 消费编排（内存版）示例
//! 展示 注册订阅 -> 分组监听 -> Received 落库 -> 分发 -> Succeeded 的闭环，
//! 以及处理器失败后记录停留在 Received 的排查语义
use async_trait::async_trait;
use consist::consuming::{
    ConsumerContext, ConsumerServer, ConsumerServerConfig, InMemoryBroker, SubscriberRegistry,
    TopicSubscriber,
};
use consist::message::DeliverMessage;
use consist::options::ConsistencyOptions;
use consist::store::InMemoryMessageStore;
use std::{sync::Arc, time::Duration};

struct TradeCreated;

#[async_trait]
impl TopicSubscriber for TradeCreated {
    fn name(&self) -> &str {
        "trade-created"
    }

    async fn handle(&self, ctx: ConsumerContext<'_>) -> anyhow::Result<()> {
        println!(
            "[{}] handled: {}",
            ctx.group(),
            String::from_utf8_lossy(ctx.message().body())
        );
        Ok(())
    }
}

struct AlwaysFails;

#[async_trait]
impl TopicSubscriber for AlwaysFails {
    fn name(&self) -> &str {
        "always-fails"
    }

    async fn handle(&self, _ctx: ConsumerContext<'_>) -> anyhow::Result<()> {
        anyhow::bail!("downstream unavailable")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // 1) 声明式登记订阅：两个 topic 共享分组 G1，另一个独占 G2
    let registry = Arc::new(
        SubscriberRegistry::builder()
            .subscribe("Trade.Created", "G1", Arc::new(TradeCreated))
            .subscribe("Trade.Settled", "G1", Arc::new(TradeCreated))
            .subscribe("Risk.Alert", "G2", Arc::new(AlwaysFails))
            .build()?,
    );

    // 2) 注入内存 broker 与内存存储
    let broker = InMemoryBroker::new(256);
    let store = InMemoryMessageStore::new();

    let server = Arc::new(
        ConsumerServer::builder()
            .registry(registry)
            .client_factory(Arc::new(broker.clone()))
            .message_store(Arc::new(store.clone()))
            .options(ConsistencyOptions::default())
            .config(ConsumerServerConfig {
                poll_interval: Duration::from_millis(100),
                shutdown_timeout: Duration::from_secs(5),
            })
            .build(),
    );

    // 3) 启动并投递消息
    let handle = server.start();
    tokio::time::sleep(Duration::from_millis(200)).await;

    broker.publish(DeliverMessage::new("Trade.Created", b"{\"qty\":10}".to_vec()));
    broker.publish(DeliverMessage::new("Trade.Settled", b"{\"qty\":10}".to_vec()));
    broker.publish(DeliverMessage::new("Risk.Alert", b"margin call".to_vec()));

    tokio::time::sleep(Duration::from_millis(500)).await;

    // 4) 优雅关闭并检视审计记录
    handle.shutdown();
    handle.join().await;

    for record in store.snapshot() {
        println!(
            "audit: topic={} status={:?} payload={}",
            record.topic(),
            record.status(),
            record.payload()
        );
    }

    Ok(())
}
