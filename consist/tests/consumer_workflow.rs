use async_trait::async_trait;
use consist::consuming::{
    ConsumerClient, ConsumerClientFactory, ConsumerContext, ConsumerServer, ConsumerServerConfig,
    InMemoryBroker, SubscriberRegistry, TopicSubscriber,
};
use consist::error::ConsistencyResult;
use consist::message::{ConsistencyMessage, DeliverMessage, MessageStatus};
use consist::store::{InMemoryMessageStore, MessageStore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;

/// 记录调用顺序的存储包装：用于断言“先持久化、后分发”
#[derive(Clone)]
struct JournalingStore {
    inner: InMemoryMessageStore,
    journal: Journal,
}

#[derive(Clone, Default)]
struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    fn push(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }
    fn snapshot(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageStore for JournalingStore {
    async fn create(&self, message: &ConsistencyMessage) -> ConsistencyResult<()> {
        self.journal.push(format!("create:{}", message.topic()));
        self.inner.create(message).await
    }
    async fn update(&self, message: &ConsistencyMessage) -> ConsistencyResult<()> {
        self.journal.push(format!("update:{}", message.topic()));
        self.inner.update(message).await
    }
}

struct JournalingSubscriber {
    name: &'static str,
    journal: Journal,
    handled: Arc<AtomicUsize>,
    fail: bool,
}

#[async_trait]
impl TopicSubscriber for JournalingSubscriber {
    fn name(&self) -> &str {
        self.name
    }
    async fn handle(&self, ctx: ConsumerContext<'_>) -> anyhow::Result<()> {
        self.journal.push(format!("handle:{}", ctx.topic()));
        if self.fail {
            anyhow::bail!("handler failed on purpose");
        }
        self.handled.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// 不做 topic 过滤的客户端：模拟 broker 侧宽订阅投来未注册消息键的情形
#[derive(Clone)]
struct PromiscuousFactory {
    tx: broadcast::Sender<DeliverMessage>,
}

impl PromiscuousFactory {
    fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }
    fn publish(&self, message: DeliverMessage) {
        let _ = self.tx.send(message);
    }
}

impl ConsumerClientFactory for PromiscuousFactory {
    fn create(
        &self,
        _group: &str,
        _broker_urls: &[String],
    ) -> ConsistencyResult<Box<dyn ConsumerClient>> {
        Ok(Box::new(PromiscuousClient {
            rx: self.tx.subscribe(),
        }))
    }
}

struct PromiscuousClient {
    rx: broadcast::Receiver<DeliverMessage>,
}

#[async_trait]
impl ConsumerClient for PromiscuousClient {
    async fn subscribe(&mut self, _topic: &str) -> ConsistencyResult<()> {
        Ok(())
    }
    async fn recv(
        &mut self,
        poll_interval: Duration,
    ) -> ConsistencyResult<Option<DeliverMessage>> {
        match tokio::time::timeout(poll_interval, self.rx.recv()).await {
            Ok(Ok(message)) => Ok(Some(message)),
            Ok(Err(_)) | Err(_) => Ok(None),
        }
    }
}

fn fast_config() -> ConsumerServerConfig {
    ConsumerServerConfig {
        poll_interval: Duration::from_millis(20),
        shutdown_timeout: Duration::from_secs(5),
    }
}

async fn wait_until(check: impl Fn() -> bool) {
    let _ = tokio::time::timeout(Duration::from_secs(2), async {
        while !check() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn successful_dispatch_persists_received_before_handler_then_succeeded() {
    let journal = Journal::default();
    let handled = Arc::new(AtomicUsize::new(0));
    let store = InMemoryMessageStore::new();
    let broker = InMemoryBroker::new(64);

    let registry = Arc::new(
        SubscriberRegistry::builder()
            .subscribe(
                "Trade.Created",
                "G1",
                Arc::new(JournalingSubscriber {
                    name: "trade-created",
                    journal: journal.clone(),
                    handled: handled.clone(),
                    fail: false,
                }),
            )
            .build()
            .unwrap(),
    );

    let server = Arc::new(
        ConsumerServer::builder()
            .registry(registry)
            .client_factory(Arc::new(broker.clone()))
            .message_store(Arc::new(JournalingStore {
                inner: store.clone(),
                journal: journal.clone(),
            }))
            .config(fast_config())
            .build(),
    );
    let handle = server.start();

    tokio::time::sleep(Duration::from_millis(50)).await;
    broker.publish(DeliverMessage::new("Trade.Created", b"{\"qty\":1}".to_vec()));

    wait_until(|| handled.load(Ordering::Relaxed) == 1).await;
    handle.shutdown();
    handle.join().await;

    // 顺序不变式：Received 落库严格先于处理器调用，成功后恰好一次状态更新
    assert_eq!(
        journal.snapshot(),
        vec![
            "create:Trade.Created".to_string(),
            "handle:Trade.Created".to_string(),
            "update:Trade.Created".to_string(),
        ]
    );

    let records = store.find_by_topic("Trade.Created");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status(), MessageStatus::Succeeded);
    assert!(records[0].payload().starts_with("Received:"));
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_topic_stays_received_and_worker_keeps_consuming() {
    let journal = Journal::default();
    let handled = Arc::new(AtomicUsize::new(0));
    let store = InMemoryMessageStore::new();
    let factory = PromiscuousFactory::new(64);

    let registry = Arc::new(
        SubscriberRegistry::builder()
            .subscribe(
                "Trade.Created",
                "G1",
                Arc::new(JournalingSubscriber {
                    name: "trade-created",
                    journal: journal.clone(),
                    handled: handled.clone(),
                    fail: false,
                }),
            )
            .build()
            .unwrap(),
    );

    let server = Arc::new(
        ConsumerServer::builder()
            .registry(registry)
            .client_factory(Arc::new(factory.clone()))
            .message_store(Arc::new(JournalingStore {
                inner: store.clone(),
                journal: journal.clone(),
            }))
            .config(fast_config())
            .build(),
    );
    let handle = server.start();

    tokio::time::sleep(Duration::from_millis(50)).await;
    // 无处理器的消息键：记录落库后停留在 Received，工作者不退出
    factory.publish(DeliverMessage::new("Unknown.Topic", b"???".to_vec()));
    wait_until(|| !store.find_by_topic("Unknown.Topic").is_empty()).await;

    // 同组后续有效 topic 仍被处理
    factory.publish(DeliverMessage::new("Trade.Created", b"ok".to_vec()));
    wait_until(|| handled.load(Ordering::Relaxed) == 1).await;

    handle.shutdown();
    handle.join().await;

    let unknown = store.find_by_topic("Unknown.Topic");
    assert_eq!(unknown.len(), 1);
    assert_eq!(unknown[0].status(), MessageStatus::Received);

    let trade = store.find_by_topic("Trade.Created");
    assert_eq!(trade.len(), 1);
    assert_eq!(trade[0].status(), MessageStatus::Succeeded);

    // Unknown.Topic 从未触达任何处理器
    assert!(
        !journal
            .snapshot()
            .contains(&"handle:Unknown.Topic".to_string())
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn failing_handler_leaves_record_received_and_next_message_processed() {
    let journal = Journal::default();
    let handled = Arc::new(AtomicUsize::new(0));
    let store = InMemoryMessageStore::new();
    let broker = InMemoryBroker::new(64);

    let registry = Arc::new(
        SubscriberRegistry::builder()
            .subscribe(
                "Order.Failed",
                "G1",
                Arc::new(JournalingSubscriber {
                    name: "always-fails",
                    journal: journal.clone(),
                    handled: handled.clone(),
                    fail: true,
                }),
            )
            .subscribe(
                "Order.Created",
                "G1",
                Arc::new(JournalingSubscriber {
                    name: "order-created",
                    journal: journal.clone(),
                    handled: handled.clone(),
                    fail: false,
                }),
            )
            .build()
            .unwrap(),
    );

    let server = Arc::new(
        ConsumerServer::builder()
            .registry(registry)
            .client_factory(Arc::new(broker.clone()))
            .message_store(Arc::new(JournalingStore {
                inner: store.clone(),
                journal: journal.clone(),
            }))
            .config(fast_config())
            .build(),
    );
    let handle = server.start();

    tokio::time::sleep(Duration::from_millis(50)).await;
    broker.publish(DeliverMessage::new("Order.Failed", b"boom".to_vec()));
    wait_until(|| !store.find_by_topic("Order.Failed").is_empty()).await;

    // 同组后续消息仍被处理
    broker.publish(DeliverMessage::new("Order.Created", b"ok".to_vec()));
    wait_until(|| handled.load(Ordering::Relaxed) == 1).await;

    handle.shutdown();
    handle.join().await;

    let failed = store.find_by_topic("Order.Failed");
    assert_eq!(failed.len(), 1);
    // 处理器抛错：记录停留在 Received，无自动 Failed 迁移
    assert_eq!(failed[0].status(), MessageStatus::Received);

    let ok = store.find_by_topic("Order.Created");
    assert_eq!(ok.len(), 1);
    assert_eq!(ok[0].status(), MessageStatus::Succeeded);
}
