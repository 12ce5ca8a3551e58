//! 订阅注册表（SubscriberRegistry）
//!
//! 以声明式注册在启动时一次性构建 topic -> 处理器 的映射：
//! - `resolve`：按 topic 解析零或一个描述符，供每次分发使用；
//! - `candidates`：按分组键聚合全部描述符，供启动时建立分组工作者。
//!
//! 构建完成后不可变，可被全部工作者无锁并发读取。
//!
use super::handler::TopicSubscriber;
use crate::error::{ConsistencyError, ConsistencyResult};
use std::collections::HashMap;
use std::sync::Arc;

/// 执行描述符：将 topic/分组 绑定到一个可调用的处理器
pub struct ExecutorDescriptor {
    topic: String,
    group: String,
    subscriber: Arc<dyn TopicSubscriber>,
}

impl ExecutorDescriptor {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn subscriber(&self) -> &Arc<dyn TopicSubscriber> {
        &self.subscriber
    }
}

/// 订阅注册表：启动时构建一次，进程生命周期内只读共享
#[derive(Clone, Default)]
pub struct SubscriberRegistry {
    by_topic: HashMap<String, Arc<ExecutorDescriptor>>,
}

impl SubscriberRegistry {
    pub fn builder() -> SubscriberRegistryBuilder {
        SubscriberRegistryBuilder::default()
    }

    /// 按 topic 解析描述符；零或一个匹配
    pub fn resolve(&self, topic: &str) -> Option<Arc<ExecutorDescriptor>> {
        self.by_topic.get(topic).cloned()
    }

    /// 按分组键聚合全部候选描述符，供启动时建立工作者
    pub fn candidates(&self) -> HashMap<String, Vec<Arc<ExecutorDescriptor>>> {
        let mut grouped: HashMap<String, Vec<Arc<ExecutorDescriptor>>> = HashMap::new();
        for descriptor in self.by_topic.values() {
            grouped
                .entry(descriptor.group().to_string())
                .or_default()
                .push(descriptor.clone());
        }
        grouped
    }

    pub fn is_empty(&self) -> bool {
        self.by_topic.is_empty()
    }
}

/// 声明式注册入口：逐条登记订阅，`build` 时校验 topic 唯一
#[derive(Default)]
pub struct SubscriberRegistryBuilder {
    entries: Vec<(String, String, Arc<dyn TopicSubscriber>)>,
}

impl SubscriberRegistryBuilder {
    pub fn subscribe(
        mut self,
        topic: impl Into<String>,
        group: impl Into<String>,
        subscriber: Arc<dyn TopicSubscriber>,
    ) -> Self {
        self.entries.push((topic.into(), group.into(), subscriber));
        self
    }

    /// 构建注册表；同一 topic 重复注册视为装配错误
    pub fn build(self) -> ConsistencyResult<SubscriberRegistry> {
        let mut by_topic = HashMap::with_capacity(self.entries.len());
        for (topic, group, subscriber) in self.entries {
            let descriptor = Arc::new(ExecutorDescriptor {
                topic: topic.clone(),
                group,
                subscriber,
            });
            if by_topic.insert(topic.clone(), descriptor).is_some() {
                return Err(ConsistencyError::DuplicateTopic { topic });
            }
        }
        Ok(SubscriberRegistry { by_topic })
    }
}
