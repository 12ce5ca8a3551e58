//! 配置（ConsistencyOptions / DiscoveryOptions）
//!
//! 以 builder 方式装配运行所需配置：
//! - `ConsistencyOptions`：消费侧可识别的配置面（broker 地址、统计轮询间隔等）；
//! - `DiscoveryOptions`：节点发现配置，存在与否决定是否启用成员上报。
//!
use bon::Builder;
use std::time::Duration;

/// 消费侧配置面
#[derive(Debug, Clone, Builder)]
pub struct ConsistencyOptions {
    /// 创建每组消费客户端时使用的 broker 端点地址集合
    #[builder(default)]
    broker_url_list: Vec<String>,
    /// 监控面挂载路径（由外部监控面消费，核心不使用）
    #[builder(default = "/".to_string())]
    app_path: String,
    /// 节点统计快照的后台刷新间隔
    #[builder(default = Duration::from_secs(2))]
    stats_polling_interval: Duration,
    /// 节点发现配置；存在即启用成员上报
    discovery: Option<DiscoveryOptions>,
}

impl ConsistencyOptions {
    pub fn broker_url_list(&self) -> &[String] {
        &self.broker_url_list
    }

    pub fn app_path(&self) -> &str {
        &self.app_path
    }

    pub fn stats_polling_interval(&self) -> Duration {
        self.stats_polling_interval
    }

    pub fn discovery(&self) -> Option<&DiscoveryOptions> {
        self.discovery.as_ref()
    }
}

impl Default for ConsistencyOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// 节点发现配置
#[derive(Debug, Clone, Builder)]
pub struct DiscoveryOptions {
    /// 发现服务主机名
    #[builder(default = "localhost".to_string())]
    discovery_server_host: String,
    /// 发现服务端口
    #[builder(default = 8500)]
    discovery_server_port: u16,
    /// 当前节点标识
    node_id: String,
    /// 当前节点名称
    node_name: String,
    /// 当前节点对外主机名
    #[builder(default = "localhost".to_string())]
    current_node_host_name: String,
    /// 当前节点对外端口
    current_node_port: u16,
    /// 监控面匹配路径
    #[builder(default = "/consist".to_string())]
    match_path: String,
}

impl DiscoveryOptions {
    pub fn discovery_server_host(&self) -> &str {
        &self.discovery_server_host
    }

    pub fn discovery_server_port(&self) -> u16 {
        self.discovery_server_port
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn node_name(&self) -> &str {
        &self.node_name
    }

    pub fn current_node_host_name(&self) -> &str {
        &self.current_node_host_name
    }

    pub fn current_node_port(&self) -> u16 {
        self.current_node_port
    }

    pub fn match_path(&self) -> &str {
        &self.match_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_defaults() {
        let opts = ConsistencyOptions::default();
        assert!(opts.broker_url_list().is_empty());
        assert_eq!(opts.app_path(), "/");
        assert_eq!(opts.stats_polling_interval(), Duration::from_secs(2));
        assert!(opts.discovery().is_none());
    }

    #[test]
    fn discovery_presence_toggles_reporting() {
        let opts = ConsistencyOptions::builder()
            .broker_url_list(vec!["amqp://localhost:5672".into()])
            .discovery(
                DiscoveryOptions::builder()
                    .node_id("n-1".to_string())
                    .node_name("worker-1".to_string())
                    .current_node_port(5000)
                    .build(),
            )
            .build();
        assert!(opts.discovery().is_some());
        assert_eq!(opts.discovery().unwrap().discovery_server_port(), 8500);
    }
}
