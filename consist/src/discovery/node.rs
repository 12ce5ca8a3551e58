//! 节点记录（Node）
//!
use bon::Builder;
use serde::{Deserialize, Serialize};

/// 集群中一个存活节点的描述，由发现服务返回
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
pub struct Node {
    /// 节点标识
    id: String,
    /// 节点名称
    name: String,
    /// 节点地址
    address: String,
    /// 节点端口
    port: u16,
}

impl Node {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}
