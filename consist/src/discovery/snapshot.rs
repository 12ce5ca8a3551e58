//! 节点快照（NodeSnapshot）
//!
//! 进程级的存活节点缓存：由后台任务周期刷新，监控读路径以
//! 非阻塞方式读取，替代“统计路径上同步查询发现服务”的做法。
//! 显式注入共享，不使用环境级单例。
//!
use super::node::Node;
use std::sync::RwLock;

/// 存活节点的进程级快照：后台刷新、读路径非阻塞
#[derive(Default)]
pub struct NodeSnapshot {
    nodes: RwLock<Vec<Node>>,
}

impl NodeSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// 用最新查询结果整体替换快照
    pub fn replace(&self, nodes: Vec<Node>) {
        *self.nodes.write().unwrap() = nodes;
    }

    /// 当前快照中的节点数
    pub fn node_count(&self) -> usize {
        self.nodes.read().unwrap().len()
    }

    /// 当前快照的节点列表
    pub fn nodes(&self) -> Vec<Node> {
        self.nodes.read().unwrap().clone()
    }

    /// 监控面的服务器计数：快照为空时至少包含当前进程自身
    pub fn server_count(&self) -> usize {
        self.node_count().max(1)
    }
}
