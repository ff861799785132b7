//! 图构建器
//!
//! 提供流畅的 API 注册节点；build 时校验五个节点齐全。

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::{AgentError, NodeId, SpecialistKind};
use crate::graph::runner::SupervisorGraph;
use crate::llm::LlmClient;
use crate::nodes::{Node, Prompts, RespondNode, SpecialistNode, SupervisorNode};

/// 默认单次运行步数上限
pub const DEFAULT_MAX_STEPS: usize = 8;

pub struct GraphBuilder {
    nodes: HashMap<NodeId, Arc<dyn Node>>,
    max_steps: usize,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// 注册标准节点：Supervisor 与 Respond 用 supervisor_llm，三个专家用 specialist_llm
    pub fn with_default_nodes(
        self,
        supervisor_llm: Arc<dyn LlmClient>,
        specialist_llm: Arc<dyn LlmClient>,
        prompts: &Prompts,
    ) -> Self {
        let mut builder = self
            .node(SupervisorNode::new(supervisor_llm.clone(), prompts))
            .node(RespondNode::new(supervisor_llm, prompts));
        for kind in SpecialistKind::ALL {
            builder = builder.node(SpecialistNode::new(kind, specialist_llm.clone(), prompts));
        }
        builder
    }

    /// 注册（或替换）节点，位置由 Node::id 决定
    pub fn node(self, node: impl Node + 'static) -> Self {
        self.shared_node(Arc::new(node))
    }

    pub fn shared_node(mut self, node: Arc<dyn Node>) -> Self {
        self.nodes.insert(node.id(), node);
        self
    }

    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn build(self) -> Result<SupervisorGraph, AgentError> {
        if let Some(missing) = NodeId::ALL.iter().find(|id| !self.nodes.contains_key(*id)) {
            return Err(AgentError::MissingNode(*missing));
        }
        if self.max_steps == 0 {
            return Err(AgentError::Config("max_steps must be at least 1".to_string()));
        }
        Ok(SupervisorGraph::new(self.nodes, self.max_steps))
    }
}
