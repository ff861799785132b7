//! Router：next_agent → 下一节点（纯函数）

use crate::core::{AgentError, NextAgent, NodeId};

/// 路由目的地
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Destination {
    Node(NodeId),
    Terminal,
}

/// 读取 Supervisor 写入的 next_agent，决定下一步；Unset / Supervisor 在此处不合法
pub fn route(next: NextAgent) -> Result<Destination, AgentError> {
    match next {
        NextAgent::Calendar => Ok(Destination::Node(NodeId::Calendar)),
        NextAgent::Email => Ok(Destination::Node(NodeId::Email)),
        NextAgent::Research => Ok(Destination::Node(NodeId::Research)),
        NextAgent::Respond => Ok(Destination::Node(NodeId::Respond)),
        NextAgent::Terminal => Ok(Destination::Terminal),
        NextAgent::Unset | NextAgent::Supervisor => Err(AgentError::Unroutable(next)),
    }
}
