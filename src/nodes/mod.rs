//! 图节点：Supervisor、日程 / 邮件 / 调研专家、直接回复
//!
//! 每个节点读取当前状态、调用一次 LLM、返回部分更新（StateUpdate），不直接修改状态。

pub mod prompts;
pub mod responder;
pub mod specialist;
pub mod supervisor;

use async_trait::async_trait;

use crate::core::{AgentError, NodeId, StateUpdate, SupervisorState};

pub use prompts::Prompts;
pub use responder::RespondNode;
pub use specialist::SpecialistNode;
pub use supervisor::{parse_route, SupervisorNode};

/// 图节点 trait
#[async_trait]
pub trait Node: Send + Sync {
    /// 节点在图中的位置
    fn id(&self) -> NodeId;

    /// 执行一步，返回需要合并的字段
    async fn run(&self, state: &SupervisorState) -> Result<StateUpdate, AgentError>;
}
