//! Agent 错误类型
//!
//! 路由歧义在 Supervisor 内部就地兜底（回退 respond），不会出现在这里；
//! 这里只有会终止本次运行的错误：模型调用失败、状态不合法、图配置错误。

use thiserror::Error;

use crate::core::state::{NextAgent, NodeId, SpecialistKind};
use crate::llm::LlmError;

#[derive(Error, Debug)]
pub enum AgentError {
    /// 文本生成能力失败，原样向上传播
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("No user message in state")]
    MissingUserMessage,

    #[error("Specialist '{0}' returned an empty result")]
    EmptySpecialistResult(SpecialistKind),

    #[error("Cannot route on next_agent = {0}")]
    Unroutable(NextAgent),

    #[error("Node '{node}' may not set next_agent = {next_agent}")]
    IllegalUpdate { node: NodeId, next_agent: NextAgent },

    #[error("Node '{node}' must set next_agent = {expected}")]
    MissingTransition { node: NodeId, expected: NextAgent },

    #[error("Specialist '{0}' may not append messages")]
    SpecialistMessages(NodeId),

    #[error("Run exceeded {0} steps without reaching terminal")]
    StepLimitExceeded(usize),

    #[error("Graph has no node registered for '{0}'")]
    MissingNode(NodeId),

    #[error("Config error: {0}")]
    Config(String),
}
