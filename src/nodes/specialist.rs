//! 专家节点（日程 / 邮件 / 调研）
//!
//! 读取最近一条用户消息，用各自的 prompt 调用专家模型，把结果写入 task_result 并交回 Supervisor。
//! 专家从不追加 messages，面向用户的输出只由 Supervisor 汇总产生。

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::{AgentError, NextAgent, NodeId, SpecialistKind, StateUpdate, SupervisorState};
use crate::llm::LlmClient;
use crate::nodes::{Node, Prompts};

pub struct SpecialistNode {
    kind: SpecialistKind,
    llm: Arc<dyn LlmClient>,
    prompt: String,
}

impl SpecialistNode {
    pub fn new(kind: SpecialistKind, llm: Arc<dyn LlmClient>, prompts: &Prompts) -> Self {
        Self {
            kind,
            llm,
            prompt: prompts.specialist(kind).to_string(),
        }
    }

    pub fn kind(&self) -> SpecialistKind {
        self.kind
    }
}

#[async_trait]
impl Node for SpecialistNode {
    fn id(&self) -> NodeId {
        self.kind.node_id()
    }

    async fn run(&self, state: &SupervisorState) -> Result<StateUpdate, AgentError> {
        let request = state
            .last_user_message()
            .ok_or(AgentError::MissingUserMessage)?;

        let result = self.llm.generate(&self.prompt, request).await?;
        if result.trim().is_empty() {
            return Err(AgentError::EmptySpecialistResult(self.kind));
        }
        tracing::debug!(specialist = %self.kind, chars = result.len(), "Specialist finished");

        Ok(StateUpdate::new()
            .set_task_result(result)
            .route_to(NextAgent::Supervisor))
    }
}
