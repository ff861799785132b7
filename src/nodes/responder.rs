//! 直接回复：不需要专家时由 Supervisor 模型以通用助手身份回答，并结束运行

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::{AgentError, Message, NextAgent, NodeId, StateUpdate, SupervisorState};
use crate::llm::LlmClient;
use crate::nodes::{Node, Prompts};

pub struct RespondNode {
    llm: Arc<dyn LlmClient>,
    prompt: String,
}

impl RespondNode {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: &Prompts) -> Self {
        Self {
            llm,
            prompt: prompts.respond.clone(),
        }
    }
}

#[async_trait]
impl Node for RespondNode {
    fn id(&self) -> NodeId {
        NodeId::Respond
    }

    async fn run(&self, state: &SupervisorState) -> Result<StateUpdate, AgentError> {
        let request = state
            .last_user_message()
            .ok_or(AgentError::MissingUserMessage)?;
        let reply = self.llm.generate(&self.prompt, request).await?;

        Ok(StateUpdate::new()
            .with_message(Message::assistant(reply))
            .route_to(NextAgent::Terminal))
    }
}
