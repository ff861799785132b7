//! Supervisor：两段式决策
//!
//! 1. 有待汇总的 task_result：把原始请求与专家结果交给模型汇总，追加为回复并结束运行；
//! 2. 否则：让模型在 calendar / email / research / respond 中选一个，写入 next_agent。
//!
//! 路由回复先 trim 再转小写后精确匹配，不认识的一律回退 respond，不会让运行失败。

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::{AgentError, Message, NextAgent, NodeId, StateUpdate, SupervisorState};
use crate::llm::LlmClient;
use crate::nodes::{Node, Prompts};

/// 解析路由回复
pub fn parse_route(reply: &str) -> NextAgent {
    match reply.trim().to_lowercase().as_str() {
        "calendar" => NextAgent::Calendar,
        "email" => NextAgent::Email,
        "research" => NextAgent::Research,
        _ => NextAgent::Respond,
    }
}

pub struct SupervisorNode {
    llm: Arc<dyn LlmClient>,
    route_prompt: String,
    synthesize_prompt: String,
}

impl SupervisorNode {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: &Prompts) -> Self {
        Self {
            llm,
            route_prompt: prompts.supervisor_route.clone(),
            synthesize_prompt: prompts.supervisor_synthesize.clone(),
        }
    }

    async fn synthesize(&self, request: &str, result: &str) -> Result<StateUpdate, AgentError> {
        let content = format!("Original request: {request}\n\nSpecialist result: {result}");
        let reply = self.llm.generate(&self.synthesize_prompt, &content).await?;

        Ok(StateUpdate::new()
            .with_message(Message::assistant(reply))
            .route_to(NextAgent::Terminal)
            .clear_task_result())
    }

    async fn route(&self, request: &str) -> Result<StateUpdate, AgentError> {
        let reply = self.llm.generate(&self.route_prompt, request).await?;
        let next = parse_route(&reply);

        if next == NextAgent::Respond && !reply.trim().eq_ignore_ascii_case("respond") {
            tracing::warn!(reply = %reply.trim(), "Unrecognized route, falling back to respond");
        }
        tracing::debug!(next = %next, "Supervisor routed request");

        Ok(StateUpdate::new().route_to(next))
    }
}

#[async_trait]
impl Node for SupervisorNode {
    fn id(&self) -> NodeId {
        NodeId::Supervisor
    }

    async fn run(&self, state: &SupervisorState) -> Result<StateUpdate, AgentError> {
        let request = state
            .last_user_message()
            .ok_or(AgentError::MissingUserMessage)?;

        match state.pending_result() {
            Some(result) => self.synthesize(request, result).await,
            None => self.route(request).await,
        }
    }
}
