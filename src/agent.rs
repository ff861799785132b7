//! Headless 助手运行时
//!
//! 供 CLI 或其它前端调用：create_assistant 按配置创建两级 LLM 与 Supervisor 图，
//! ask 对单条请求跑完整个图并返回最终状态。每次请求都是独立的一次运行，不跨请求保留状态。

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::core::{AgentError, SupervisorState};
use crate::graph::{GraphBuilder, GraphEvent, RunResult, SupervisorGraph};
use crate::llm::{create_llm_from_config, LlmClient};
use crate::nodes::Prompts;

pub struct Assistant {
    graph: SupervisorGraph,
    supervisor_llm: Arc<dyn LlmClient>,
    specialist_llm: Arc<dyn LlmClient>,
}

/// 从配置创建助手：Supervisor / 专家两级模型、Prompt 覆盖、步数上限
pub fn create_assistant(cfg: &AppConfig) -> Result<Assistant, AgentError> {
    let supervisor_llm = create_llm_from_config(cfg, &cfg.llm.supervisor_model);
    let specialist_llm = create_llm_from_config(cfg, &cfg.llm.specialist_model);
    let prompts = Prompts::load(&cfg.app.prompts_dir);

    Assistant::new(supervisor_llm, specialist_llm, &prompts, cfg.app.max_steps)
}

impl Assistant {
    pub fn new(
        supervisor_llm: Arc<dyn LlmClient>,
        specialist_llm: Arc<dyn LlmClient>,
        prompts: &Prompts,
        max_steps: usize,
    ) -> Result<Self, AgentError> {
        let graph = GraphBuilder::new()
            .with_default_nodes(supervisor_llm.clone(), specialist_llm.clone(), prompts)
            .max_steps(max_steps)
            .build()?;

        Ok(Self {
            graph,
            supervisor_llm,
            specialist_llm,
        })
    }

    pub fn graph(&self) -> &SupervisorGraph {
        &self.graph
    }

    /// 处理单条用户请求
    pub async fn ask(&self, request: &str) -> Result<RunResult, AgentError> {
        self.graph.invoke(SupervisorState::new(request)).await
    }

    /// 同 ask，并通过 event_tx 推送过程事件
    pub async fn ask_with_events(
        &self,
        request: &str,
        event_tx: &mpsc::UnboundedSender<GraphEvent>,
    ) -> Result<RunResult, AgentError> {
        self.graph
            .invoke_with_events(SupervisorState::new(request), Some(event_tx))
            .await
    }

    /// 两级模型的累计 token 使用：(prompt, completion, total)
    pub fn token_usage(&self) -> (u64, u64, u64) {
        let (p1, c1, t1) = self.supervisor_llm.token_usage();
        if Arc::ptr_eq(&self.supervisor_llm, &self.specialist_llm) {
            return (p1, c1, t1);
        }
        let (p2, c2, t2) = self.specialist_llm.token_usage();
        (p1 + p2, c1 + c2, t1 + t2)
    }
}
