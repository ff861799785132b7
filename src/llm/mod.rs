//! LLM 层：客户端抽象与实现（OpenAI 兼容 / DeepSeek / Mock / Scripted）

pub mod deepseek;
pub mod mock;
pub mod openai;
pub mod traits;

use std::sync::Arc;

use crate::config::AppConfig;

pub use deepseek::deepseek_client;
pub use mock::{MockLlmClient, ScriptedLlmClient};
pub use openai::{OpenAiClient, TokenUsage};
pub use traits::{LlmClient, LlmError};

/// 根据配置与环境变量选择 LLM 后端（DeepSeek / OpenAI 兼容 / Mock），`model` 为该层级使用的模型名
pub fn create_llm_from_config(cfg: &AppConfig, model: &str) -> Arc<dyn LlmClient> {
    let provider = cfg.llm.provider.to_lowercase();
    let timeout = cfg.llm.timeouts.request;

    if provider == "mock" {
        tracing::info!("Using Mock LLM (configured)");
        return Arc::new(MockLlmClient);
    }

    if provider == "deepseek" {
        if let Some(client) = deepseek_client(model, timeout) {
            tracing::info!("Using DeepSeek LLM ({})", client.model());
            return Arc::new(client);
        }
        tracing::warn!("provider = deepseek but no API key set, using Mock LLM");
        return Arc::new(MockLlmClient);
    }

    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => {
            let base = cfg.llm.base_url.as_deref();
            tracing::info!("Using OpenAI LLM ({})", model);
            let client = OpenAiClient::new(base, model, Some(key.as_str()));
            Arc::new(client.with_request_timeout(timeout))
        }
        _ => {
            tracing::warn!("No API key set or provider unknown, using Mock LLM");
            Arc::new(MockLlmClient)
        }
    }
}
