//! LLM 客户端抽象
//!
//! 核心只依赖「发送指令 + 内容，拿回文本」这一能力；所有后端（OpenAI 兼容 / DeepSeek / Mock / Scripted）实现 LlmClient。

use async_trait::async_trait;
use thiserror::Error;

use crate::core::Message;

/// 文本生成失败；核心层不重试，直接终止本次运行
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// 请求构造失败（参数非法等）
    #[error("Invalid request: {0}")]
    Request(String),

    /// 后端返回错误（网络、鉴权、限流等）
    #[error("API error: {0}")]
    Api(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Model returned no content")]
    EmptyResponse,

    /// 预置回复已用完（ScriptedLlmClient）
    #[error("No scripted reply left")]
    Exhausted,
}

/// LLM 客户端 trait
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// 非流式完成
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError>;

    /// 以 system 指令 + 单条 user 内容调用模型
    async fn generate(&self, instructions: &str, content: &str) -> Result<String, LlmError> {
        let messages = [Message::system(instructions), Message::user(content)];
        self.complete(&messages).await
    }

    /// 获取累计 token 使用统计：(prompt_tokens, completion_tokens, total_tokens)
    /// 默认返回 (0, 0, 0)，具体实现可覆盖
    fn token_usage(&self) -> (u64, u64, u64) {
        (0, 0, 0)
    }
}
