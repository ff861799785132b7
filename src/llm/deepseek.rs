//! DeepSeek 端点（OpenAI 兼容协议），provider = "deepseek" 时使用

use crate::llm::OpenAiClient;

pub const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";
pub const DEEPSEEK_CHAT: &str = "deepseek-chat";

/// DEEPSEEK_API_KEY 优先，其次 OPENAI_API_KEY
pub fn deepseek_api_key() -> Option<String> {
    std::env::var("DEEPSEEK_API_KEY")
        .or_else(|_| std::env::var("OPENAI_API_KEY"))
        .ok()
        .filter(|key| !key.is_empty())
}

/// 配置里的模型层级（默认是 gpt-4o / gpt-4o-mini）在 DeepSeek 上不存在，非 deepseek-* 的一律换成 deepseek-chat
pub fn deepseek_model(model: &str) -> &str {
    if model.starts_with("deepseek") {
        model
    } else {
        DEEPSEEK_CHAT
    }
}

/// 没有可用 Key 时返回 None，由调用方回退
pub fn deepseek_client(model: &str, timeout_secs: u64) -> Option<OpenAiClient> {
    let api_key = deepseek_api_key()?;
    let client = OpenAiClient::new(
        Some(DEEPSEEK_BASE_URL),
        deepseek_model(model),
        Some(api_key.as_str()),
    );
    Some(client.with_request_timeout(timeout_secs))
}
