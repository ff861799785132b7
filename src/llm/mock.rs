//! 无需 API 的 LLM 客户端
//!
//! - MockLlmClient：离线演示用。遇到路由指令时按关键词挑选专家名，其余请求回显最后一条 User 消息。
//! - ScriptedLlmClient：测试用。按顺序返回预置回复，并记录每次请求。

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::{last_user_content, Message, Role};
use crate::llm::{LlmClient, LlmError};

/// Mock 客户端
#[derive(Debug, Default)]
pub struct MockLlmClient;

impl MockLlmClient {
    fn classify(request: &str) -> &'static str {
        fn has(content: &str, keywords: &[&str]) -> bool {
            keywords.iter().any(|k| content.contains(k))
        }
        let lower = request.to_lowercase();

        if has(&lower, &["schedule", "meeting", "calendar", "appointment", "remind"]) {
            "calendar"
        } else if has(&lower, &["email", "e-mail", "mail to", "draft"]) {
            "email"
        } else if has(&lower, &["research", "trends", "find out", "investigate"]) {
            "research"
        } else {
            "respond"
        }
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        let system = messages
            .iter()
            .find(|m| m.role == Role::System)
            .map(|m| m.content.to_lowercase())
            .unwrap_or_default();
        let last_user = last_user_content(messages).unwrap_or("(no input)");

        if system.contains("route") {
            return Ok(Self::classify(last_user).to_string());
        }
        Ok(format!("Echo from Mock: {}", last_user))
    }
}

/// 预置回复的测试客户端
#[derive(Debug, Default)]
pub struct ScriptedLlmClient {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedLlmClient {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// 追加一条失败回复
    pub fn then_fail(self, err: LlmError) -> Self {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(Err(err));
        }
        self
    }

    /// 已收到的请求（按调用顺序）
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(messages.to_vec());
        }
        self.replies
            .lock()
            .map_err(|e| LlmError::Api(e.to_string()))?
            .pop_front()
            .unwrap_or(Err(LlmError::Exhausted))
    }
}
