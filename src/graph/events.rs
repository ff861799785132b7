//! 运行过程事件：用于 CLI / 前端展示路由、专家结果与最终回复

use serde::Serialize;

use crate::core::{NextAgent, NodeId};

/// 单步过程事件（可序列化为 JSON 供前端展示）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GraphEvent {
    RunStarted { run_id: String },
    /// 即将执行某节点（第几步）
    NodeStarted { node: NodeId, step: usize },
    /// Supervisor 的路由决定
    Routed { next_agent: NextAgent },
    /// 专家结果（预览，避免过长）
    TaskResult { node: NodeId, preview: String },
    /// 追加到 messages 的回复（预览）
    MessageAppended { node: NodeId, preview: String },
    RunFinished { run_id: String, steps: usize },
}

/// 预览最大字符数
pub(crate) const PREVIEW_CHARS: usize = 200;

/// 按字符截断（不切断 UTF-8）
pub(crate) fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        text.to_string()
    } else {
        let cut: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}…")
    }
}
