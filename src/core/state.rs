//! 状态定义：SupervisorState 与部分更新（StateUpdate）
//!
//! 每个节点只读当前状态、返回自己改动的字段；由 Runner 通过按字段的 reducer 合并：
//! - messages：只追加，永不截断
//! - next_agent：有值则替换
//! - task_result：Keep / Set / Clear 三态

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::message::{last_user_content, Message};

/// 下一步去向（Supervisor 写入，Router 读取）
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NextAgent {
    /// 运行开始时尚未决策
    #[default]
    Unset,
    /// 专家完成后交回 Supervisor
    Supervisor,
    Calendar,
    Email,
    Research,
    /// 不需要专家，直接回复
    Respond,
    /// 结束本次运行
    Terminal,
}

impl NextAgent {
    pub fn as_str(&self) -> &'static str {
        match self {
            NextAgent::Unset => "unset",
            NextAgent::Supervisor => "supervisor",
            NextAgent::Calendar => "calendar",
            NextAgent::Email => "email",
            NextAgent::Research => "research",
            NextAgent::Respond => "respond",
            NextAgent::Terminal => "terminal",
        }
    }

    /// Supervisor 每一步之后必须落在这五个值之一
    pub fn is_supervisor_decision(&self) -> bool {
        matches!(
            self,
            NextAgent::Calendar
                | NextAgent::Email
                | NextAgent::Research
                | NextAgent::Respond
                | NextAgent::Terminal
        )
    }
}

impl fmt::Display for NextAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SpecialistKind> for NextAgent {
    fn from(kind: SpecialistKind) -> Self {
        match kind {
            SpecialistKind::Calendar => NextAgent::Calendar,
            SpecialistKind::Email => NextAgent::Email,
            SpecialistKind::Research => NextAgent::Research,
        }
    }
}

/// 专家种类：日程 / 邮件 / 调研
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecialistKind {
    Calendar,
    Email,
    Research,
}

impl SpecialistKind {
    pub const ALL: [SpecialistKind; 3] = [
        SpecialistKind::Calendar,
        SpecialistKind::Email,
        SpecialistKind::Research,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialistKind::Calendar => "calendar",
            SpecialistKind::Email => "email",
            SpecialistKind::Research => "research",
        }
    }

    pub fn node_id(&self) -> NodeId {
        match self {
            SpecialistKind::Calendar => NodeId::Calendar,
            SpecialistKind::Email => NodeId::Email,
            SpecialistKind::Research => NodeId::Research,
        }
    }
}

impl fmt::Display for SpecialistKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 图中的节点
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeId {
    Supervisor,
    Calendar,
    Email,
    Research,
    Respond,
}

impl NodeId {
    pub const ALL: [NodeId; 5] = [
        NodeId::Supervisor,
        NodeId::Calendar,
        NodeId::Email,
        NodeId::Research,
        NodeId::Respond,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeId::Supervisor => "supervisor",
            NodeId::Calendar => "calendar",
            NodeId::Email => "email",
            NodeId::Research => "research",
            NodeId::Respond => "respond",
        }
    }

    pub fn specialist(&self) -> Option<SpecialistKind> {
        match self {
            NodeId::Calendar => Some(SpecialistKind::Calendar),
            NodeId::Email => Some(SpecialistKind::Email),
            NodeId::Research => Some(SpecialistKind::Research),
            NodeId::Supervisor | NodeId::Respond => None,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 标量字段的三态更新
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    /// 不改动
    #[default]
    Keep,
    Set(T),
    Clear,
}

/// 节点返回的部分更新；未指定的字段保持不变
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateUpdate {
    pub messages: Vec<Message>,
    pub next_agent: Option<NextAgent>,
    pub task_result: FieldUpdate<String>,
}

impl StateUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn route_to(mut self, next: NextAgent) -> Self {
        self.next_agent = Some(next);
        self
    }

    pub fn set_task_result(mut self, result: impl Into<String>) -> Self {
        self.task_result = FieldUpdate::Set(result.into());
        self
    }

    pub fn clear_task_result(mut self) -> Self {
        self.task_result = FieldUpdate::Clear;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
            && self.next_agent.is_none()
            && self.task_result == FieldUpdate::Keep
    }
}

/// messages 的 reducer：只追加
pub fn append_messages(current: &mut Vec<Message>, new: Vec<Message>) {
    current.extend(new);
}

/// 可选标量的 reducer：Keep 不动，Set 替换，Clear 清空
pub fn replace_or_clear<T>(current: &mut Option<T>, update: FieldUpdate<T>) {
    match update {
        FieldUpdate::Keep => {}
        FieldUpdate::Set(value) => *current = Some(value),
        FieldUpdate::Clear => *current = None,
    }
}

/// 一次运行内唯一的共享状态
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorState {
    pub messages: Vec<Message>,
    pub next_agent: NextAgent,
    pub task_result: Option<String>,
}

impl SupervisorState {
    /// 以一条用户消息开始新的运行
    pub fn new(user_request: impl Into<String>) -> Self {
        Self::from_messages(vec![Message::user(user_request)])
    }

    /// 以调用方提供的历史开始（应至少含一条 User 消息，由 Runner 校验）
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            next_agent: NextAgent::Unset,
            task_result: None,
        }
    }

    /// 按字段合并部分更新
    pub fn apply(&mut self, update: StateUpdate) {
        append_messages(&mut self.messages, update.messages);
        if let Some(next) = update.next_agent {
            self.next_agent = next;
        }
        replace_or_clear(&mut self.task_result, update.task_result);
    }

    pub fn last_user_message(&self) -> Option<&str> {
        last_user_content(&self.messages)
    }

    /// 专家产出、尚待 Supervisor 汇总的结果（仅空串视为没有）
    pub fn pending_result(&self) -> Option<&str> {
        self.task_result.as_deref().filter(|r| !r.is_empty())
    }

    /// 最后一条消息（运行结束后即对用户的回复）
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}
