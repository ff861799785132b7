//! 核心数据层：消息、共享状态与部分更新、错误类型

pub mod error;
pub mod message;
pub mod state;

pub use error::AgentError;
pub use message::{last_user_content, Message, Role};
pub use state::{
    append_messages, replace_or_clear, FieldUpdate, NextAgent, NodeId, SpecialistKind,
    StateUpdate, SupervisorState,
};
