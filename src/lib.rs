//! Steward - Rust 个人助理（Supervisor + 专家路由）
//!
//! 模块划分：
//! - **agent**: 无头助手运行时（供 CLI 等调用）
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 消息、共享状态与部分更新、错误类型
//! - **graph**: Router、图构建器、执行器、过程事件
//! - **llm**: LLM 客户端抽象与实现（OpenAI 兼容 / DeepSeek / Mock）
//! - **nodes**: Supervisor、日程 / 邮件 / 调研专家、直接回复
//! - **observability**: 日志初始化
//!
//! ```text
//!  START ──► Supervisor ──(terminal)──► END
//!              │  ▲
//!     route()  │  │ task_result
//!     ┌────────┼──┴─────┐
//!     ▼        ▼        ▼
//!  calendar  email  research
//!
//!  Supervisor ──(respond)──► respond ──► END
//! ```

pub mod agent;
pub mod config;
pub mod core;
pub mod graph;
pub mod llm;
pub mod nodes;
pub mod observability;

pub use agent::{create_assistant, Assistant};
pub use graph::{GraphBuilder, RunResult, SupervisorGraph};
