//! 编排层：Router、图构建器、执行器与过程事件

pub mod builder;
pub mod events;
pub mod router;
pub mod runner;

pub use builder::{GraphBuilder, DEFAULT_MAX_STEPS};
pub use events::GraphEvent;
pub use router::{route, Destination};
pub use runner::{RunResult, SupervisorGraph};
