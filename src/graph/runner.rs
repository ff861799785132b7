//! 图执行器：Supervisor ⇄ 专家 主循环
//!
//! 从 Supervisor 开始，每步只执行一个节点，合并其更新后决定下一步：
//! - 专家之后无条件回到 Supervisor
//! - Supervisor 之后由 Router 读取 next_agent
//! - Respond 之后结束
//!
//! 内置节点单轮最多 3 步（Supervisor → 专家 → Supervisor）；max_steps 只用来拦住注入的异常节点。

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::Instrument;

use crate::core::{AgentError, FieldUpdate, NextAgent, NodeId, StateUpdate, SupervisorState};
use crate::graph::events::{preview, GraphEvent};
use crate::graph::router::{route, Destination};
use crate::nodes::Node;

/// 一次运行的结果：最终状态与经过的节点
#[derive(Debug, Clone)]
pub struct RunResult {
    pub run_id: String,
    pub state: SupervisorState,
    pub visited: Vec<NodeId>,
}

impl RunResult {
    /// 对用户的最终回复（最后一条消息）
    pub fn reply(&self) -> Option<&str> {
        self.state.last_message().map(|m| m.content.as_str())
    }

    pub fn steps(&self) -> usize {
        self.visited.len()
    }
}

/// 编译好的 Supervisor 图
pub struct SupervisorGraph {
    nodes: HashMap<NodeId, Arc<dyn Node>>,
    max_steps: usize,
}

fn emit(events: Option<&mpsc::UnboundedSender<GraphEvent>>, event: GraphEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event);
    }
}

impl SupervisorGraph {
    pub(crate) fn new(nodes: HashMap<NodeId, Arc<dyn Node>>, max_steps: usize) -> Self {
        Self { nodes, max_steps }
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// 运行到 Terminal，返回最终状态
    pub async fn invoke(&self, state: SupervisorState) -> Result<RunResult, AgentError> {
        self.invoke_with_events(state, None).await
    }

    /// 同 invoke，并通过 events 推送过程事件
    pub async fn invoke_with_events(
        &self,
        state: SupervisorState,
        events: Option<&mpsc::UnboundedSender<GraphEvent>>,
    ) -> Result<RunResult, AgentError> {
        if state.last_user_message().is_none() {
            return Err(AgentError::MissingUserMessage);
        }

        let run_id = uuid::Uuid::new_v4().to_string();
        let span = tracing::info_span!("run", run_id = %run_id);
        self.run_loop(run_id, state, events).instrument(span).await
    }

    async fn run_loop(
        &self,
        run_id: String,
        mut state: SupervisorState,
        events: Option<&mpsc::UnboundedSender<GraphEvent>>,
    ) -> Result<RunResult, AgentError> {
        tracing::info!("Run started");
        emit(
            events,
            GraphEvent::RunStarted {
                run_id: run_id.clone(),
            },
        );

        let mut visited = Vec::new();
        let mut current = Destination::Node(NodeId::Supervisor);

        while let Destination::Node(id) = current {
            if visited.len() >= self.max_steps {
                tracing::warn!(max_steps = self.max_steps, "Step limit reached");
                return Err(AgentError::StepLimitExceeded(self.max_steps));
            }
            let node = self.nodes.get(&id).ok_or(AgentError::MissingNode(id))?;

            emit(
                events,
                GraphEvent::NodeStarted {
                    node: id,
                    step: visited.len() + 1,
                },
            );
            tracing::debug!(node = %id, step = visited.len() + 1, "Running node");

            let update = node.run(&state).await?;
            check_update(id, &update)?;
            visited.push(id);

            for message in &update.messages {
                let text = preview(&message.content);
                emit(events, GraphEvent::MessageAppended { node: id, preview: text });
            }
            if let FieldUpdate::Set(result) = &update.task_result {
                let text = preview(result);
                emit(events, GraphEvent::TaskResult { node: id, preview: text });
            }
            state.apply(update);

            current = match id {
                NodeId::Supervisor => {
                    emit(events, GraphEvent::Routed { next_agent: state.next_agent });
                    route(state.next_agent)?
                }
                NodeId::Respond => Destination::Terminal,
                NodeId::Calendar | NodeId::Email | NodeId::Research => {
                    Destination::Node(NodeId::Supervisor)
                }
            };
        }

        tracing::info!(steps = visited.len(), "Run finished");
        emit(
            events,
            GraphEvent::RunFinished {
                run_id: run_id.clone(),
                steps: visited.len(),
            },
        );

        Ok(RunResult {
            run_id,
            state,
            visited,
        })
    }
}

/// 专家只能写 task_result 并交回 Supervisor；Respond 必须显式结束
fn check_update(node: NodeId, update: &StateUpdate) -> Result<(), AgentError> {
    match node {
        NodeId::Supervisor => Ok(()),
        NodeId::Respond => match update.next_agent {
            Some(NextAgent::Terminal) => Ok(()),
            Some(next) => Err(AgentError::IllegalUpdate {
                node,
                next_agent: next,
            }),
            None => Err(AgentError::MissingTransition {
                node,
                expected: NextAgent::Terminal,
            }),
        },
        NodeId::Calendar | NodeId::Email | NodeId::Research => {
            if !update.messages.is_empty() {
                return Err(AgentError::SpecialistMessages(node));
            }
            match update.next_agent {
                Some(next) if next != NextAgent::Supervisor => Err(AgentError::IllegalUpdate {
                    node,
                    next_agent: next,
                }),
                _ => Ok(()),
            }
        }
    }
}
