//! Supervisor 图集成测试

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use steward::core::{
    AgentError, Message, NextAgent, NodeId, SpecialistKind, StateUpdate, SupervisorState,
};
use steward::graph::{GraphBuilder, GraphEvent, SupervisorGraph};
use steward::llm::{LlmClient, LlmError, ScriptedLlmClient};
use steward::nodes::{Node, Prompts, SupervisorNode};
use tokio::sync::mpsc;

fn graph_with(
    supervisor: &Arc<ScriptedLlmClient>,
    specialist: &Arc<ScriptedLlmClient>,
) -> GraphBuilder {
    let supervisor: Arc<dyn LlmClient> = supervisor.clone();
    let specialist: Arc<dyn LlmClient> = specialist.clone();
    GraphBuilder::new().with_default_nodes(supervisor, specialist, &Prompts::default())
}

fn build(
    supervisor: &Arc<ScriptedLlmClient>,
    specialist: &Arc<ScriptedLlmClient>,
) -> SupervisorGraph {
    graph_with(supervisor, specialist)
        .build()
        .expect("graph should build")
}

/// 包一层 Supervisor，记录每次进入时的 task_result 与合并后的 next_agent
struct RecordingSupervisor {
    inner: SupervisorNode,
    seen_task_result: Mutex<Vec<Option<String>>>,
    decisions: Mutex<Vec<NextAgent>>,
}

#[async_trait]
impl Node for RecordingSupervisor {
    fn id(&self) -> NodeId {
        NodeId::Supervisor
    }

    async fn run(&self, state: &SupervisorState) -> Result<StateUpdate, AgentError> {
        self.seen_task_result.lock().unwrap().push(state.task_result.clone());
        let update = self.inner.run(state).await?;
        let mut after = state.clone();
        after.apply(update.clone());
        self.decisions.lock().unwrap().push(after.next_agent);
        Ok(update)
    }
}

fn recording(llm: &Arc<ScriptedLlmClient>) -> Arc<RecordingSupervisor> {
    Arc::new(RecordingSupervisor {
        inner: SupervisorNode::new(llm.clone(), &Prompts::default()),
        seen_task_result: Mutex::new(Vec::new()),
        decisions: Mutex::new(Vec::new()),
    })
}

#[tokio::test]
async fn test_calendar_request_is_synthesized_and_terminates() {
    let supervisor = Arc::new(ScriptedLlmClient::new([
        "calendar",
        "Done! Your meeting is on Tuesday at 2pm.",
    ]));
    let specialist = Arc::new(ScriptedLlmClient::new(["Event: team meeting, Tuesday 14:00"]));
    let graph = build(&supervisor, &specialist);

    let result = graph
        .invoke(SupervisorState::new("Schedule a meeting Tuesday 2pm"))
        .await
        .unwrap();

    assert_eq!(
        result.visited,
        vec![NodeId::Supervisor, NodeId::Calendar, NodeId::Supervisor]
    );
    assert_eq!(result.state.next_agent, NextAgent::Terminal);
    assert_eq!(result.state.task_result, None);
    assert_eq!(
        result.state.messages,
        vec![
            Message::user("Schedule a meeting Tuesday 2pm"),
            Message::assistant("Done! Your meeting is on Tuesday at 2pm."),
        ]
    );
    assert_eq!(result.reply(), Some("Done! Your meeting is on Tuesday at 2pm."));

    // 汇总请求带上了原始请求和专家结果
    let synthesis = &supervisor.requests()[1];
    assert!(synthesis[1].content.contains("Schedule a meeting Tuesday 2pm"));
    assert!(synthesis[1].content.contains("Event: team meeting, Tuesday 14:00"));
    assert_eq!(specialist.call_count(), 1);
}

#[tokio::test]
async fn test_unmatched_request_falls_back_to_respond() {
    let supervisor = Arc::new(ScriptedLlmClient::new([
        "philosophy",
        "Kant did not write a weather philosophy.",
    ]));
    let specialist = Arc::new(ScriptedLlmClient::new(Vec::<String>::new()));
    let graph = build(&supervisor, &specialist);

    let result = graph
        .invoke(SupervisorState::new("What's the weather philosophy of Kant?"))
        .await
        .unwrap();

    assert_eq!(result.visited, vec![NodeId::Supervisor, NodeId::Respond]);
    assert_eq!(result.state.next_agent, NextAgent::Terminal);
    assert_eq!(result.reply(), Some("Kant did not write a weather philosophy."));
    assert_eq!(result.state.messages.len(), 2);
    assert_eq!(specialist.call_count(), 0);
    // Respond 使用的是通用助手 prompt
    assert_eq!(supervisor.requests()[1][0].content, Prompts::default().respond);
}

#[tokio::test]
async fn test_mixed_case_route_is_normalized() {
    let supervisor = Arc::new(ScriptedLlmClient::new(["  Calendar \n", "All set."]));
    let specialist = Arc::new(ScriptedLlmClient::new(["Tuesday 2pm"]));
    let graph = build(&supervisor, &specialist);

    let result = graph
        .invoke(SupervisorState::new("Book Tuesday 2pm"))
        .await
        .unwrap();

    assert_eq!(result.visited[1], NodeId::Calendar);
    assert_eq!(
        specialist.requests()[0][0].content,
        Prompts::default().specialist(SpecialistKind::Calendar)
    );
}

#[tokio::test]
async fn test_task_result_cleared_once_by_synthesis() {
    let supervisor = Arc::new(ScriptedLlmClient::new(["email", "Here is your draft."]));
    let specialist = Arc::new(ScriptedLlmClient::new(["Subject: Launch\n\nHi team, ..."]));
    let recorder = recording(&supervisor);
    let specialist_llm: Arc<dyn LlmClient> = specialist.clone();
    let supervisor_llm: Arc<dyn LlmClient> = supervisor.clone();
    let graph = GraphBuilder::new()
        .with_default_nodes(supervisor_llm, specialist_llm, &Prompts::default())
        .shared_node(recorder.clone())
        .build()
        .unwrap();

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let result = graph
        .invoke_with_events(
            SupervisorState::new("Draft an email to the marketing team about the product launch"),
            Some(&event_tx),
        )
        .await
        .unwrap();
    drop(event_tx);

    // 第一次进入没有结果，第二次进入时结果待汇总
    assert_eq!(
        *recorder.seen_task_result.lock().unwrap(),
        vec![None, Some("Subject: Launch\n\nHi team, ...".to_string())]
    );
    assert_eq!(result.state.task_result, None);

    let mut events = Vec::new();
    while let Some(event) = event_rx.recv().await {
        events.push(event);
    }
    let task_results = events
        .iter()
        .filter(|e| matches!(e, GraphEvent::TaskResult { .. }))
        .count();
    assert_eq!(task_results, 1);
    assert!(matches!(events.first(), Some(GraphEvent::RunStarted { .. })));
    assert!(matches!(events.last(), Some(GraphEvent::RunFinished { steps: 3, .. })));
    assert!(events.contains(&GraphEvent::Routed {
        next_agent: NextAgent::Email
    }));
    assert!(events.contains(&GraphEvent::Routed {
        next_agent: NextAgent::Terminal
    }));
}

#[tokio::test]
async fn test_supervisor_always_leaves_a_routable_decision() {
    let replies = [
        "calendar", "email", "research", "respond", "weather", "", "TERMINAL", "supervisor",
    ];

    for reply in replies {
        let supervisor = Arc::new(ScriptedLlmClient::new([reply, "final answer"]));
        let specialist = Arc::new(ScriptedLlmClient::new(["specialist output"]));
        let recorder = recording(&supervisor);
        let graph = graph_with(&supervisor, &specialist)
            .shared_node(recorder.clone())
            .build()
            .unwrap();

        let result = graph.invoke(SupervisorState::new("help me")).await.unwrap();

        for decision in recorder.decisions.lock().unwrap().iter() {
            assert!(
                decision.is_supervisor_decision(),
                "reply {reply:?} left next_agent = {decision}"
            );
        }
        // 单轮请求最多 3 步
        assert!(result.steps() <= 3, "reply {reply:?} took {} steps", result.steps());
        assert_eq!(result.state.next_agent, NextAgent::Terminal);
        assert_eq!(result.state.task_result, None);
    }
}

#[tokio::test]
async fn test_whitespace_task_result_is_synthesized_and_cleared() {
    let supervisor = Arc::new(ScriptedLlmClient::new(["Nothing useful came back."]));
    let specialist = Arc::new(ScriptedLlmClient::new(Vec::<String>::new()));
    let graph = build(&supervisor, &specialist);

    let mut state = SupervisorState::new("hello");
    state.task_result = Some("   ".to_string());
    let result = graph.invoke(state).await.unwrap();

    assert_eq!(result.visited, vec![NodeId::Supervisor]);
    assert_eq!(result.state.next_agent, NextAgent::Terminal);
    assert_eq!(result.state.task_result, None);
    assert_eq!(result.reply(), Some("Nothing useful came back."));
    assert!(supervisor.requests()[0][1]
        .content
        .contains("Specialist result:    "));
}

#[tokio::test]
async fn test_each_specialist_returns_to_supervisor() {
    for kind in SpecialistKind::ALL {
        let supervisor = Arc::new(ScriptedLlmClient::new([kind.as_str(), "final"]));
        let specialist = Arc::new(ScriptedLlmClient::new(["result"]));
        let graph = build(&supervisor, &specialist);

        let result = graph.invoke(SupervisorState::new("task")).await.unwrap();
        assert_eq!(
            result.visited,
            vec![NodeId::Supervisor, kind.node_id(), NodeId::Supervisor]
        );
        assert_eq!(result.reply(), Some("final"));
    }
}

#[tokio::test]
async fn test_uses_most_recent_user_message_from_history() {
    let supervisor = Arc::new(ScriptedLlmClient::new(["research", "summary"]));
    let specialist = Arc::new(ScriptedLlmClient::new(["findings"]));
    let graph = build(&supervisor, &specialist);

    let state = SupervisorState::from_messages(vec![
        Message::user("Schedule lunch"),
        Message::assistant("Lunch is booked."),
        Message::user("Research the latest trends in AI agents"),
    ]);
    let result = graph.invoke(state).await.unwrap();

    assert_eq!(
        specialist.requests()[0][1].content,
        "Research the latest trends in AI agents"
    );
    // 历史只追加，不截断
    assert_eq!(result.state.messages.len(), 4);
    assert_eq!(result.state.messages[0], Message::user("Schedule lunch"));
}

#[tokio::test]
async fn test_capability_failure_propagates() {
    let supervisor = Arc::new(ScriptedLlmClient::new(["research"]));
    let specialist = Arc::new(
        ScriptedLlmClient::new(Vec::<String>::new())
            .then_fail(LlmError::Api("503 Service Unavailable".into())),
    );
    let graph = build(&supervisor, &specialist);

    let err = graph
        .invoke(SupervisorState::new("Research Rust async runtimes"))
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::Llm(LlmError::Api(ref msg)) if msg.contains("503")));
    // 不重试
    assert_eq!(specialist.call_count(), 1);
}

#[tokio::test]
async fn test_synthesis_failure_is_fatal() {
    let supervisor =
        Arc::new(ScriptedLlmClient::new(["calendar"]).then_fail(LlmError::Timeout(60)));
    let specialist = Arc::new(ScriptedLlmClient::new(["Tuesday"]));
    let graph = build(&supervisor, &specialist);

    let err = graph
        .invoke(SupervisorState::new("Schedule a meeting"))
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::Llm(LlmError::Timeout(60))));
}

#[tokio::test]
async fn test_run_without_user_message_is_rejected() {
    let supervisor = Arc::new(ScriptedLlmClient::new(["calendar"]));
    let specialist = Arc::new(ScriptedLlmClient::new(["unused"]));
    let graph = build(&supervisor, &specialist);

    let err = graph
        .invoke(SupervisorState::from_messages(vec![Message::system("setup")]))
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::MissingUserMessage));
    assert_eq!(supervisor.call_count(), 0);
}

/// 试图直接结束运行的专家
struct RogueSpecialist;

#[async_trait]
impl Node for RogueSpecialist {
    fn id(&self) -> NodeId {
        NodeId::Research
    }

    async fn run(&self, _state: &SupervisorState) -> Result<StateUpdate, AgentError> {
        Ok(StateUpdate::new()
            .set_task_result("done")
            .route_to(NextAgent::Terminal))
    }
}

#[tokio::test]
async fn test_specialist_cannot_terminate() {
    let supervisor = Arc::new(ScriptedLlmClient::new(["research", "final"]));
    let specialist = Arc::new(ScriptedLlmClient::new(Vec::<String>::new()));
    let graph = graph_with(&supervisor, &specialist)
        .node(RogueSpecialist)
        .build()
        .unwrap();

    let err = graph.invoke(SupervisorState::new("research")).await.unwrap_err();
    assert!(matches!(
        err,
        AgentError::IllegalUpdate {
            node: NodeId::Research,
            next_agent: NextAgent::Terminal
        }
    ));
}

/// 什么都不写回的专家：Supervisor 会反复路由
struct SilentSpecialist;

#[async_trait]
impl Node for SilentSpecialist {
    fn id(&self) -> NodeId {
        NodeId::Calendar
    }

    async fn run(&self, _state: &SupervisorState) -> Result<StateUpdate, AgentError> {
        Ok(StateUpdate::new())
    }
}

#[tokio::test]
async fn test_step_limit_stops_runaway_loop() {
    let supervisor = Arc::new(ScriptedLlmClient::new(["calendar"; 10]));
    let specialist = Arc::new(ScriptedLlmClient::new(Vec::<String>::new()));
    let graph = graph_with(&supervisor, &specialist)
        .node(SilentSpecialist)
        .max_steps(4)
        .build()
        .unwrap();

    let err = graph.invoke(SupervisorState::new("meeting")).await.unwrap_err();
    assert!(matches!(err, AgentError::StepLimitExceeded(4)));
    // Supervisor → Calendar → Supervisor → Calendar
    assert_eq!(supervisor.call_count(), 2);
}

/// 越权往 messages 里写回复的专家
struct ChattySpecialist;

#[async_trait]
impl Node for ChattySpecialist {
    fn id(&self) -> NodeId {
        NodeId::Email
    }

    async fn run(&self, _state: &SupervisorState) -> Result<StateUpdate, AgentError> {
        Ok(StateUpdate::new()
            .with_message(Message::assistant("Sent!"))
            .set_task_result("sent")
            .route_to(NextAgent::Supervisor))
    }
}

#[tokio::test]
async fn test_specialist_cannot_append_messages() {
    let supervisor = Arc::new(ScriptedLlmClient::new(["email", "final"]));
    let specialist = Arc::new(ScriptedLlmClient::new(Vec::<String>::new()));
    let graph = graph_with(&supervisor, &specialist)
        .node(ChattySpecialist)
        .build()
        .unwrap();

    let err = graph.invoke(SupervisorState::new("email bob")).await.unwrap_err();
    assert!(matches!(err, AgentError::SpecialistMessages(NodeId::Email)));
    assert_eq!(supervisor.call_count(), 1);
}

/// 回复了但没有写 Terminal 的 Respond
struct OpenEndedResponder;

#[async_trait]
impl Node for OpenEndedResponder {
    fn id(&self) -> NodeId {
        NodeId::Respond
    }

    async fn run(&self, _state: &SupervisorState) -> Result<StateUpdate, AgentError> {
        Ok(StateUpdate::new().with_message(Message::assistant("hi")))
    }
}

#[tokio::test]
async fn test_respond_must_set_terminal() {
    let supervisor = Arc::new(ScriptedLlmClient::new(["respond"]));
    let specialist = Arc::new(ScriptedLlmClient::new(Vec::<String>::new()));
    let graph = graph_with(&supervisor, &specialist)
        .node(OpenEndedResponder)
        .build()
        .unwrap();

    let err = graph.invoke(SupervisorState::new("hello")).await.unwrap_err();
    assert!(matches!(
        err,
        AgentError::MissingTransition {
            node: NodeId::Respond,
            expected: NextAgent::Terminal
        }
    ));
}
