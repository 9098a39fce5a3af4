//! End-to-end tests for the agent-inbox middleware.
//!
//! Drives the post-reasoning hook with scripted interrupt handlers standing in
//! for the hosting runtime's suspension mechanism: `Resumed` plays the re-run
//! after the human replied, `Pending` the first run that has to pause.

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use agent_inbox_middleware::agent::{
    AgentInboxMiddleware, AgentInboxResponse, AgentState, AllowedDecision, InterruptConfig,
    Middleware, MiddlewareError, Runtime,
};
use agent_inbox_middleware::interrupts::{InterruptError, InterruptHandler};
use agent_inbox_middleware::schemas::{Message, MessageType, ToolCall};

/// Handler that already has the human's replies.
struct Resumed {
    responses: Vec<AgentInboxResponse>,
    sent: Mutex<Option<Value>>,
}

impl Resumed {
    fn new(responses: Vec<AgentInboxResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses,
            sent: Mutex::new(None),
        })
    }

    fn sent(&self) -> Option<Value> {
        self.sent.lock().unwrap().clone()
    }
}

impl InterruptHandler for Resumed {
    fn interrupt(&self, value: Value) -> Result<Value, InterruptError> {
        *self.sent.lock().unwrap() = Some(value);
        Ok(serde_json::to_value(&self.responses).unwrap())
    }
}

/// Handler with no resume value: always pauses.
struct Pending;

impl InterruptHandler for Pending {
    fn interrupt(&self, value: Value) -> Result<Value, InterruptError> {
        Err(InterruptError::new(value))
    }
}

fn ai_message() -> Message {
    Message::new_ai_message("").with_tool_calls(vec![
        ToolCall::new("call-a", "send_email", json!({"to": "a@b.c"})),
        ToolCall::new("call-b", "search", json!({"q": "rust"})),
    ])
}

fn two_call_state() -> AgentState {
    AgentState::with_messages(vec![Message::new_human_message("hi"), ai_message()])
}

#[test]
fn accept_keeps_all_tool_calls() {
    let _ = env_logger::builder().is_test(true).try_init();

    let handler = Resumed::new(vec![AgentInboxResponse::accept()]);
    let middleware = AgentInboxMiddleware::new(handler.clone())
        .with_interrupt_on("send_email", InterruptConfig::enabled());

    let mut state = two_call_state();
    let update = middleware
        .after_model(&mut state, &Runtime::default())
        .unwrap()
        .unwrap();

    // revised AI message only, no synthetic messages
    assert_eq!(update.messages.len(), 1);
    assert_eq!(update.messages[0].tool_calls, ai_message().tool_calls);
    assert_eq!(state.messages[1].tool_calls, ai_message().tool_calls);

    // the outbound payload carried exactly the reviewed call
    let sent = handler.sent().unwrap();
    assert_eq!(sent.as_array().unwrap().len(), 1);
    assert_eq!(sent[0]["action_request"]["action"], json!("send_email"));
    assert_eq!(sent[0]["config"]["allow_ignore"], json!(false));
}

#[test]
fn response_drops_call_and_emits_tool_message() {
    let handler = Resumed::new(vec![AgentInboxResponse::response("no thanks")]);
    let middleware = AgentInboxMiddleware::new(handler)
        .with_interrupt_on("send_email", InterruptConfig::enabled());

    let mut state = two_call_state();
    let update = middleware
        .after_model(&mut state, &Runtime::default())
        .unwrap()
        .unwrap();

    assert_eq!(update.messages.len(), 2);
    assert_eq!(update.messages[0].tool_calls.len(), 1);
    assert_eq!(update.messages[0].tool_calls[0].name, "search");

    let synthetic = &update.messages[1];
    assert_eq!(synthetic.message_type, MessageType::ToolMessage);
    assert_eq!(synthetic.content, "no thanks");
    assert_eq!(synthetic.tool_call_id.as_deref(), Some("call-a"));
}

#[test]
fn edit_rewrites_call_in_place() {
    let handler = Resumed::new(vec![AgentInboxResponse::edit(
        "send_email_v2",
        json!({"x": 1}),
    )]);
    let middleware = AgentInboxMiddleware::new(handler)
        .with_interrupt_on("send_email", InterruptConfig::enabled());

    let mut state = two_call_state();
    let update = middleware
        .after_model(&mut state, &Runtime::default())
        .unwrap()
        .unwrap();

    assert_eq!(update.messages.len(), 1);
    let calls = &update.messages[0].tool_calls;
    assert_eq!(calls.len(), 2);
    // edited call keeps its id and position
    assert_eq!(calls[0].id, "call-a");
    assert_eq!(calls[0].name, "send_email_v2");
    assert_eq!(calls[0].args, json!({"x": 1}));
    assert_eq!(calls[1].name, "search");
}

#[test]
fn decisions_apply_in_original_call_order() {
    let handler = Resumed::new(vec![
        AgentInboxResponse::accept(),
        AgentInboxResponse::response("skip it"),
    ]);
    let middleware = AgentInboxMiddleware::new(handler)
        .with_interrupt_on("send_email", InterruptConfig::enabled())
        .with_interrupt_on("delete_row", InterruptConfig::enabled());

    let ai = Message::new_ai_message("").with_tool_calls(vec![
        ToolCall::new("call-a", "send_email", json!({})),
        ToolCall::new("call-b", "search", json!({})),
        ToolCall::new("call-c", "delete_row", json!({"id": 7})),
    ]);
    let mut state = AgentState::with_messages(vec![ai]);

    let update = middleware
        .after_model(&mut state, &Runtime::default())
        .unwrap()
        .unwrap();

    let names: Vec<&str> = update.messages[0]
        .tool_calls
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["send_email", "search"]);
    assert_eq!(update.messages[1].tool_call_id.as_deref(), Some("call-c"));
    assert_eq!(update.messages[1].content, "skip it");
}

#[test]
fn decision_count_mismatch_leaves_state_untouched() {
    let handler = Resumed::new(vec![
        AgentInboxResponse::accept(),
        AgentInboxResponse::accept(),
    ]);
    let middleware = AgentInboxMiddleware::new(handler)
        .with_interrupt_on("send_email", InterruptConfig::enabled());

    let mut state = two_call_state();
    let err = middleware
        .after_model(&mut state, &Runtime::default())
        .unwrap_err();

    assert!(matches!(
        err,
        MiddlewareError::DecisionCountMismatch {
            decisions: 2,
            pending: 1
        }
    ));
    assert_eq!(state.messages[1].tool_calls, ai_message().tool_calls);
}

#[test]
fn pause_propagates_payload_and_leaves_state_untouched() {
    let middleware = AgentInboxMiddleware::new(Arc::new(Pending))
        .with_interrupt_on("send_email", InterruptConfig::enabled());

    let mut state = two_call_state();
    let err = middleware
        .after_model(&mut state, &Runtime::default())
        .unwrap_err();

    match err {
        MiddlewareError::Interrupt(payload) => {
            assert_eq!(payload[0]["action_request"]["action"], json!("send_email"));
        }
        other => panic!("expected Interrupt, got: {other:?}"),
    }
    assert_eq!(state.messages[1].tool_calls, ai_message().tool_calls);
}

#[test]
fn no_reviewed_tool_calls_is_a_noop() {
    let handler = Resumed::new(vec![AgentInboxResponse::accept()]);
    let middleware = AgentInboxMiddleware::new(handler.clone())
        .with_interrupt_on("delete_database", InterruptConfig::enabled());

    let mut state = two_call_state();
    let update = middleware
        .after_model(&mut state, &Runtime::default())
        .unwrap();

    assert!(update.is_none());
    assert!(handler.sent().is_none());
}

#[test]
fn empty_history_is_a_noop() {
    let middleware = AgentInboxMiddleware::new(Arc::new(Pending))
        .with_interrupt_on("send_email", InterruptConfig::enabled());

    let mut state = AgentState::new();
    assert!(middleware
        .after_model(&mut state, &Runtime::default())
        .unwrap()
        .is_none());
}

#[test]
fn ai_message_without_tool_calls_is_a_noop() {
    let middleware = AgentInboxMiddleware::new(Arc::new(Pending))
        .with_interrupt_on("send_email", InterruptConfig::enabled());

    let mut state = AgentState::with_messages(vec![
        Message::new_human_message("hi"),
        Message::new_ai_message("just text"),
    ]);
    assert!(middleware
        .after_model(&mut state, &Runtime::default())
        .unwrap()
        .is_none());
}

#[test]
fn only_most_recent_ai_message_is_inspected() {
    let middleware = AgentInboxMiddleware::new(Arc::new(Pending))
        .with_interrupt_on("send_email", InterruptConfig::enabled());

    // earlier AI message would need review, the latest one does not
    let mut state = AgentState::with_messages(vec![
        ai_message(),
        Message::new_human_message("actually, wait"),
        Message::new_ai_message("ok")
            .with_tool_calls(vec![ToolCall::new("call-z", "search", json!({}))]),
    ]);
    assert!(middleware
        .after_model(&mut state, &Runtime::default())
        .unwrap()
        .is_none());
}

#[test]
fn disabled_policy_entry_auto_approves() {
    let middleware = AgentInboxMiddleware::new(Arc::new(Pending))
        .with_interrupt_on("send_email", InterruptConfig::disabled());

    let mut state = two_call_state();
    assert!(middleware
        .after_model(&mut state, &Runtime::default())
        .unwrap()
        .is_none());
}

#[test]
fn decision_kind_not_offered_is_rejected() {
    let handler = Resumed::new(vec![AgentInboxResponse::edit("other", json!({}))]);
    let middleware = AgentInboxMiddleware::new(handler).with_interrupt_on(
        "send_email",
        InterruptConfig::enabled().with_allowed_decisions(vec![AllowedDecision::Approve]),
    );

    let mut state = two_call_state();
    let err = middleware
        .after_model(&mut state, &Runtime::default())
        .unwrap_err();

    assert!(matches!(err, MiddlewareError::InvalidArgument(_)));
    assert_eq!(state.messages[1].tool_calls, ai_message().tool_calls);
}

#[test]
fn ignore_reply_aborts_the_step() {
    let handler = Resumed::new(vec![AgentInboxResponse::ignore()]);
    let middleware = AgentInboxMiddleware::new(handler)
        .with_interrupt_on("send_email", InterruptConfig::enabled());

    let mut state = two_call_state();
    let err = middleware
        .after_model(&mut state, &Runtime::default())
        .unwrap_err();

    assert!(matches!(err, MiddlewareError::UnsupportedOperation(_)));
    assert_eq!(state.messages[1].tool_calls, ai_message().tool_calls);
}

#[tokio::test]
async fn async_entry_point_matches_sync_path() {
    let handler = Resumed::new(vec![AgentInboxResponse::accept()]);
    let middleware = AgentInboxMiddleware::new(handler)
        .with_interrupt_on("send_email", InterruptConfig::enabled());

    let mut state = two_call_state();
    let update = middleware
        .aafter_model(&mut state, &Runtime::default())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(update.messages.len(), 1);
    assert_eq!(update.messages[0].tool_calls, ai_message().tool_calls);
}
