//! Human-in-the-loop middleware compatible with agent-inbox.
//!
//! Behaves like LangChain's `HumanInTheLoopMiddleware`, but emits interrupt
//! payloads in the agent-inbox format and accepts agent-inbox replies. The
//! translation is bidirectional:
//!
//! - outbound: [`HitlRequest`] pairs become [`AgentInboxInterrupt`] payloads,
//!   one per pending review, allowed decisions mapped to capability flags;
//! - inbound: [`AgentInboxResponse`] replies become [`Decision`]s
//!   (`accept` → approve, `response` → reject with message, `edit` → edit;
//!   `ignore` is never offered and always fails).

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Middleware, MiddlewareError};
use crate::agent::hitl::{
    ActionRequest, ActionRequestBuilder, AllowedDecision, Decision, DefaultActionRequestBuilder,
    EditedAction, HitlRequest, InterruptConfig, ReviewConfig,
};
use crate::agent::runtime::Runtime;
use crate::agent::state::{AgentState, StateUpdate};
use crate::interrupts::InterruptHandler;
use crate::schemas::messages::{Message, ToolCall};

/// Action request with name and arguments for agent-inbox.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentInboxActionRequest {
    pub action: String,
    pub args: Value,
}

/// Allowed human responses for one agent-inbox interrupt.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentInboxConfig {
    pub allow_ignore: bool,
    pub allow_respond: bool,
    pub allow_edit: bool,
    pub allow_accept: bool,
}

/// Full interrupt payload for agent-inbox.
///
/// Serializes to the exact wire shape the inbox UI validates:
/// `{ action_request, config, description }` with `description: null` when
/// absent.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentInboxInterrupt {
    pub action_request: AgentInboxActionRequest,
    pub config: AgentInboxConfig,
    pub description: Option<String>,
}

/// Response from a human via agent-inbox.
///
/// The kind stays a raw string and the args loose JSON on purpose: a payload
/// that does not match its declared kind must surface as
/// [`MiddlewareError::InvalidArgument`], not as a deserialization failure.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentInboxResponse {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub args: Option<Value>,
}

impl AgentInboxResponse {
    pub fn accept() -> Self {
        Self {
            kind: "accept".to_string(),
            args: None,
        }
    }

    pub fn ignore() -> Self {
        Self {
            kind: "ignore".to_string(),
            args: None,
        }
    }

    /// Free-text feedback; maps to a reject decision carrying the message.
    pub fn response(message: impl Into<String>) -> Self {
        Self {
            kind: "response".to_string(),
            args: Some(Value::String(message.into())),
        }
    }

    /// Edited action; maps to an edit decision.
    pub fn edit(action: impl Into<String>, args: Value) -> Self {
        Self {
            kind: "edit".to_string(),
            args: Some(serde_json::json!({ "action": action.into(), "args": args })),
        }
    }
}

/// Human-in-the-loop middleware speaking the agent-inbox interrupt format.
///
/// After each reasoning step, tool calls whose names map to an enabled
/// [`InterruptConfig`] are collected into one combined review request,
/// translated to agent-inbox payloads, and handed to the injected
/// [`InterruptHandler`]. The human's replies are translated back into
/// decisions and applied in order: approved calls pass through, edited calls
/// are rewritten, rejected calls are dropped and answered with a synthetic
/// tool message.
///
/// # Example
/// ```rust,ignore
/// use agent_inbox_middleware::agent::{AgentInboxMiddleware, AllowedDecision, InterruptConfig};
///
/// let middleware = AgentInboxMiddleware::new(handler)
///     .with_interrupt_on("send_email", InterruptConfig::enabled())
///     .with_interrupt_on(
///         "delete_database",
///         InterruptConfig::enabled()
///             .with_allowed_decisions(vec![AllowedDecision::Approve, AllowedDecision::Reject]),
///     );
/// ```
pub struct AgentInboxMiddleware {
    interrupt_on: HashMap<String, InterruptConfig>,
    handler: Arc<dyn InterruptHandler>,
    builder: Arc<dyn ActionRequestBuilder>,
}

impl AgentInboxMiddleware {
    pub fn new(handler: Arc<dyn InterruptHandler>) -> Self {
        Self {
            interrupt_on: HashMap::new(),
            handler,
            builder: Arc::new(DefaultActionRequestBuilder),
        }
    }

    /// Require review for a specific tool.
    pub fn with_interrupt_on(mut self, tool_name: impl Into<String>, config: InterruptConfig) -> Self {
        self.interrupt_on.insert(tool_name.into(), config);
        self
    }

    /// Require review for multiple tools at once.
    pub fn with_interrupt_on_map(mut self, interrupt_map: HashMap<String, InterruptConfig>) -> Self {
        self.interrupt_on.extend(interrupt_map);
        self
    }

    /// Replace the action-request builder (defaults to
    /// [`DefaultActionRequestBuilder`]).
    pub fn with_action_request_builder(mut self, builder: Arc<dyn ActionRequestBuilder>) -> Self {
        self.builder = builder;
        self
    }

    /// Transform a [`HitlRequest`] into agent-inbox interrupt payloads.
    ///
    /// One payload per aligned pair, same order. Capability flags are derived
    /// from the pair's allowed decisions; `allow_ignore` is always `false`.
    pub fn to_agent_inbox_format(
        &self,
        hitl_request: &HitlRequest,
    ) -> Result<Vec<AgentInboxInterrupt>, MiddlewareError> {
        if hitl_request.action_requests.len() != hitl_request.review_configs.len() {
            return Err(MiddlewareError::InvalidArgument(format!(
                "misaligned review request: {} action requests vs {} review configs",
                hitl_request.action_requests.len(),
                hitl_request.review_configs.len(),
            )));
        }

        let interrupts = hitl_request
            .action_requests
            .iter()
            .zip(&hitl_request.review_configs)
            .map(|(action_request, review_config)| {
                let allowed = &review_config.allowed_decisions;
                AgentInboxInterrupt {
                    action_request: AgentInboxActionRequest {
                        action: action_request.name.clone(),
                        args: action_request.args.clone(),
                    },
                    config: AgentInboxConfig {
                        allow_accept: allowed.contains(&AllowedDecision::Approve),
                        allow_edit: allowed.contains(&AllowedDecision::Edit),
                        // ignore is not supported
                        allow_ignore: false,
                        allow_respond: allowed.contains(&AllowedDecision::Reject),
                    },
                    description: action_request.description.clone(),
                }
            })
            .collect();

        Ok(interrupts)
    }

    /// Transform agent-inbox responses into middleware decisions, in order.
    pub fn from_agent_inbox_format(
        &self,
        responses: &[AgentInboxResponse],
    ) -> Result<Vec<Decision>, MiddlewareError> {
        let mut decisions = Vec::with_capacity(responses.len());

        for response in responses {
            let decision = match response.kind.as_str() {
                "accept" => Decision::Approve,
                "ignore" => {
                    return Err(MiddlewareError::UnsupportedOperation(
                        "ignore response is not supported".to_string(),
                    ))
                }
                // Free-text feedback maps to reject with the human's message.
                "response" => match &response.args {
                    Some(Value::String(message)) => Decision::Reject {
                        message: message.clone(),
                    },
                    other => {
                        return Err(MiddlewareError::InvalidArgument(format!(
                            "response args must be a string, got: {other:?}"
                        )))
                    }
                },
                // Edited arguments arrive as {action, args}.
                "edit" => match &response.args {
                    Some(Value::Object(map)) => {
                        let name = map
                            .get("action")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string();
                        let args = map
                            .get("args")
                            .cloned()
                            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
                        Decision::Edit {
                            edited_action: EditedAction { name, args },
                        }
                    }
                    other => {
                        return Err(MiddlewareError::InvalidArgument(format!(
                            "edit response must have object args, got: {other:?}"
                        )))
                    }
                },
                other => {
                    return Err(MiddlewareError::InvalidArgument(format!(
                        "invalid agent-inbox response type: {other}"
                    )))
                }
            };
            decisions.push(decision);
        }

        Ok(decisions)
    }

    /// Apply one decision to its tool call.
    ///
    /// Returns the surviving (possibly edited) tool call and/or the synthetic
    /// tool message standing in for a rejected call's result.
    fn apply_decision(
        &self,
        decision: Decision,
        tool_call: ToolCall,
        config: &InterruptConfig,
    ) -> Result<(Option<ToolCall>, Option<Message>), MiddlewareError> {
        if !config.allowed_decisions.contains(&decision.kind()) {
            return Err(MiddlewareError::InvalidArgument(format!(
                "decision '{:?}' is not allowed for tool '{}'",
                decision.kind(),
                tool_call.name,
            )));
        }

        Ok(match decision {
            Decision::Approve => (Some(tool_call), None),
            Decision::Reject { message } => {
                let tool_message = Message::new_tool_message(message, tool_call.id);
                (None, Some(tool_message))
            }
            Decision::Edit { edited_action } => {
                let mut revised = tool_call;
                revised.name = edited_action.name;
                revised.args = edited_action.args;
                (Some(revised), None)
            }
        })
    }
}

impl Middleware for AgentInboxMiddleware {
    /// Trigger review flows for relevant tool calls after an AI message.
    ///
    /// Pauses through the interrupt handler when any tool call needs review;
    /// on resume, rebuilds the AI message's tool-call list from the human's
    /// decisions and returns it together with any synthetic tool messages.
    /// On any error the message history is left untouched.
    fn after_model(
        &self,
        state: &mut AgentState,
        runtime: &Runtime,
    ) -> Result<Option<StateUpdate>, MiddlewareError> {
        let Some(ai_idx) = state.messages.iter().rposition(Message::is_ai) else {
            return Ok(None);
        };
        if state.messages[ai_idx].tool_calls.is_empty() {
            return Ok(None);
        }
        let tool_calls = state.messages[ai_idx].tool_calls.clone();

        // Collect action requests and review configs for tool calls that need
        // review, preserving original index order.
        let mut action_requests: Vec<ActionRequest> = Vec::new();
        let mut review_configs: Vec<ReviewConfig> = Vec::new();
        let mut pending: Vec<(usize, &InterruptConfig)> = Vec::new();

        for (idx, tool_call) in tool_calls.iter().enumerate() {
            let Some(config) = self
                .interrupt_on
                .get(&tool_call.name)
                .filter(|config| config.enabled)
            else {
                continue;
            };
            let (action_request, review_config) =
                self.builder.build(tool_call, config, state, runtime);
            action_requests.push(action_request);
            review_configs.push(review_config);
            pending.push((idx, config));
        }

        if pending.is_empty() {
            return Ok(None);
        }

        let hitl_request = HitlRequest {
            action_requests,
            review_configs,
        };
        let interrupts = self.to_agent_inbox_format(&hitl_request)?;
        log::debug!(
            "requesting human review for {} of {} tool calls",
            interrupts.len(),
            tool_calls.len()
        );

        let resume = self.handler.interrupt(serde_json::to_value(&interrupts)?)?;
        let responses: Vec<AgentInboxResponse> = serde_json::from_value(resume)
            .map_err(|e| {
                MiddlewareError::InvalidArgument(format!("malformed agent-inbox responses: {e}"))
            })?;
        let decisions = self.from_agent_inbox_format(&responses)?;

        if decisions.len() != pending.len() {
            return Err(MiddlewareError::DecisionCountMismatch {
                decisions: decisions.len(),
                pending: pending.len(),
            });
        }

        // Rebuild the tool-call list in original order; decisions keep, alter,
        // or drop calls but never reorder them.
        let mut revised_tool_calls: Vec<ToolCall> = Vec::with_capacity(tool_calls.len());
        let mut artificial_tool_messages: Vec<Message> = Vec::new();
        let mut reviewed = pending.into_iter().zip(decisions).peekable();

        for (idx, tool_call) in tool_calls.into_iter().enumerate() {
            if reviewed.peek().map(|((i, _), _)| *i) == Some(idx) {
                if let Some(((_, config), decision)) = reviewed.next() {
                    let (revised, tool_message) =
                        self.apply_decision(decision, tool_call, config)?;
                    if let Some(revised) = revised {
                        revised_tool_calls.push(revised);
                    }
                    if let Some(tool_message) = tool_message {
                        artificial_tool_messages.push(tool_message);
                    }
                }
            } else {
                // Auto-approved: keep the original call.
                revised_tool_calls.push(tool_call);
            }
        }

        log::debug!(
            "human review resolved: {} tool calls kept, {} rejected",
            revised_tool_calls.len(),
            artificial_tool_messages.len()
        );

        // All decisions validated; only now touch the message history.
        state.messages[ai_idx].tool_calls = revised_tool_calls;

        let mut messages = Vec::with_capacity(1 + artificial_tool_messages.len());
        messages.push(state.messages[ai_idx].clone());
        messages.extend(artificial_tool_messages);

        Ok(Some(StateUpdate { messages }))
    }
}
