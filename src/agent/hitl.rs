//! Human-in-the-loop (HITL) review vocabulary.
//!
//! Internal interrupt payload (action_requests, review_configs) and resume
//! decisions (approve, edit, reject), aligned with LangChain's
//! human-in-the-loop middleware contract. The agent-inbox wire format lives in
//! [`crate::agent::middleware::agent_inbox`]; these are the types on the
//! internal side of that translation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::agent::runtime::Runtime;
use crate::agent::state::AgentState;
use crate::schemas::messages::ToolCall;

/// Default allowed decisions when a tool is reviewed with no custom config.
pub const DEFAULT_ALLOWED_DECISIONS: [AllowedDecision; 3] = [
    AllowedDecision::Approve,
    AllowedDecision::Edit,
    AllowedDecision::Reject,
];

/// A decision kind the review policy may offer for a tool.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AllowedDecision {
    Approve,
    Edit,
    Reject,
}

/// Human decision for a pending tool call.
///
/// Wire shape: `{"type": "approve"}`, `{"type": "reject", "message": "..."}`,
/// `{"type": "edit", "edited_action": {...}}`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Decision {
    /// Execute the tool with the original arguments.
    Approve,

    /// Skip executing this tool call; `message` stands in for the tool result.
    Reject {
        /// The human's feedback, surfaced as a synthetic tool message.
        message: String,
    },

    /// Execute with a modified tool name and arguments.
    Edit {
        /// Replacement tool name and args.
        edited_action: EditedAction,
    },
}

impl Decision {
    /// The policy kind this decision exercises.
    pub fn kind(&self) -> AllowedDecision {
        match self {
            Decision::Approve => AllowedDecision::Approve,
            Decision::Reject { .. } => AllowedDecision::Reject,
            Decision::Edit { .. } => AllowedDecision::Edit,
        }
    }
}

/// Edited tool action for an "edit" decision.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EditedAction {
    /// Tool name.
    pub name: String,
    /// Tool arguments (typically a JSON object).
    pub args: Value,
}

/// Per-tool review policy entry.
///
/// A tool call needs human review when its name maps to an enabled entry; a
/// disabled entry auto-approves without removing the tool from the policy map.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct InterruptConfig {
    /// Whether to interrupt for this tool.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Allowed human decisions. Default: approve, edit, reject.
    #[serde(default = "default_allowed_decisions")]
    pub allowed_decisions: Vec<AllowedDecision>,
}

fn default_true() -> bool {
    true
}

fn default_allowed_decisions() -> Vec<AllowedDecision> {
    DEFAULT_ALLOWED_DECISIONS.to_vec()
}

impl Default for InterruptConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_decisions: default_allowed_decisions(),
        }
    }
}

impl InterruptConfig {
    /// Enable review with the default decisions (approve, edit, reject).
    pub fn enabled() -> Self {
        Self::default()
    }

    /// Disable review for this tool.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            allowed_decisions: default_allowed_decisions(),
        }
    }

    /// Enable with a specific set of allowed decisions.
    pub fn with_allowed_decisions(mut self, decisions: Vec<AllowedDecision>) -> Self {
        self.allowed_decisions = decisions;
        self
    }
}

/// One action pending human review (tool name + args + description).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionRequest {
    /// Tool name.
    pub name: String,
    /// Tool arguments (typically a JSON object).
    pub args: Value,
    /// Human-readable description shown alongside the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Review config for one action (allowed decisions).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewConfig {
    /// Allowed decision types.
    pub allowed_decisions: Vec<AllowedDecision>,
}

/// Combined review request for one reasoning step.
///
/// Invariant: `action_requests` and `review_configs` are equal length and
/// positionally aligned.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HitlRequest {
    /// Pending tool calls (name + args), in original tool-call order.
    pub action_requests: Vec<ActionRequest>,

    /// Per-action allowed decisions, same order as `action_requests`.
    pub review_configs: Vec<ReviewConfig>,
}

/// Builds the `(ActionRequest, ReviewConfig)` pair for one tool call pending
/// review.
///
/// Stands in for the framework helper that owns request presentation; it
/// receives the current state and runtime so implementations can enrich the
/// description with session context.
pub trait ActionRequestBuilder: Send + Sync {
    fn build(
        &self,
        tool_call: &ToolCall,
        config: &InterruptConfig,
        state: &AgentState,
        runtime: &Runtime,
    ) -> (ActionRequest, ReviewConfig);
}

/// Default builder: verbatim tool name and args, plain-text description.
pub struct DefaultActionRequestBuilder;

impl ActionRequestBuilder for DefaultActionRequestBuilder {
    fn build(
        &self,
        tool_call: &ToolCall,
        config: &InterruptConfig,
        _state: &AgentState,
        _runtime: &Runtime,
    ) -> (ActionRequest, ReviewConfig) {
        let description = format!(
            "Tool execution requires approval\n\nTool: {}\nArgs: {}",
            tool_call.name, tool_call.args
        );
        (
            ActionRequest {
                name: tool_call.name.clone(),
                args: tool_call.args.clone(),
                description: Some(description),
            },
            ReviewConfig {
                allowed_decisions: config.allowed_decisions.clone(),
            },
        )
    }
}
