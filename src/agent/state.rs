use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::schemas::messages::Message;

/// Mutable agent state that flows through execution.
///
/// The adapter only reads and rewrites `messages`; `custom_fields` is carried
/// for parity with the hosting runtime's state shape.
#[derive(Clone, Debug, Default)]
pub struct AgentState {
    /// Conversation messages.
    pub messages: Vec<Message>,
    /// Custom fields set by the hosting runtime or other middleware.
    pub custom_fields: HashMap<String, Value>,
}

impl AgentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            custom_fields: HashMap::new(),
        }
    }

    pub fn get_field(&self, key: &str) -> Option<&Value> {
        self.custom_fields.get(key)
    }

    pub fn set_field(&mut self, key: String, value: Value) {
        self.custom_fields.insert(key, value);
    }
}

/// Partial state update returned by a middleware hook.
///
/// For the post-reasoning hook this is the revised AI message followed by any
/// synthetic tool messages for rejected calls, in decision order.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct StateUpdate {
    pub messages: Vec<Message>,
}
