use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The author kind of a message in the running history.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum MessageType {
    #[serde(rename = "system")]
    SystemMessage,
    #[serde(rename = "ai")]
    AIMessage,
    #[default]
    #[serde(rename = "human")]
    HumanMessage,
    #[serde(rename = "tool")]
    ToolMessage,
}

/// A tool call proposed by the model inside an AI message.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolCall {
    /// Identifier, unique within the containing message.
    pub id: String,
    /// Tool name.
    pub name: String,
    /// Tool arguments (typically a JSON object).
    pub args: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, args: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            args,
        }
    }
}

/// A single message in the conversation history.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub content: String,
    pub message_type: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Tool calls proposed by this message (AI messages only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// For tool messages, the id of the tool call this message answers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    pub fn new_ai_message(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            message_type: MessageType::AIMessage,
            id: None,
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn new_human_message(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            message_type: MessageType::HumanMessage,
            id: None,
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn new_system_message(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            message_type: MessageType::SystemMessage,
            id: None,
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// A tool-result message answering the tool call with id `tool_call_id`.
    pub fn new_tool_message(content: impl Into<String>, tool_call_id: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            message_type: MessageType::ToolMessage,
            id: None,
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_tool_calls(mut self, tool_calls: Vec<ToolCall>) -> Self {
        self.tool_calls = tool_calls;
        self
    }

    pub fn is_ai(&self) -> bool {
        matches!(self.message_type, MessageType::AIMessage)
    }
}
