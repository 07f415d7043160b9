//! Provider-agnostic conversation types
//!
//! A conversation is an append-only `Vec<Message>` owned by the caller. Each
//! [`Message`] holds an ordered list of [`ContentBlock`]s so text and tool
//! interactions keep their interleaving.

use crate::error::{LadderError, LadderResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Caller input
    User,
    /// Model output
    Assistant,
    /// Tool execution results
    Tool,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::Tool => write!(f, "tool"),
        }
    }
}

/// A tool invocation requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier, unique within one assistant turn
    pub id: String,
    /// Name of the tool to call
    pub name: String,
    /// Named arguments
    #[serde(default)]
    pub arguments: HashMap<String, serde_json::Value>,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.arguments
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }
}

/// The serialized result of executing a tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Id of the originating [`ToolCall`]
    pub tool_call_id: String,
    /// Name of the originating tool
    pub name: String,
    /// Serialized execution result
    pub content: String,
}

impl ToolResponse {
    pub fn new(
        tool_call_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            name: name.into(),
            content: content.into(),
        }
    }
}

/// One ordered part of a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text
    Text { text: String },
    /// Model-requested tool invocation
    ToolCall(ToolCall),
    /// Result of a tool invocation
    ToolResponse(ToolResponse),
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn as_tool_call(&self) -> Option<&ToolCall> {
        match self {
            Self::ToolCall(call) => Some(call),
            _ => None,
        }
    }

    pub fn as_tool_response(&self) -> Option<&ToolResponse> {
        match self {
            Self::ToolResponse(response) => Some(response),
            _ => None,
        }
    }
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: MessageRole,
    /// Ordered content blocks
    pub content: Vec<ContentBlock>,
}

impl Message {
    /// Create a message from blocks
    pub fn new(role: MessageRole, content: Vec<ContentBlock>) -> Self {
        Self { role, content }
    }

    /// Create a new user text message
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, vec![ContentBlock::text(text)])
    }

    /// Create a new assistant text message
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, vec![ContentBlock::text(text)])
    }

    /// Create an assistant message carrying tool calls after an optional text
    pub fn assistant_with_tools(text: Option<String>, tool_calls: Vec<ToolCall>) -> Self {
        let mut content = Vec::with_capacity(tool_calls.len() + 1);
        if let Some(text) = text {
            content.push(ContentBlock::text(text));
        }
        content.extend(tool_calls.into_iter().map(ContentBlock::ToolCall));
        Self::new(MessageRole::Assistant, content)
    }

    /// Create a tool message carrying one or more results
    pub fn tool_responses(responses: Vec<ToolResponse>) -> Self {
        Self::new(
            MessageRole::Tool,
            responses.into_iter().map(ContentBlock::ToolResponse).collect(),
        )
    }

    /// Tool calls in order of appearance
    pub fn tool_calls(&self) -> impl Iterator<Item = &ToolCall> {
        self.content.iter().filter_map(ContentBlock::as_tool_call)
    }

    /// Tool responses in order of appearance
    pub fn tool_responses_iter(&self) -> impl Iterator<Item = &ToolResponse> {
        self.content.iter().filter_map(ContentBlock::as_tool_response)
    }

    /// Check if this message has tool calls
    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls().next().is_some()
    }

    /// All text blocks joined with newlines
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(ContentBlock::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Check the invariants of a conversation before it is sent anywhere.
///
/// - tool calls only appear in assistant messages, tool responses only in
///   tool messages
/// - tool call ids are non-empty and unique within their assistant turn
/// - every tool response references a tool call of an earlier message and
///   repeats that call's tool name
pub fn validate_conversation(messages: &[Message]) -> LadderResult<()> {
    // id -> tool name for every call seen so far
    let mut known_calls: HashMap<&str, &str> = HashMap::new();

    for (index, message) in messages.iter().enumerate() {
        let mut turn_ids: HashSet<&str> = HashSet::new();
        let mut turn_calls: Vec<(&str, &str)> = Vec::new();

        for block in &message.content {
            match block {
                ContentBlock::Text { .. } => {}
                ContentBlock::ToolCall(call) => {
                    if message.role != MessageRole::Assistant {
                        return Err(LadderError::malformed_message(
                            format!("tool call '{}' in a {} message", call.name, message.role),
                            index,
                        ));
                    }
                    if call.id.is_empty() {
                        return Err(LadderError::malformed_message(
                            format!("tool call '{}' has an empty id", call.name),
                            index,
                        ));
                    }
                    if !turn_ids.insert(call.id.as_str()) {
                        return Err(LadderError::malformed_message(
                            format!("duplicate tool call id '{}' in one turn", call.id),
                            index,
                        ));
                    }
                    turn_calls.push((call.id.as_str(), call.name.as_str()));
                }
                ContentBlock::ToolResponse(response) => {
                    if message.role != MessageRole::Tool {
                        return Err(LadderError::malformed_message(
                            format!(
                                "tool response for '{}' in a {} message",
                                response.tool_call_id, message.role
                            ),
                            index,
                        ));
                    }
                    match known_calls.get(response.tool_call_id.as_str()) {
                        None => {
                            return Err(LadderError::malformed_message(
                                format!(
                                    "tool response references unknown tool call id '{}'",
                                    response.tool_call_id
                                ),
                                index,
                            ));
                        }
                        // an empty name is unknown (Anthropic results carry none)
                        Some(name) if !response.name.is_empty() && *name != response.name => {
                            return Err(LadderError::malformed_message(
                                format!(
                                    "tool response for '{}' names '{}' but the call was '{}'",
                                    response.tool_call_id, response.name, name
                                ),
                                index,
                            ));
                        }
                        Some(_) => {}
                    }
                }
            }
        }

        // Calls become referenceable only after their own message
        known_calls.extend(turn_calls);
    }

    Ok(())
}
