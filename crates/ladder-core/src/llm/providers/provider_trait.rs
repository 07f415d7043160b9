//! The fixed interface every provider implements

use crate::error::LadderResult;
use crate::llm::messages::Message;
use crate::llm::provider_types::LlmProvider;
use crate::llm::tool_types::{ToolChoice, ToolDefinition};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// A fully converted request, ready for one network call
#[derive(Debug, Clone, PartialEq)]
pub struct WireRequest {
    /// Provider model identifier
    pub model: String,
    /// Converted conversation
    pub messages: Vec<Value>,
    /// Converted tool declarations
    pub tools: Vec<Value>,
    /// Converted tool choice; `None` lets the provider default apply
    pub tool_choice: Option<Value>,
    pub system_prompt: Option<String>,
    pub max_tokens: u32,
    /// Upper bound for the whole request/response cycle
    pub timeout: Duration,
}

/// Conversion and transport for one provider
///
/// Adding a provider means implementing exactly this trait. Conversions are
/// pure; `invoke` performs a single network call without retrying and reports
/// failures through the error taxonomy.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Which provider this adapter talks to
    fn provider(&self) -> LlmProvider;

    /// Convert one message. Returns several wire messages when the provider
    /// needs one message per tool result.
    fn to_wire_messages(&self, message: &Message) -> Vec<Value>;

    /// Convert one tool definition, preserving its `required` list
    fn to_wire_tool(&self, tool: &ToolDefinition) -> Value;

    /// Convert the tool choice, or `None` when the provider has no equivalent
    fn to_wire_tool_choice(&self, choice: &ToolChoice) -> Option<Value>;

    /// Perform exactly one network call
    async fn invoke(&self, request: &WireRequest) -> LadderResult<Value>;

    /// Parse a response body into a message. `turn` is the position the
    /// message will take in the conversation and seeds generated tool-call ids.
    ///
    /// Anthropic `tool_result` blocks carry no tool name, so tool responses
    /// parsed from them have an empty `name`; `validate_conversation`
    /// treats that as unknown rather than a mismatch.
    fn from_wire_response(&self, response: &Value, turn: usize) -> LadderResult<Message>;
}

/// Settings that shape a request but are not part of the conversation
#[derive(Debug, Clone, Copy)]
pub struct RequestLimits {
    pub max_tokens: u32,
    pub timeout: Duration,
}

/// Convert a conversation and tool set into a [`WireRequest`] for `adapter`
///
/// Tool choice is only sent when tools are offered.
pub fn build_wire_request(
    adapter: &dyn ProviderAdapter,
    model: &str,
    messages: &[Message],
    tools: &[ToolDefinition],
    tool_choice: &ToolChoice,
    system_prompt: Option<&str>,
    limits: RequestLimits,
) -> WireRequest {
    let wire_messages = messages
        .iter()
        .flat_map(|m| adapter.to_wire_messages(m))
        .collect();
    let wire_tools: Vec<Value> = tools.iter().map(|t| adapter.to_wire_tool(t)).collect();
    let wire_choice = if wire_tools.is_empty() {
        None
    } else {
        adapter.to_wire_tool_choice(tool_choice)
    };

    WireRequest {
        model: model.to_string(),
        messages: wire_messages,
        tools: wire_tools,
        tool_choice: wire_choice,
        system_prompt: system_prompt.map(str::to_string),
        max_tokens: limits.max_tokens,
        timeout: limits.timeout,
    }
}
