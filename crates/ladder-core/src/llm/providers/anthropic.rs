//! Anthropic provider implementation

use super::provider_trait::{ProviderAdapter, WireRequest};
use super::request_builder::{build_http_client, send_json};
use crate::config::provider::ProviderConfig;
use crate::error::{LadderError, LadderResult};
use crate::llm::converters::{MessageConverter, ToolChoiceConverter, ToolConverter};
use crate::llm::messages::Message;
use crate::llm::parsers::ResponseParser;
use crate::llm::provider_types::LlmProvider;
use crate::llm::tool_types::{ToolChoice, ToolDefinition};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::instrument;

/// Anthropic provider adapter
pub struct AnthropicProvider {
    config: ProviderConfig,
    api_key: Option<String>,
    http_client: Client,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider
    pub fn new(config: ProviderConfig) -> LadderResult<Self> {
        let http_client = build_http_client(&config.timeouts)?;
        let api_key = config.get_api_key(LlmProvider::Anthropic);
        Ok(Self {
            config,
            api_key,
            http_client,
        })
    }

    /// Request body for `/v1/messages`
    pub fn request_body(request: &WireRequest) -> Value {
        let mut body = json!({
            "model": request.model,
            "messages": merge_consecutive_roles(&request.messages),
            "max_tokens": request.max_tokens,
        });

        if let Some(system) = &request.system_prompt {
            body["system"] = json!(system);
        }
        if !request.tools.is_empty() {
            body["tools"] = json!(request.tools);
        }
        if let Some(choice) = &request.tool_choice {
            body["tool_choice"] = choice.clone();
        }
        body
    }
}

/// Anthropic rejects two consecutive turns with the same role, which happens
/// when a tool-result turn is followed by a user turn. Such turns are joined.
fn merge_consecutive_roles(messages: &[Value]) -> Vec<Value> {
    let mut merged: Vec<Value> = Vec::with_capacity(messages.len());
    for message in messages {
        if let Some(last) = merged.last_mut() {
            if last["role"] == message["role"] {
                if let (Some(target), Some(extra)) = (
                    last["content"].as_array_mut(),
                    message["content"].as_array(),
                ) {
                    target.extend(extra.iter().cloned());
                    continue;
                }
            }
        }
        merged.push(message.clone());
    }
    merged
}

#[async_trait]
impl ProviderAdapter for AnthropicProvider {
    fn provider(&self) -> LlmProvider {
        LlmProvider::Anthropic
    }

    fn to_wire_messages(&self, message: &Message) -> Vec<Value> {
        MessageConverter::to_anthropic(message)
    }

    fn to_wire_tool(&self, tool: &ToolDefinition) -> Value {
        ToolConverter::to_anthropic(tool)
    }

    fn to_wire_tool_choice(&self, choice: &ToolChoice) -> Option<Value> {
        ToolChoiceConverter::to_anthropic(choice)
    }

    #[instrument(skip(self, request), fields(provider = "anthropic", model = %request.model), level = "debug")]
    async fn invoke(&self, request: &WireRequest) -> LadderResult<Value> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LadderError::authentication("Anthropic API key not provided"))?;

        let url = format!(
            "{}/v1/messages",
            self.config.get_base_url(LlmProvider::Anthropic)
        );

        let http_request = self
            .http_client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", self.config.get_api_version())
            .timeout(request.timeout);

        send_json(http_request, &Self::request_body(request), "Anthropic").await
    }

    fn from_wire_response(&self, response: &Value, turn: usize) -> LadderResult<Message> {
        ResponseParser::parse_anthropic(response, turn)
    }
}
