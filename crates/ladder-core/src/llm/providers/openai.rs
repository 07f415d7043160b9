//! OpenAI-compatible provider implementation
//!
//! Serves OpenAI itself and the OpenAI-compatible OpenRouter and xAI
//! endpoints, which differ only in base URL and credentials.

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

/// OpenAI-compatible provider adapter
pub struct OpenAIProvider {
    provider: LlmProvider,
    config: ProviderConfig,
    api_key: Option<String>,
    http_client: Client,
}

impl OpenAIProvider {
    /// Create an adapter for an OpenAI-compatible `provider`
    pub fn new(provider: LlmProvider, config: ProviderConfig) -> LadderResult<Self> {
        if !provider.is_openai_compatible() {
            return Err(LadderError::config(format!(
                "{} does not speak the OpenAI chat completions format",
                provider
            )));
        }
        let http_client = build_http_client(&config.timeouts)?;
        let api_key = config.get_api_key(provider);
        Ok(Self {
            provider,
            config,
            api_key,
            http_client,
        })
    }

    /// Request body for `/chat/completions`
    pub fn request_body(request: &WireRequest) -> Value {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system_prompt {
            messages.push(json!({ "role": "system", "content": system }));
        }
        messages.extend(request.messages.iter().cloned());

        let mut body = json!({
            "model": request.model,
            "messages": messages,
            "max_tokens": request.max_tokens,
        });

        if !request.tools.is_empty() {
            body["tools"] = json!(request.tools);
        }
        if let Some(choice) = &request.tool_choice {
            body["tool_choice"] = choice.clone();
        }
        body
    }
}

#[async_trait]
impl ProviderAdapter for OpenAIProvider {
    fn provider(&self) -> LlmProvider {
        self.provider
    }

    fn to_wire_messages(&self, message: &Message) -> Vec<Value> {
        MessageConverter::to_openai(message)
    }

    fn to_wire_tool(&self, tool: &ToolDefinition) -> Value {
        ToolConverter::to_openai(tool)
    }

    fn to_wire_tool_choice(&self, choice: &ToolChoice) -> Option<Value> {
        ToolChoiceConverter::to_openai(choice)
    }

    #[instrument(skip(self, request), fields(provider = %self.provider, model = %request.model), level = "debug")]
    async fn invoke(&self, request: &WireRequest) -> LadderResult<Value> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            LadderError::authentication(format!("{} API key not provided", self.provider))
        })?;

        let url = format!("{}/chat/completions", self.config.get_base_url(self.provider));
        let http_request = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .timeout(request.timeout);

        send_json(http_request, &Self::request_body(request), self.provider.name()).await
    }

    fn from_wire_response(&self, response: &Value, turn: usize) -> LadderResult<Message> {
        ResponseParser::parse_openai(response, turn)
    }
}
