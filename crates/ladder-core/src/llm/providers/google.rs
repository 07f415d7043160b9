//! Google (Gemini) provider implementation

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

/// Google (Gemini) provider adapter
pub struct GoogleProvider {
    config: ProviderConfig,
    api_key: Option<String>,
    http_client: Client,
}

impl GoogleProvider {
    /// Create a new Google provider
    pub fn new(config: ProviderConfig) -> LadderResult<Self> {
        let http_client = build_http_client(&config.timeouts)?;
        let api_key = config.get_api_key(LlmProvider::Google);
        Ok(Self {
            config,
            api_key,
            http_client,
        })
    }

    /// Request body for `generateContent`
    pub fn request_body(request: &WireRequest) -> Value {
        let mut body = json!({
            "contents": request.messages,
            "generationConfig": { "maxOutputTokens": request.max_tokens },
        });

        if let Some(system) = &request.system_prompt {
            body["systemInstruction"] = json!({ "parts": [{ "text": system }] });
        }
        if !request.tools.is_empty() {
            body["tools"] = json!([{ "functionDeclarations": request.tools }]);
        }
        if let Some(choice) = &request.tool_choice {
            body["toolConfig"] = choice.clone();
        }
        body
    }
}

#[async_trait]
impl ProviderAdapter for GoogleProvider {
    fn provider(&self) -> LlmProvider {
        LlmProvider::Google
    }

    fn to_wire_messages(&self, message: &Message) -> Vec<Value> {
        MessageConverter::to_google(message)
    }

    fn to_wire_tool(&self, tool: &ToolDefinition) -> Value {
        ToolConverter::to_google(tool)
    }

    fn to_wire_tool_choice(&self, choice: &ToolChoice) -> Option<Value> {
        ToolChoiceConverter::to_google(choice)
    }

    #[instrument(skip(self, request), fields(provider = "google", model = %request.model), level = "debug")]
    async fn invoke(&self, request: &WireRequest) -> LadderResult<Value> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LadderError::authentication("Google API key not provided"))?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.get_base_url(LlmProvider::Google),
            request.model
        );

        let http_request = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .timeout(request.timeout);

        send_json(http_request, &Self::request_body(request), "Google").await
    }

    fn from_wire_response(&self, response: &Value, turn: usize) -> LadderResult<Message> {
        ResponseParser::parse_google(response, turn)
    }
}
