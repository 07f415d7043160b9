//! Shared test doubles for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use ladder_core::llm::converters::{MessageConverter, ToolChoiceConverter, ToolConverter};
use ladder_core::llm::parsers::ResponseParser;
use ladder_core::llm::{
    AdapterRegistry, LlmProvider, Message, ProviderAdapter, ToolChoice, ToolDefinition,
    WireRequest,
};
use ladder_core::{LadderError, LadderResult};
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// What a scripted model does on its next invocation
#[derive(Debug, Clone)]
pub enum Step {
    RateLimited,
    Unavailable,
    Unauthorized,
    /// Text-only answer
    Text(String),
    /// Answer with one call of the named tool
    ToolCall(String),
    /// Never answers; only a timeout or cancellation ends the call
    Hang,
}

/// Adapter that answers from a per-model script using the Gemini wire format
pub struct ScriptedAdapter {
    provider: LlmProvider,
    scripts: Mutex<HashMap<String, VecDeque<Step>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedAdapter {
    pub fn new(provider: LlmProvider) -> Arc<Self> {
        Arc::new(Self {
            provider,
            scripts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Queue steps for `model`; once a script runs dry it keeps rate limiting
    pub fn script(&self, model: &str, steps: Vec<Step>) {
        self.scripts
            .lock()
            .unwrap()
            .entry(model.to_string())
            .or_default()
            .extend(steps);
    }

    /// Models invoked, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn candidate(parts: Value) -> Value {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": parts },
                "finishReason": "STOP"
            }]
        })
    }
}

#[async_trait]
impl ProviderAdapter for ScriptedAdapter {
    fn provider(&self) -> LlmProvider {
        self.provider
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

    async fn invoke(&self, request: &WireRequest) -> LadderResult<Value> {
        self.calls.lock().unwrap().push(request.model.clone());
        let step = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&request.model)
            .and_then(VecDeque::pop_front)
            .unwrap_or(Step::RateLimited);

        match step {
            Step::RateLimited => Err(LadderError::rate_limited("RESOURCE_EXHAUSTED")),
            Step::Unavailable => Err(LadderError::provider_unavailable("503 Service Unavailable")),
            Step::Unauthorized => Err(LadderError::authentication("API key not valid")),
            Step::Text(text) => Ok(Self::candidate(json!([{ "text": text }]))),
            Step::ToolCall(name) => Ok(Self::candidate(json!([
                { "text": format!("Calling {}", name) },
                { "functionCall": { "name": name, "args": { "repo_type": "library" } } }
            ]))),
            Step::Hang => std::future::pending().await,
        }
    }

    fn from_wire_response(&self, response: &Value, turn: usize) -> LadderResult<Message> {
        ResponseParser::parse_google(response, turn)
    }
}

/// Registry holding the given scripted adapters
pub fn registry(adapters: &[Arc<ScriptedAdapter>]) -> AdapterRegistry {
    let mut registry = AdapterRegistry::new();
    for adapter in adapters {
        registry.insert(adapter.clone());
    }
    registry
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
