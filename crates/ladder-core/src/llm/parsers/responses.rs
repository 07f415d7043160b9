//! Response parsing for different providers
//!
//! Parsers turn a provider response body into a [`Message`], keeping every
//! content part in provider order. The role is read from the wire shape, so a
//! wire message produced by a converter parses back into the message it came
//! from.

use crate::error::{LadderError, LadderResult};
use crate::llm::messages::{ContentBlock, Message, MessageRole, ToolCall, ToolResponse};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Finish reasons that mean the Gemini candidate completed normally
const GOOGLE_NORMAL_FINISH: &[&str] = &["STOP", "FINISH_REASON_UNSPECIFIED"];

/// Deterministic ids for tool calls the provider did not label
///
/// Ids have the form `call_{turn}_{n}_{tool}` where `n` counts generated ids
/// within the turn, so parsing the same response twice yields the same ids.
#[derive(Debug)]
pub struct ToolCallIds {
    turn: usize,
    counter: usize,
}

impl ToolCallIds {
    pub fn new(turn: usize) -> Self {
        Self { turn, counter: 0 }
    }

    /// Use the provider id when present, otherwise generate one
    pub fn resolve(&mut self, provided: Option<&str>, name: &str) -> String {
        match provided {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                let id = format!("call_{}_{}_{}", self.turn, self.counter, name);
                self.counter += 1;
                id
            }
        }
    }
}

/// Response parser for various providers
pub struct ResponseParser;

impl ResponseParser {
    /// Parse a Gemini `generateContent` response
    pub fn parse_google(response: &Value, turn: usize) -> LadderResult<Message> {
        let candidate = match response["candidates"].as_array().and_then(|c| c.first()) {
            Some(candidate) => candidate,
            None => {
                if let Some(reason) = response["promptFeedback"]["blockReason"].as_str() {
                    return Err(LadderError::invalid_request(format!(
                        "Gemini blocked the prompt: {}",
                        reason
                    )));
                }
                return Err(LadderError::provider_unavailable(
                    "no candidates in Gemini response",
                ));
            }
        };

        let content = &candidate["content"];
        let parts = content["parts"].as_array().map(Vec::as_slice).unwrap_or(&[]);
        let mut ids = ToolCallIds::new(turn);
        let mut blocks = Vec::with_capacity(parts.len());

        for part in parts {
            if let Some(text) = part["text"].as_str() {
                blocks.push(ContentBlock::text(text));
            } else if let Some(call) = part["functionCall"].as_object() {
                let name = str_field(call, "name");
                blocks.push(ContentBlock::ToolCall(ToolCall {
                    id: ids.resolve(call.get("id").and_then(Value::as_str), &name),
                    name,
                    arguments: object_arguments(call.get("args")),
                }));
            } else if let Some(response) = part["functionResponse"].as_object() {
                let name = str_field(response, "name");
                blocks.push(ContentBlock::ToolResponse(ToolResponse {
                    tool_call_id: ids.resolve(response.get("id").and_then(Value::as_str), &name),
                    name,
                    content: google_response_content(response.get("response")),
                }));
            } else {
                tracing::debug!(part = %part, "skipping unsupported Gemini part");
            }
        }

        if let Some(reason) = candidate["finishReason"].as_str() {
            if !GOOGLE_NORMAL_FINISH.contains(&reason) {
                tracing::warn!(finish_reason = reason, "Gemini response terminated early");
                blocks = early_termination_blocks(reason, blocks);
            }
        }

        let has_function_responses = blocks
            .iter()
            .any(|b| matches!(b, ContentBlock::ToolResponse(_)));
        let role = match content["role"].as_str() {
            Some("function") => MessageRole::Tool,
            Some("user") if has_function_responses => MessageRole::Tool,
            Some("user") => MessageRole::User,
            _ => MessageRole::Assistant,
        };

        finish(role, blocks, "Gemini")
    }

    /// Parse an Anthropic Messages API response
    pub fn parse_anthropic(response: &Value, turn: usize) -> LadderResult<Message> {
        if response["type"] == "error" {
            return Err(LadderError::provider_unavailable(format!(
                "Anthropic returned an error object: {}",
                response["error"]["message"].as_str().unwrap_or("unknown")
            )));
        }

        let items = response["content"]
            .as_array()
            .ok_or_else(|| LadderError::provider_unavailable("no content in Anthropic response"))?;
        let mut ids = ToolCallIds::new(turn);
        let mut blocks = Vec::with_capacity(items.len());

        for item in items {
            match item["type"].as_str() {
                Some("text") => {
                    blocks.push(ContentBlock::text(item["text"].as_str().unwrap_or_default()));
                }
                Some("tool_use") => {
                    let name = item["name"].as_str().unwrap_or_default().to_string();
                    blocks.push(ContentBlock::ToolCall(ToolCall {
                        id: ids.resolve(item["id"].as_str(), &name),
                        name,
                        arguments: object_arguments(item.get("input")),
                    }));
                }
                Some("tool_result") => {
                    // tool_result carries no tool name on the wire
                    blocks.push(ContentBlock::ToolResponse(ToolResponse {
                        tool_call_id: item["tool_use_id"].as_str().unwrap_or_default().to_string(),
                        name: String::new(),
                        content: anthropic_result_content(&item["content"]),
                    }));
                }
                other => {
                    tracing::debug!(block_type = ?other, "skipping unsupported Anthropic block");
                }
            }
        }

        let role = match response["role"].as_str() {
            Some("user") if blocks.iter().any(|b| b.as_tool_response().is_some()) => {
                MessageRole::Tool
            }
            Some("user") => MessageRole::User,
            _ => MessageRole::Assistant,
        };

        finish(role, blocks, "Anthropic")
    }

    /// Parse an OpenAI-compatible chat completion response
    pub fn parse_openai(response: &Value, turn: usize) -> LadderResult<Message> {
        let message = response["choices"]
            .as_array()
            .and_then(|choices| choices.first())
            .map(|choice| &choice["message"])
            .ok_or_else(|| {
                let detail = response["error"]["message"].as_str().unwrap_or("no choices");
                LadderError::provider_unavailable(format!("invalid chat completion: {}", detail))
            })?;

        let mut blocks = Vec::new();
        match &message["content"] {
            Value::String(text) if !text.is_empty() => blocks.push(ContentBlock::text(text)),
            Value::Array(parts) => {
                for part in parts {
                    if let Some(text) = part["text"].as_str() {
                        blocks.push(ContentBlock::text(text));
                    }
                }
            }
            _ => {}
        }

        let role = match message["role"].as_str() {
            Some("tool") => {
                // A tool message carries exactly one result
                let content = std::mem::take(&mut blocks)
                    .iter()
                    .filter_map(ContentBlock::as_text)
                    .collect::<Vec<_>>()
                    .join("\n");
                blocks.push(ContentBlock::ToolResponse(ToolResponse {
                    tool_call_id: message["tool_call_id"].as_str().unwrap_or_default().to_string(),
                    name: message["name"].as_str().unwrap_or_default().to_string(),
                    content,
                }));
                MessageRole::Tool
            }
            Some("user") => MessageRole::User,
            _ => MessageRole::Assistant,
        };

        let mut ids = ToolCallIds::new(turn);
        if let Some(calls) = message["tool_calls"].as_array() {
            for call in calls {
                let function = &call["function"];
                let name = function["name"].as_str().unwrap_or_default().to_string();
                let arguments = parse_openai_arguments(&function["arguments"], &name)?;
                blocks.push(ContentBlock::ToolCall(ToolCall {
                    id: ids.resolve(call["id"].as_str(), &name),
                    name,
                    arguments,
                }));
            }
        }

        finish(role, blocks, "OpenAI")
    }
}

fn finish(role: MessageRole, blocks: Vec<ContentBlock>, provider: &str) -> LadderResult<Message> {
    if blocks.is_empty() {
        return Err(LadderError::provider_unavailable(format!(
            "{} returned an empty response",
            provider
        )));
    }
    Ok(Message::new(role, blocks))
}

fn str_field(map: &Map<String, Value>, key: &str) -> String {
    map.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn object_arguments(value: Option<&Value>) -> HashMap<String, Value> {
    value
        .and_then(Value::as_object)
        .map(|args| args.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default()
}

/// OpenAI sends arguments as a JSON-encoded string
fn parse_openai_arguments(raw: &Value, name: &str) -> LadderResult<HashMap<String, Value>> {
    let text = match raw {
        Value::String(text) => text.trim(),
        Value::Object(_) => return Ok(object_arguments(Some(raw))),
        _ => "",
    };
    if text.is_empty() {
        return Ok(HashMap::new());
    }
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Ok(object_arguments(Some(&value))),
        Err(e) => Err(LadderError::provider_unavailable(format!(
            "malformed arguments for tool call '{}': {}",
            name, e
        ))),
    }
}

fn google_response_content(response: Option<&Value>) -> String {
    match response {
        Some(value) => match value.get("content") {
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
            None => value.to_string(),
        },
        None => String::new(),
    }
}

fn anthropic_result_content(content: &Value) -> String {
    match content {
        Value::String(text) => text.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|p| p["text"].as_str())
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Replace the text of an early-terminated candidate with an explanation
/// followed by whatever partial text was produced. Tool calls are kept.
fn early_termination_blocks(reason: &str, blocks: Vec<ContentBlock>) -> Vec<ContentBlock> {
    let partial = blocks
        .iter()
        .filter_map(ContentBlock::as_text)
        .collect::<Vec<_>>()
        .join("");
    let mut result = vec![ContentBlock::text(format!(
        "Model response terminated early. Finish Reason: {}.\n{}",
        reason, partial
    ))];
    result.extend(blocks.into_iter().filter(|b| b.as_text().is_none()));
    result
}
