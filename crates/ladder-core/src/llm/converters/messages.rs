//! Message format conversion for different providers
//!
//! Each function converts one [`Message`] into the wire messages a provider
//! expects. Conversion is total: every block of every role has a wire form.

use crate::llm::messages::{ContentBlock, Message, MessageRole, ToolCall, ToolResponse};
use serde_json::{Value, json};

/// Message format converter
pub struct MessageConverter;

impl MessageConverter {
    /// Convert a message for the Gemini `contents` array
    ///
    /// Tool results of one message stay batched in a single `function` turn.
    pub fn to_google(message: &Message) -> Vec<Value> {
        let role = match message.role {
            MessageRole::User => "user",
            MessageRole::Assistant => "model",
            MessageRole::Tool => "function",
        };

        let parts: Vec<Value> = message
            .content
            .iter()
            .map(|block| match block {
                ContentBlock::Text { text } => json!({ "text": text }),
                ContentBlock::ToolCall(call) => json!({
                    "functionCall": {
                        "id": call.id,
                        "name": call.name,
                        "args": call.arguments,
                    }
                }),
                ContentBlock::ToolResponse(response) => json!({
                    "functionResponse": {
                        "id": response.tool_call_id,
                        "name": response.name,
                        "response": { "content": response.content },
                    }
                }),
            })
            .collect();

        vec![json!({ "role": role, "parts": parts })]
    }

    /// Convert a message for the Anthropic Messages API
    ///
    /// Tool results travel as `tool_result` blocks inside one `user` turn.
    pub fn to_anthropic(message: &Message) -> Vec<Value> {
        let role = match message.role {
            MessageRole::Assistant => "assistant",
            MessageRole::User | MessageRole::Tool => "user",
        };

        let content: Vec<Value> = message
            .content
            .iter()
            .map(|block| match block {
                ContentBlock::Text { text } => json!({ "type": "text", "text": text }),
                ContentBlock::ToolCall(call) => json!({
                    "type": "tool_use",
                    "id": call.id,
                    "name": call.name,
                    "input": call.arguments,
                }),
                ContentBlock::ToolResponse(response) => json!({
                    "type": "tool_result",
                    "tool_use_id": response.tool_call_id,
                    "content": response.content,
                }),
            })
            .collect();

        vec![json!({ "role": role, "content": content })]
    }

    /// Convert a message for OpenAI-compatible chat completions
    ///
    /// Every tool result becomes its own `tool` message. Assistant text is
    /// emitted before the `tool_calls` array, which is the only order the
    /// format can express.
    pub fn to_openai(message: &Message) -> Vec<Value> {
        match message.role {
            MessageRole::User => vec![json!({
                "role": "user",
                "content": Self::openai_text_content(message),
            })],
            MessageRole::Assistant => {
                let tool_calls: Vec<Value> = message.tool_calls().map(Self::openai_tool_call).collect();
                let has_text = message.content.iter().any(|b| b.as_text().is_some());

                let mut msg = json!({
                    "role": "assistant",
                    "content": if has_text { Self::openai_text_content(message) } else { Value::Null },
                });
                if !tool_calls.is_empty() {
                    msg["tool_calls"] = Value::Array(tool_calls);
                }
                vec![msg]
            }
            MessageRole::Tool => {
                let mut converted: Vec<Value> = message
                    .tool_responses_iter()
                    .map(Self::openai_tool_message)
                    .collect();
                // Stray text in a tool message is forwarded as user input
                let text = message.text();
                if !text.is_empty() {
                    converted.push(json!({ "role": "user", "content": text }));
                }
                converted
            }
        }
    }

    /// A single text block is sent as a plain string, several as content parts
    fn openai_text_content(message: &Message) -> Value {
        let texts: Vec<&str> = message.content.iter().filter_map(ContentBlock::as_text).collect();
        match texts.as_slice() {
            [single] => json!(single),
            _ => Value::Array(
                texts
                    .iter()
                    .map(|text| json!({ "type": "text", "text": text }))
                    .collect(),
            ),
        }
    }

    fn openai_tool_call(call: &ToolCall) -> Value {
        json!({
            "id": call.id,
            "type": "function",
            "function": {
                "name": call.name,
                "arguments": serde_json::to_string(&call.arguments).unwrap_or_else(|_| "{}".to_string()),
            }
        })
    }

    fn openai_tool_message(response: &ToolResponse) -> Value {
        let mut msg = json!({
            "role": "tool",
            "tool_call_id": response.tool_call_id,
            "content": response.content,
        });
        if !response.name.is_empty() {
            msg["name"] = json!(response.name);
        }
        msg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn tool_turn() -> (Message, Message) {
        let call = ToolCall::new(
            "c1",
            "read_file",
            HashMap::from([("path".to_string(), json!("src/lib.rs"))]),
        );
        let assistant = Message::assistant_with_tools(Some("Let me look".to_string()), vec![call]);
        let tool = Message::tool_responses(vec![
            ToolResponse::new("c1", "read_file", "fn main() {}"),
            ToolResponse::new("c2", "list_files", "[]"),
        ]);
        (assistant, tool)
    }

    #[test]
    fn test_google_roles_and_parts() {
        let (assistant, tool) = tool_turn();
        let wire = MessageConverter::to_google(&assistant);
        assert_eq!(wire.len(), 1);
        assert_eq!(wire[0]["role"], "model");
        assert_eq!(wire[0]["parts"][0]["text"], "Let me look");
        assert_eq!(wire[0]["parts"][1]["functionCall"]["name"], "read_file");
        assert_eq!(wire[0]["parts"][1]["functionCall"]["args"]["path"], "src/lib.rs");

        let wire = MessageConverter::to_google(&tool);
        assert_eq!(wire.len(), 1);
        assert_eq!(wire[0]["role"], "function");
        assert_eq!(wire[0]["parts"].as_array().unwrap().len(), 2);
        assert_eq!(
            wire[0]["parts"][0]["functionResponse"]["response"]["content"],
            "fn main() {}"
        );
    }

    #[test]
    fn test_anthropic_batches_tool_results_in_user_turn() {
        let (assistant, tool) = tool_turn();
        let wire = MessageConverter::to_anthropic(&assistant);
        assert_eq!(wire[0]["content"][1]["type"], "tool_use");
        assert_eq!(wire[0]["content"][1]["input"]["path"], "src/lib.rs");

        let wire = MessageConverter::to_anthropic(&tool);
        assert_eq!(wire.len(), 1);
        assert_eq!(wire[0]["role"], "user");
        assert_eq!(wire[0]["content"][0]["type"], "tool_result");
        assert_eq!(wire[0]["content"][1]["tool_use_id"], "c2");
    }

    #[test]
    fn test_openai_splits_tool_results() {
        let (assistant, tool) = tool_turn();
        let wire = MessageConverter::to_openai(&assistant);
        assert_eq!(wire[0]["content"], "Let me look");
        assert_eq!(wire[0]["tool_calls"][0]["function"]["name"], "read_file");
        let args: Value =
            serde_json::from_str(wire[0]["tool_calls"][0]["function"]["arguments"].as_str().unwrap())
                .unwrap();
        assert_eq!(args["path"], "src/lib.rs");

        let wire = MessageConverter::to_openai(&tool);
        assert_eq!(wire.len(), 2);
        assert!(wire.iter().all(|m| m["role"] == "tool"));
        assert_eq!(wire[1]["tool_call_id"], "c2");
        assert!(wire.iter().all(|m| m["name"].is_string()));
    }

    #[test]
    fn test_openai_assistant_without_text_has_null_content() {
        let call = ToolCall::new("c1", "list_files", HashMap::new());
        let wire = MessageConverter::to_openai(&Message::assistant_with_tools(None, vec![call]));
        assert!(wire[0]["content"].is_null());
    }

    #[test]
    fn test_openai_multiple_text_blocks_become_parts() {
        let message = Message::new(
            MessageRole::User,
            vec![ContentBlock::text("first"), ContentBlock::text("second")],
        );
        let wire = MessageConverter::to_openai(&message);
        assert_eq!(wire[0]["content"][1]["text"], "second");
    }
}
