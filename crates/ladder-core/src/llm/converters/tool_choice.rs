//! Tool choice conversion for different providers

use crate::llm::tool_types::ToolChoice;
use serde_json::{Value, json};

/// Tool choice converter
pub struct ToolChoiceConverter;

impl ToolChoiceConverter {
    /// Gemini `toolConfig`; `Required{tool}` becomes an allow-list of one
    pub fn to_google(choice: &ToolChoice) -> Option<Value> {
        let config = match choice {
            ToolChoice::Auto => json!({ "mode": "AUTO" }),
            ToolChoice::None => json!({ "mode": "NONE" }),
            ToolChoice::Required { tool: None } => json!({ "mode": "ANY" }),
            ToolChoice::Required { tool: Some(name) } => json!({
                "mode": "ANY",
                "allowedFunctionNames": [name],
            }),
        };
        Some(json!({ "functionCallingConfig": config }))
    }

    /// Anthropic `tool_choice`
    pub fn to_anthropic(choice: &ToolChoice) -> Option<Value> {
        Some(match choice {
            ToolChoice::Auto => json!({ "type": "auto" }),
            ToolChoice::None => json!({ "type": "none" }),
            ToolChoice::Required { tool: None } => json!({ "type": "any" }),
            ToolChoice::Required { tool: Some(name) } => json!({ "type": "tool", "name": name }),
        })
    }

    /// OpenAI `tool_choice`
    pub fn to_openai(choice: &ToolChoice) -> Option<Value> {
        Some(match choice {
            ToolChoice::Auto => json!("auto"),
            ToolChoice::None => json!("none"),
            ToolChoice::Required { tool: None } => json!("required"),
            ToolChoice::Required { tool: Some(name) } => json!({
                "type": "function",
                "function": { "name": name },
            }),
        })
    }
}
