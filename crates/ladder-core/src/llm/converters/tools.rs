//! Tool format conversion for different providers

use crate::llm::tool_types::ToolDefinition;
use serde_json::{Map, Value, json};

/// Tool format converter
pub struct ToolConverter;

impl ToolConverter {
    /// Convert a tool for OpenAI-compatible providers
    pub fn to_openai(tool: &ToolDefinition) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": tool.name,
                "description": tool.description,
                "parameters": tool.parameters.to_json_schema(),
            }
        })
    }

    /// Convert a tool for Anthropic
    pub fn to_anthropic(tool: &ToolDefinition) -> Value {
        json!({
            "name": tool.name,
            "description": tool.description,
            "input_schema": tool.parameters.to_json_schema(),
        })
    }

    /// Convert a tool into a Gemini function declaration
    ///
    /// Gemini accepts only a subset of JSON schema, so every property is
    /// reduced with [`sanitize_google_property`]. `required` is copied as is.
    pub fn to_google(tool: &ToolDefinition) -> Value {
        let properties: Map<String, Value> = tool
            .parameters
            .properties
            .iter()
            .map(|(name, schema)| (name.clone(), sanitize_google_property(schema)))
            .collect();

        json!({
            "name": tool.name,
            "description": tool.description,
            "parameters": {
                "type": "object",
                "properties": properties,
                "required": tool.parameters.required,
            }
        })
    }
}

/// Reduce a property schema to the fields Gemini understands
///
/// Keeps `type`, `description` and string `enum` values. Arrays always get an
/// `items` schema (strings by default) and nested objects keep their own
/// sanitized `properties` and `required`.
pub fn sanitize_google_property(schema: &Value) -> Value {
    let mut clean = Map::new();
    let schema_type = schema
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("string");
    clean.insert("type".to_string(), json!(schema_type));

    if let Some(description) = schema.get("description").and_then(Value::as_str) {
        clean.insert("description".to_string(), json!(description));
    }

    if let Some(values) = schema.get("enum").and_then(Value::as_array) {
        let strings: Vec<Value> = values.iter().filter(|v| v.is_string()).cloned().collect();
        if !strings.is_empty() {
            clean.insert("enum".to_string(), Value::Array(strings));
        }
    }

    match schema_type {
        "array" => {
            let items = schema
                .get("items")
                .filter(|items| items.is_object())
                .map(sanitize_google_property)
                .unwrap_or_else(|| json!({ "type": "string" }));
            clean.insert("items".to_string(), items);
        }
        "object" => {
            if let Some(props) = schema.get("properties").and_then(Value::as_object) {
                let nested: Map<String, Value> = props
                    .iter()
                    .map(|(name, prop)| (name.clone(), sanitize_google_property(prop)))
                    .collect();
                clean.insert("properties".to_string(), Value::Object(nested));
            }
            if let Some(required) = schema.get("required").filter(|r| r.is_array()) {
                clean.insert("required".to_string(), required.clone());
            }
        }
        _ => {}
    }

    Value::Object(clean)
}
