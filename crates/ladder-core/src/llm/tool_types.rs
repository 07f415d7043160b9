//! Tool definitions, tool choice and the validating tool registry

use crate::error::{LadderError, LadderResult};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashSet};

/// Parameter definition used to build a [`ToolDefinition`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Parameter type (string, number, integer, boolean, object, array)
    pub param_type: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Enum values (if applicable)
    pub enum_values: Option<Vec<Value>>,
    /// Item schema for arrays
    pub items: Option<Value>,
}

impl ToolParameter {
    fn typed(name: impl Into<String>, description: impl Into<String>, param_type: &str) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            param_type: param_type.to_string(),
            required: true,
            enum_values: None,
            items: None,
        }
    }

    /// Create a required string parameter
    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::typed(name, description, "string")
    }

    /// Create a required number parameter
    pub fn number(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::typed(name, description, "number")
    }

    /// Create a required integer parameter
    pub fn integer(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::typed(name, description, "integer")
    }

    /// Create a required boolean parameter
    pub fn boolean(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::typed(name, description, "boolean")
    }

    /// Create a required array parameter with the given item schema
    pub fn array(name: impl Into<String>, description: impl Into<String>, items: Value) -> Self {
        let mut param = Self::typed(name, description, "array");
        param.items = Some(items);
        param
    }

    /// Make parameter optional
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Restrict values to an enumeration
    pub fn with_enum<V: Into<Value>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    fn to_property_schema(&self) -> Value {
        let mut schema = json!({
            "type": self.param_type,
            "description": self.description,
        });
        if let Some(values) = &self.enum_values {
            schema["enum"] = Value::Array(values.clone());
        }
        if let Some(items) = &self.items {
            schema["items"] = items.clone();
        }
        schema
    }
}

/// Object schema of a tool's arguments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolParameters {
    /// Property name to JSON schema fragment (`type`, `description`, ...)
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
    /// Names of mandatory properties
    #[serde(default)]
    pub required: Vec<String>,
}

impl ToolParameters {
    /// Full JSON schema object
    pub fn to_json_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": self.properties,
            "required": self.required,
        })
    }
}

/// A tool the model may call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name, unique within a request
    pub name: String,
    /// Tool description
    #[serde(default)]
    pub description: String,
    /// Input parameters
    #[serde(default)]
    pub parameters: ToolParameters,
}

impl ToolDefinition {
    /// Build a definition from parameter descriptions
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Vec<ToolParameter>,
    ) -> Self {
        let mut properties = BTreeMap::new();
        let mut required = Vec::new();

        for param in parameters {
            if param.required {
                required.push(param.name.clone());
            }
            properties.insert(param.name.clone(), param.to_property_schema());
        }

        Self {
            name: name.into(),
            description: description.into(),
            parameters: ToolParameters {
                properties,
                required,
            },
        }
    }

    /// Check the schema invariants of this definition
    pub fn validate(&self) -> LadderResult<()> {
        if self.name.trim().is_empty() {
            return Err(LadderError::invalid_tool_schema(
                &self.name,
                "tool name must not be empty",
            ));
        }

        let mut seen = HashSet::new();
        for name in &self.parameters.required {
            if !self.parameters.properties.contains_key(name) {
                return Err(LadderError::invalid_tool_schema(
                    &self.name,
                    format!("required parameter '{}' is not a declared property", name),
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(LadderError::invalid_tool_schema(
                    &self.name,
                    format!("required parameter '{}' is listed twice", name),
                ));
            }
        }

        for (name, schema) in &self.parameters.properties {
            if !schema.is_object() {
                return Err(LadderError::invalid_tool_schema(
                    &self.name,
                    format!("property '{}' must be a schema object", name),
                ));
            }
        }

        Ok(())
    }
}

/// Constraint on whether the model must call a tool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ToolChoice {
    /// The model decides
    #[default]
    Auto,
    /// The model must call a tool, optionally a specific one
    Required {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tool: Option<String>,
    },
    /// The model must not call tools
    None,
}

impl ToolChoice {
    /// Require any tool call
    pub fn required() -> Self {
        Self::Required { tool: None }
    }

    /// Require a call of one specific tool
    pub fn required_tool(name: impl Into<String>) -> Self {
        Self::Required {
            tool: Some(name.into()),
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Self::Required { .. })
    }

    /// Check that a forced tool is among the offered tools
    pub fn validate_against(&self, tools: &[ToolDefinition]) -> LadderResult<()> {
        match self {
            Self::Required { tool: Some(name) } => {
                if tools.iter().any(|t| &t.name == name) {
                    Ok(())
                } else {
                    Err(LadderError::invalid_request(format!(
                        "tool choice requires '{}' but no such tool was provided",
                        name
                    )))
                }
            }
            Self::Required { tool: None } if tools.is_empty() => Err(
                LadderError::invalid_request("tool choice requires a tool call but no tools were provided"),
            ),
            _ => Ok(()),
        }
    }
}

impl std::fmt::Display for ToolChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::None => write!(f, "none"),
            Self::Required { tool: None } => write!(f, "required"),
            Self::Required { tool: Some(name) } => write!(f, "required:{}", name),
        }
    }
}

impl std::str::FromStr for ToolChoice {
    type Err = LadderError;

    /// Parses `auto`, `none`, `required` or `required:<tool>`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "auto" => return Ok(Self::Auto),
            "none" => return Ok(Self::None),
            "required" | "any" => return Ok(Self::required()),
            _ => {}
        }
        match s.split_once(':') {
            Some((mode, tool)) if mode.eq_ignore_ascii_case("required") && !tool.is_empty() => {
                Ok(Self::required_tool(tool))
            }
            _ => Err(LadderError::invalid_request(format!(
                "unknown tool choice '{}'",
                s
            ))),
        }
    }
}

/// Registry of tool definitions offered to the model
///
/// Registration validates each schema and rejects duplicate names, so a
/// `ToolSet` only ever holds definitions that are safe to send.
#[derive(Debug, Clone, Default)]
pub struct ToolSet {
    tools: Vec<ToolDefinition>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from definitions, validating each one
    pub fn from_definitions(definitions: Vec<ToolDefinition>) -> LadderResult<Self> {
        let mut set = Self::new();
        for definition in definitions {
            set.register(definition)?;
        }
        Ok(set)
    }

    /// Register a tool definition
    pub fn register(&mut self, definition: ToolDefinition) -> LadderResult<()> {
        definition.validate()?;
        if self.get(&definition.name).is_some() {
            return Err(LadderError::invalid_tool_schema(
                &definition.name,
                "a tool with this name is already registered",
            ));
        }
        self.tools.push(definition);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.tools
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
