//! Provider identities, capability tiers and timeouts

use crate::error::LadderError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeout configuration for provider requests
///
/// - **Connection timeout**: time allowed to establish a connection
/// - **Request timeout**: time allowed for a complete request/response cycle
///
/// # Examples
///
/// ```rust
/// use ladder_core::llm::TimeoutConfig;
///
/// let config = TimeoutConfig::new()
///     .with_connection_timeout_secs(10)
///     .with_request_timeout_secs(120);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Connection timeout in seconds. Default: 30
    #[serde(default = "TimeoutConfig::default_connection_timeout")]
    pub connection_timeout_secs: u64,

    /// End-to-end request timeout in seconds. Default: 120
    #[serde(default = "TimeoutConfig::default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl TimeoutConfig {
    const fn default_connection_timeout() -> u64 {
        30
    }

    const fn default_request_timeout() -> u64 {
        120
    }

    /// Create a new timeout configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set connection timeout in seconds
    pub fn with_connection_timeout_secs(mut self, secs: u64) -> Self {
        self.connection_timeout_secs = secs;
        self
    }

    /// Set request timeout in seconds
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Get connection timeout as Duration
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate timeout configuration
    ///
    /// Returns an error if any timeout is zero or the request timeout is
    /// shorter than the connection timeout.
    pub fn validate(&self) -> Result<(), String> {
        if self.connection_timeout_secs == 0 {
            return Err("Connection timeout must be greater than 0".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("Request timeout must be greater than 0".to_string());
        }
        if self.request_timeout_secs < self.connection_timeout_secs {
            return Err(
                "Request timeout must be greater than or equal to connection timeout".to_string(),
            );
        }
        Ok(())
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connection_timeout_secs: Self::default_connection_timeout(),
            request_timeout_secs: Self::default_request_timeout(),
        }
    }
}

/// Supported LLM providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Google (Gemini models)
    Google,
    /// Anthropic (Claude models)
    Anthropic,
    /// OpenAI (GPT models)
    #[serde(rename = "openai")]
    OpenAI,
    /// OpenRouter, OpenAI-compatible
    #[serde(rename = "openrouter")]
    OpenRouter,
    /// xAI (Grok models), OpenAI-compatible
    Xai,
}

impl LlmProvider {
    /// All known providers
    pub const ALL: [LlmProvider; 5] = [
        LlmProvider::Google,
        LlmProvider::Anthropic,
        LlmProvider::OpenAI,
        LlmProvider::OpenRouter,
        LlmProvider::Xai,
    ];

    /// Get the provider name as a string
    pub fn name(&self) -> &'static str {
        match self {
            LlmProvider::Google => "google",
            LlmProvider::Anthropic => "anthropic",
            LlmProvider::OpenAI => "openai",
            LlmProvider::OpenRouter => "openrouter",
            LlmProvider::Xai => "xai",
        }
    }

    /// Whether the provider speaks the OpenAI chat-completions dialect
    pub fn is_openai_compatible(&self) -> bool {
        matches!(
            self,
            LlmProvider::OpenAI | LlmProvider::OpenRouter | LlmProvider::Xai
        )
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for LlmProvider {
    type Err = LadderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" | "gemini" => Ok(LlmProvider::Google),
            "anthropic" | "claude" => Ok(LlmProvider::Anthropic),
            "openai" => Ok(LlmProvider::OpenAI),
            "openrouter" => Ok(LlmProvider::OpenRouter),
            "xai" | "grok" => Ok(LlmProvider::Xai),
            other => Err(LadderError::config(format!("unknown provider '{}'", other))),
        }
    }
}

/// Relative capability of a ladder entry
///
/// More capable tiers are usually more heavily rate-limited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Low,
    Medium,
    High,
}

/// One rung of the fallback ladder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTier {
    pub provider: LlmProvider,
    /// Provider model identifier
    pub model: String,
    /// Explicit capability; when absent earlier tiers count as more capable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capability: Option<Capability>,
    /// Overrides the client-wide retry count for this tier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    /// Overrides the client-wide retry delay for this tier
    #[serde(
        default,
        with = "humantime_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub retry_delay: Option<Duration>,
}

impl ModelTier {
    pub fn new(provider: LlmProvider, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            capability: None,
            max_retries: None,
            retry_delay: None,
        }
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capability = Some(capability);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    /// Parse a `provider:model` pair, e.g. `google:gemini-2.0-flash`
    pub fn parse(spec: &str) -> Result<Self, LadderError> {
        let (provider, model) = spec.split_once(':').ok_or_else(|| {
            LadderError::config(format!(
                "model tier '{}' must be written as provider:model",
                spec
            ))
        })?;
        let model = model.trim();
        if model.is_empty() {
            return Err(LadderError::config(format!(
                "model tier '{}' has an empty model id",
                spec
            )));
        }
        Ok(Self::new(provider.parse()?, model))
    }
}

impl std::fmt::Display for ModelTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.provider, self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_round_trips_through_name() {
        for provider in LlmProvider::ALL {
            assert_eq!(provider.name().parse::<LlmProvider>().unwrap(), provider);
        }
        assert!("mystery".parse::<LlmProvider>().is_err());
    }

    #[test]
    fn test_model_tier_parse() {
        let tier = ModelTier::parse("google:gemini-2.0-flash").unwrap();
        assert_eq!(tier.provider, LlmProvider::Google);
        assert_eq!(tier.model, "gemini-2.0-flash");

        // model ids may themselves contain colons
        let tier = ModelTier::parse("openrouter:meta/llama:free").unwrap();
        assert_eq!(tier.model, "meta/llama:free");

        assert!(ModelTier::parse("gemini-2.0-flash").is_err());
        assert!(ModelTier::parse("google:").is_err());
    }

    #[test]
    fn test_capability_ordering() {
        assert!(Capability::High > Capability::Medium);
        assert!(Capability::Medium > Capability::Low);
    }

    #[test]
    fn test_model_tier_deserializes_humantime_delay() {
        let tier: ModelTier = serde_json::from_str(
            r#"{"provider":"google","model":"gemini-1.5-pro","capability":"high","retry_delay":"60s"}"#,
        )
        .unwrap();
        assert_eq!(tier.capability, Some(Capability::High));
        assert_eq!(tier.retry_delay, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_timeout_validation() {
        assert!(TimeoutConfig::default().validate().is_ok());
        assert!(
            TimeoutConfig::new()
                .with_request_timeout_secs(5)
                .with_connection_timeout_secs(10)
                .validate()
                .is_err()
        );
    }
}
