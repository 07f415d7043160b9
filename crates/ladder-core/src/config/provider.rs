//! Per-provider connection settings and credential resolution

use crate::llm::provider_types::{LlmProvider, TimeoutConfig};
use serde::{Deserialize, Serialize};

/// Default Anthropic API version header value
pub const DEFAULT_ANTHROPIC_VERSION: &str = "2023-06-01";

/// Connection settings for one provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key; falls back to the provider's standard environment variables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// API version (Anthropic)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    /// HTTP timeouts
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

impl ProviderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set API version
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    /// Set timeout configuration
    pub fn with_timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// API key from config, else from the process environment
    pub fn get_api_key(&self, provider: LlmProvider) -> Option<String> {
        self.get_api_key_with(provider, |name| std::env::var(name).ok())
    }

    /// API key from config, else from `lookup` over the standard variable names
    pub fn get_api_key_with<F>(&self, provider: LlmProvider, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.is_empty()) {
            return Some(key.clone());
        }
        standard_env_vars(provider)
            .iter()
            .find_map(|name| lookup(name).filter(|v| !v.is_empty()))
    }

    /// Base URL override or the provider default, without a trailing slash
    pub fn get_base_url(&self, provider: LlmProvider) -> String {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| default_base_url(provider))
            .trim_end_matches('/')
            .to_string()
    }

    /// API version or the provider default
    pub fn get_api_version(&self) -> &str {
        self.api_version
            .as_deref()
            .unwrap_or(DEFAULT_ANTHROPIC_VERSION)
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), String> {
        if let Some(url) = &self.base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!("base URL '{}' must start with http:// or https://", url));
            }
        }
        self.timeouts.validate()
    }
}

/// Standard environment variable names holding a provider's API key
pub fn standard_env_vars(provider: LlmProvider) -> &'static [&'static str] {
    match provider {
        LlmProvider::Google => &["GEMINI_API_KEY", "GOOGLE_API_KEY"],
        LlmProvider::Anthropic => &["ANTHROPIC_API_KEY", "CLAUDE_API_KEY"],
        LlmProvider::OpenAI => &["OPENAI_API_KEY"],
        LlmProvider::OpenRouter => &["OPENROUTER_API_KEY"],
        LlmProvider::Xai => &["XAI_API_KEY"],
    }
}

/// Default API root for a provider
pub fn default_base_url(provider: LlmProvider) -> &'static str {
    match provider {
        LlmProvider::Google => "https://generativelanguage.googleapis.com",
        LlmProvider::Anthropic => "https://api.anthropic.com",
        LlmProvider::OpenAI => "https://api.openai.com/v1",
        LlmProvider::OpenRouter => "https://openrouter.ai/api/v1",
        LlmProvider::Xai => "https://api.x.ai/v1",
    }
}

/// Mask an API key for safe display
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let len = chars.len();
    if len <= 12 {
        return "*".repeat(len);
    }

    let prefix: String = chars[..8].iter().collect();
    let suffix: String = chars[len - 4..].iter().collect();
    format!("{}{}...{}", prefix, "*".repeat((len - 12).min(8)), suffix)
}
