//! Retry, fallback and verification settings for one client session

use crate::error::{LadderError, LadderResult};
use crate::llm::provider_types::{Capability, LlmProvider, ModelTier};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Immutable settings for a client session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Ordered fallback ladder
    pub provider_models: Vec<ModelTier>,
    /// Retries per tier after a transient failure
    pub max_retries_on_exhaustion: u32,
    /// Sleep between retries
    #[serde(with = "humantime_serde")]
    pub retry_delay: Duration,
    /// Check that required tool calls actually happened
    pub verify_tool_calls: bool,
    /// Upper bound on escalations after unverified tool calls
    pub max_escalations: u32,
    /// Wait before moving to a more capable tier
    #[serde(with = "humantime_serde")]
    pub escalation_cooldown: Duration,
    /// Per-request timeout
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Maximum output tokens per response
    pub max_tokens: u32,
    /// Preferred starting position in the ladder
    pub start_index: usize,
}

/// Default ladder: three Gemini tiers under the global retry policy.
/// Per-tier retry overrides belong in configuration files.
impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            provider_models: vec![
                ModelTier::new(LlmProvider::Google, "gemini-1.5-pro-latest")
                    .with_capability(Capability::High),
                ModelTier::new(LlmProvider::Google, "gemini-1.5-flash-latest")
                    .with_capability(Capability::Medium),
                ModelTier::new(LlmProvider::Google, "gemini-2.0-flash")
                    .with_capability(Capability::Low),
            ],
            max_retries_on_exhaustion: 3,
            retry_delay: Duration::from_secs(60),
            verify_tool_calls: true,
            max_escalations: 2,
            escalation_cooldown: Duration::from_secs(30),
            request_timeout: Duration::from_secs(120),
            max_tokens: 4096,
            start_index: 0,
        }
    }
}

impl ClientConfig {
    /// Config with the given ladder and default policy
    pub fn with_models(provider_models: Vec<ModelTier>) -> Self {
        Self {
            provider_models,
            ..Self::default()
        }
    }

    /// Retries allowed on the tier at `index`
    pub fn max_retries_for(&self, index: usize) -> u32 {
        self.provider_models
            .get(index)
            .and_then(|tier| tier.max_retries)
            .unwrap_or(self.max_retries_on_exhaustion)
    }

    /// Retry delay on the tier at `index`
    pub fn retry_delay_for(&self, index: usize) -> Duration {
        self.provider_models
            .get(index)
            .and_then(|tier| tier.retry_delay)
            .unwrap_or(self.retry_delay)
    }

    /// Index of the first tier serving `model`
    pub fn index_of_model(&self, model: &str) -> Option<usize> {
        self.provider_models.iter().position(|tier| tier.model == model)
    }

    /// Providers referenced by the ladder, in ladder order without repeats
    pub fn providers(&self) -> Vec<LlmProvider> {
        let mut providers = Vec::new();
        for tier in &self.provider_models {
            if !providers.contains(&tier.provider) {
                providers.push(tier.provider);
            }
        }
        providers
    }

    /// Validate the configuration
    pub fn validate(&self) -> LadderResult<()> {
        if self.provider_models.is_empty() {
            return Err(LadderError::config("provider_models must not be empty"));
        }
        if self.start_index >= self.provider_models.len() {
            return Err(LadderError::config(format!(
                "start_index {} is outside a ladder of {} models",
                self.start_index,
                self.provider_models.len()
            )));
        }
        if let Some(tier) = self.provider_models.iter().find(|t| t.model.trim().is_empty()) {
            return Err(LadderError::config(format!(
                "ladder entry for {} has an empty model id",
                tier.provider
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(LadderError::config("request_timeout must be greater than 0"));
        }
        if self.max_tokens == 0 {
            return Err(LadderError::config("max_tokens must be greater than 0"));
        }
        Ok(())
    }
}
