//! Configuration loading
//!
//! A [`LadderConfig`] combines the session-wide [`ClientConfig`] with
//! per-provider [`ProviderConfig`] entries. It is read from a JSON, TOML or
//! YAML file and then overlaid with environment variables.

pub mod client;
pub mod env_loader;
pub mod file_loader;
pub mod provider;

pub use client::ClientConfig;
pub use env_loader::{apply_env_overrides, load_from_env};
pub use file_loader::{CONFIG_FILE_NAMES, ConfigFormat, discover_config_file, load_from_file};
pub use provider::{ProviderConfig, default_base_url, mask_api_key, standard_env_vars};

use crate::error::{LadderError, LadderResult};
use crate::llm::provider_types::LlmProvider;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Complete configuration of a ladder client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LadderConfig {
    /// Retry, fallback and verification policy
    pub client: ClientConfig,
    /// Connection settings keyed by provider
    pub providers: HashMap<LlmProvider, ProviderConfig>,
}

impl LadderConfig {
    /// Settings for `provider`, defaulted when the file has no entry
    pub fn provider(&self, provider: LlmProvider) -> ProviderConfig {
        self.providers.get(&provider).cloned().unwrap_or_default()
    }

    /// Mutable settings for `provider`, inserting defaults when absent
    pub fn provider_mut(&mut self, provider: LlmProvider) -> &mut ProviderConfig {
        self.providers.entry(provider).or_default()
    }

    /// Validate the client policy and every provider the ladder uses
    pub fn validate(&self) -> LadderResult<()> {
        self.client.validate()?;
        for provider in self.client.providers() {
            self.provider(provider).validate().map_err(|message| {
                LadderError::config_with_context(message, format!("provider '{}'", provider))
            })?;
        }
        Ok(())
    }

    /// Providers used by the ladder that have no API key anywhere
    pub fn missing_api_keys(&self) -> Vec<LlmProvider> {
        self.client
            .providers()
            .into_iter()
            .filter(|p| self.provider(*p).get_api_key(*p).is_none())
            .collect()
    }
}

/// Load configuration from an optional file, overlay the environment and validate
///
/// With `None` the built-in defaults are the base; a given path must exist.
pub fn load_config(path: Option<&Path>) -> LadderResult<LadderConfig> {
    let mut config = match path {
        Some(path) => load_from_file(path)?,
        None => LadderConfig::default(),
    };
    load_from_env(&mut config)?;
    config.validate()?;
    tracing::debug!(
        models = config.client.provider_models.len(),
        verify_tool_calls = config.client.verify_tool_calls,
        "configuration loaded"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_explicit_missing_file_is_not_replaced_by_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let err = load_config(Some(&temp_dir.path().join("ladder.toml"))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
