//! Provider adapters
//!
//! [`build_adapter`] creates the adapter for a provider from its
//! configuration; [`AdapterRegistry`] holds one adapter per provider used by
//! a ladder.

pub mod anthropic;
pub mod error_utils;
pub mod google;
pub mod openai;
pub mod provider_trait;
pub mod request_builder;

pub use anthropic::AnthropicProvider;
pub use google::GoogleProvider;
pub use openai::OpenAIProvider;
pub use provider_trait::{ProviderAdapter, RequestLimits, WireRequest, build_wire_request};

#[cfg(test)]
pub use provider_trait::MockProviderAdapter;

use crate::config::LadderConfig;
use crate::error::{LadderError, LadderResult};
use crate::llm::provider_types::LlmProvider;
use std::collections::HashMap;
use std::sync::Arc;

/// Create the adapter for `provider`
pub fn build_adapter(
    provider: LlmProvider,
    config: &LadderConfig,
) -> LadderResult<Arc<dyn ProviderAdapter>> {
    let provider_config = config.provider(provider);
    let adapter: Arc<dyn ProviderAdapter> = match provider {
        LlmProvider::Google => Arc::new(GoogleProvider::new(provider_config)?),
        LlmProvider::Anthropic => Arc::new(AnthropicProvider::new(provider_config)?),
        LlmProvider::OpenAI | LlmProvider::OpenRouter | LlmProvider::Xai => {
            Arc::new(OpenAIProvider::new(provider, provider_config)?)
        }
    };
    Ok(adapter)
}

/// Adapters keyed by provider
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<LlmProvider, Arc<dyn ProviderAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build adapters for every provider the configured ladder uses
    pub fn from_config(config: &LadderConfig) -> LadderResult<Self> {
        let mut registry = Self::new();
        for provider in config.client.providers() {
            registry.insert(build_adapter(provider, config)?);
        }
        Ok(registry)
    }

    /// Register an adapter under the provider it reports
    pub fn insert(&mut self, adapter: Arc<dyn ProviderAdapter>) {
        self.adapters.insert(adapter.provider(), adapter);
    }

    pub fn get(&self, provider: LlmProvider) -> LadderResult<Arc<dyn ProviderAdapter>> {
        self.adapters.get(&provider).cloned().ok_or_else(|| {
            LadderError::config(format!("no adapter registered for provider '{}'", provider))
        })
    }

    pub fn contains(&self, provider: LlmProvider) -> bool {
        self.adapters.contains_key(&provider)
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut providers: Vec<_> = self.adapters.keys().collect();
        providers.sort();
        f.debug_struct("AdapterRegistry")
            .field("providers", &providers)
            .finish()
    }
}
