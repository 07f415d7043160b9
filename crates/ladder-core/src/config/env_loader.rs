//! Environment variable-based configuration overrides

use super::LadderConfig;
use crate::error::{LadderError, LadderResult};
use crate::llm::provider_types::{LlmProvider, ModelTier};
use humantime_serde::re::humantime;
use std::str::FromStr;
use std::time::Duration;

/// Overlay the process environment onto `config`
pub fn load_from_env(config: &mut LadderConfig) -> LadderResult<()> {
    apply_env_overrides(config, |name| std::env::var(name).ok())
}

/// Overlay variables read through `lookup` onto `config`
///
/// Recognized variables:
/// - `LADDER_MODELS`: comma-separated `provider:model` ladder
/// - `LADDER_MAX_RETRIES`, `LADDER_RETRY_DELAY` (these also clear per-tier overrides)
/// - `LADDER_VERIFY_TOOL_CALLS`
/// - `LADDER_MAX_ESCALATIONS`, `LADDER_ESCALATION_COOLDOWN`
/// - `LADDER_REQUEST_TIMEOUT`, `LADDER_MAX_TOKENS`, `LADDER_START_INDEX`
/// - `<PROVIDER>_BASE_URL`, e.g. `OPENROUTER_BASE_URL`
///
/// API keys are not copied here; they are resolved when an adapter is built.
pub fn apply_env_overrides<F>(config: &mut LadderConfig, lookup: F) -> LadderResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let client = &mut config.client;

    if let Some(models) = lookup("LADDER_MODELS") {
        client.provider_models = models
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ModelTier::parse)
            .collect::<LadderResult<Vec<_>>>()?;
    }
    // Global retry variables replace per-tier values from the file
    if let Some(value) = lookup("LADDER_MAX_RETRIES") {
        client.max_retries_on_exhaustion = parse_var("LADDER_MAX_RETRIES", &value)?;
        client.provider_models.iter_mut().for_each(|tier| tier.max_retries = None);
    }
    if let Some(value) = lookup("LADDER_RETRY_DELAY") {
        client.retry_delay = parse_duration("LADDER_RETRY_DELAY", &value)?;
        client.provider_models.iter_mut().for_each(|tier| tier.retry_delay = None);
    }
    if let Some(value) = lookup("LADDER_VERIFY_TOOL_CALLS") {
        client.verify_tool_calls = parse_var("LADDER_VERIFY_TOOL_CALLS", &value)?;
    }
    if let Some(value) = lookup("LADDER_MAX_ESCALATIONS") {
        client.max_escalations = parse_var("LADDER_MAX_ESCALATIONS", &value)?;
    }
    if let Some(value) = lookup("LADDER_ESCALATION_COOLDOWN") {
        client.escalation_cooldown = parse_duration("LADDER_ESCALATION_COOLDOWN", &value)?;
    }
    if let Some(value) = lookup("LADDER_REQUEST_TIMEOUT") {
        client.request_timeout = parse_duration("LADDER_REQUEST_TIMEOUT", &value)?;
    }
    if let Some(value) = lookup("LADDER_MAX_TOKENS") {
        client.max_tokens = parse_var("LADDER_MAX_TOKENS", &value)?;
    }
    if let Some(value) = lookup("LADDER_START_INDEX") {
        client.start_index = parse_var("LADDER_START_INDEX", &value)?;
    }

    for provider in LlmProvider::ALL {
        let name = format!("{}_BASE_URL", provider.name().to_uppercase());
        if let Some(url) = lookup(&name).filter(|u| !u.is_empty()) {
            config.provider_mut(provider).base_url = Some(url);
        }
    }

    Ok(())
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> LadderResult<T> {
    value.trim().parse().map_err(|_| {
        LadderError::config_with_context(
            format!("Invalid {} value", name),
            format!("Parsing '{}' from the environment", value),
        )
    })
}

fn parse_duration(name: &str, value: &str) -> LadderResult<Duration> {
    humantime::parse_duration(value.trim()).map_err(|e| {
        LadderError::config_with_context(
            format!("Invalid {} value: {}", name, e),
            format!("Parsing '{}' as a duration such as 30s or 500ms", value),
        )
    })
}
