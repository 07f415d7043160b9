//! Configuration inspection commands

use crate::console::CliConsole;
use anyhow::{Result, bail};
use colored::*;
use ladder_core::LadderConfig;
use ladder_core::config::{load_config, mask_api_key};
use ladder_core::llm::ModelTier;
use std::path::Path;

/// Show the effective configuration (file or defaults, then environment overrides)
pub fn show(config_file: Option<&Path>) -> Result<()> {
    let console = CliConsole::new(true);
    console.print_header("Configuration");

    match config_file {
        Some(path) => console.info(&format!("Loading {}", path.display())),
        None => console.warn("No configuration file found; using defaults and environment overrides"),
    }

    let config = load_config(config_file)?;
    print_config(&console, &config);
    Ok(())
}

/// Validate configuration and report providers without an API key
pub fn validate(config_file: Option<&Path>) -> Result<()> {
    let console = CliConsole::new(true);
    console.print_header("Configuration Validation");

    let config = match load_config(config_file) {
        Ok(config) => config,
        Err(e) => {
            console.error(&format!("Configuration is invalid: {}", e));
            return Err(e.into());
        }
    };
    console.success("Configuration is valid");

    let missing = config.missing_api_keys();
    if missing.is_empty() {
        console.success("API keys found for every provider in the ladder");
        return Ok(());
    }
    for provider in &missing {
        console.error(&format!("No API key for {}", provider));
    }
    bail!("{} provider(s) without an API key", missing.len())
}

fn print_config(console: &CliConsole, config: &LadderConfig) {
    let client = &config.client;

    console.print_header("Model Ladder");
    for (index, tier) in client.provider_models.iter().enumerate() {
        let marker = if index == client.start_index { "▶" } else { " " };
        println!(
            "{} {:>2}. {}  {}",
            marker.green().bold(),
            index,
            tier.to_string().cyan(),
            tier_details(tier, client.max_retries_for(index), client.retry_delay_for(index))
                .dimmed()
        );
    }

    console.print_header("Policy");
    console.field("max retries", client.max_retries_on_exhaustion);
    console.field("retry delay", format!("{:?}", client.retry_delay));
    console.field("verify tool calls", client.verify_tool_calls);
    console.field("max escalations", client.max_escalations);
    console.field("escalation cooldown", format!("{:?}", client.escalation_cooldown));
    console.field("request timeout", format!("{:?}", client.request_timeout));
    console.field("max tokens", client.max_tokens);

    console.print_header("Providers");
    for provider in client.providers() {
        let settings = config.provider(provider);
        let key = match settings.get_api_key(provider) {
            Some(key) => mask_api_key(&key).green(),
            None => "missing".red(),
        };
        println!("  {}", provider.to_string().bold());
        console.field("api key", key);
        console.field("base url", settings.get_base_url(provider));
    }
}

fn tier_details(tier: &ModelTier, retries: u32, delay: std::time::Duration) -> String {
    let capability = tier
        .capability
        .map(|c| format!("{:?}", c).to_lowercase())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "capability {}, {} retries, {:?} delay",
        capability, retries, delay
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ladder_core::llm::{Capability, LlmProvider};
    use std::time::Duration;

    #[test]
    fn test_tier_details() {
        let tier = ModelTier::new(LlmProvider::Google, "gemini-2.0-flash")
            .with_capability(Capability::Low);
        assert_eq!(
            tier_details(&tier, 1, Duration::from_secs(15)),
            "capability low, 1 retries, 15s delay"
        );
    }

    #[test]
    fn test_validate_rejects_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ladder.json");
        std::fs::write(&path, r#"{ "client": { "provider_models": [] } }"#).unwrap();
        assert!(validate(Some(&path)).is_err());
    }

    #[test]
    fn test_validate_reports_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
