//! Configuration files: format detection, discovery and parsing

use super::LadderConfig;
use crate::error::{LadderError, LadderResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File names probed by [`discover_config_file`], in order
pub const CONFIG_FILE_NAMES: &[&str] = &["ladder.toml", "ladder.yaml", "ladder.yml", "ladder.json"];

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Format implied by the file extension
    pub fn from_path(path: &Path) -> LadderResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            other => Err(LadderError::config_with_context(
                format!(
                    "unsupported config file extension {}",
                    other.map(|ext| format!("'.{}'", ext)).unwrap_or_else(|| "(none)".to_string())
                ),
                format!("expected .json, .toml, .yaml or .yml for '{}'", path.display()),
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Toml => "TOML",
            Self::Yaml => "YAML",
        }
    }

    /// Parse a document in this format
    pub fn parse(&self, content: &str) -> Result<LadderConfig, String> {
        match self {
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// Load configuration from `path`
///
/// The file must exist; callers wanting defaults when nothing is configured
/// use [`discover_config_file`] first.
pub fn load_from_file(path: &Path) -> LadderResult<LadderConfig> {
    let format = ConfigFormat::from_path(path)?;
    let content = fs::read_to_string(path).map_err(|e| {
        let message = match e.kind() {
            ErrorKind::NotFound => format!("config file '{}' does not exist", path.display()),
            _ => format!("cannot read config file '{}': {}", path.display(), e),
        };
        LadderError::config(message)
    })?;

    let config = format.parse(&content).map_err(|e| {
        LadderError::config_with_context(
            format!("invalid {} in '{}': {}", format.name(), path.display(), e),
            "parsing ladder configuration",
        )
    })?;
    tracing::debug!(path = %path.display(), format = format.name(), "config file loaded");
    Ok(config)
}

/// First well-known config file present in `dir`
pub fn discover_config_file(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}
