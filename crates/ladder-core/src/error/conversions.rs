//! From trait implementations for LadderError conversions

use super::types::LadderError;

impl From<serde_json::Error> for LadderError {
    fn from(error: serde_json::Error) -> Self {
        Self::invalid_request(format!("JSON error: {}", error))
    }
}

impl From<reqwest::Error> for LadderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            return Self::provider_unavailable(format!("request timed out: {}", error));
        }
        if error.is_builder() {
            return Self::invalid_request(format!("failed to build request: {}", error));
        }
        if error.is_decode() {
            return Self::provider_unavailable(format!("failed to decode response: {}", error));
        }
        if let Some(status) = error.status() {
            return crate::llm::providers::error_utils::classify_status(
                status.as_u16(),
                &error.to_string(),
            );
        }
        Self::provider_unavailable(format!("transport error: {}", error))
    }
}

impl From<std::io::Error> for LadderError {
    fn from(error: std::io::Error) -> Self {
        Self::config(format!("I/O error: {}", error))
    }
}
