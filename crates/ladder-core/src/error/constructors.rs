//! Constructor methods for LadderError

use super::types::{CallSite, LadderError};

impl LadderError {
    /// Create a rate-limit error
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
            site: None,
        }
    }

    /// Create an authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
            site: None,
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
            site: None,
        }
    }

    /// Create a provider-unavailable error
    pub fn provider_unavailable(message: impl Into<String>) -> Self {
        Self::ProviderUnavailable {
            message: message.into(),
            site: None,
        }
    }

    /// Create a malformed-conversation error
    pub fn malformed_conversation(message: impl Into<String>) -> Self {
        Self::MalformedConversation {
            message: message.into(),
            message_index: None,
        }
    }

    /// Create a malformed-conversation error pointing at one message
    pub fn malformed_message(message: impl Into<String>, index: usize) -> Self {
        Self::MalformedConversation {
            message: message.into(),
            message_index: Some(index),
        }
    }

    /// Create an invalid tool schema error
    pub fn invalid_tool_schema(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidToolSchema {
            tool_name: tool_name.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Attach the provider call site; no-op for errors that never reach a provider
    pub fn with_site(mut self, call_site: CallSite) -> Self {
        match &mut self {
            Self::RateLimited { site, .. }
            | Self::Authentication { site, .. }
            | Self::InvalidRequest { site, .. }
            | Self::ProviderUnavailable { site, .. } => *site = Some(call_site),
            _ => {}
        }
        self
    }
}
