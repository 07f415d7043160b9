//! Core error types

use std::fmt;
use thiserror::Error;

/// Result type alias for ladder operations
pub type LadderResult<T> = Result<T, LadderError>;

/// Classification of a failure, independent of its message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Provider rejected the call because a quota was exhausted
    RateLimited,
    /// Credentials are missing or invalid
    Authentication,
    /// The wire request was rejected as malformed
    InvalidRequest,
    /// The conversation violates a message-model invariant
    MalformedConversation,
    /// A tool definition violates a schema invariant
    InvalidToolSchema,
    /// Network or transport failure, distinct from rate limiting
    ProviderUnavailable,
    /// The caller cancelled the call
    Cancelled,
    /// Configuration could not be loaded or is inconsistent
    Config,
}

impl ErrorKind {
    /// Whether the executor may retry this kind of failure
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited | Self::ProviderUnavailable)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RateLimited => "rate_limited",
            Self::Authentication => "authentication",
            Self::InvalidRequest => "invalid_request",
            Self::MalformedConversation => "malformed_conversation",
            Self::InvalidToolSchema => "invalid_tool_schema",
            Self::ProviderUnavailable => "provider_unavailable",
            Self::Cancelled => "cancelled",
            Self::Config => "config",
        };
        f.write_str(name)
    }
}

/// Where a provider error happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Provider name, e.g. `google`
    pub provider: String,
    /// Model identifier sent to the provider
    pub model: String,
    /// 1-based invocation attempt against this model
    pub attempt: u32,
}

impl CallSite {
    pub fn new(provider: impl Into<String>, model: impl Into<String>, attempt: u32) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            attempt,
        }
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} (attempt {})",
            self.provider, self.model, self.attempt
        )
    }
}

fn at(site: &Option<CallSite>) -> String {
    match site {
        Some(site) => format!(" [{}]", site),
        None => String::new(),
    }
}

/// Main error type for ladder
#[derive(Error, Debug, Clone)]
pub enum LadderError {
    /// Quota exhausted at the provider
    #[error("Rate limited{}: {message}", at(.site))]
    RateLimited {
        message: String,
        site: Option<CallSite>,
    },

    /// Invalid or missing credentials
    #[error("Authentication failed{}: {message}", at(.site))]
    Authentication {
        message: String,
        site: Option<CallSite>,
    },

    /// Provider rejected the payload
    #[error("Invalid request{}: {message}", at(.site))]
    InvalidRequest {
        message: String,
        site: Option<CallSite>,
    },

    /// Transport failure, timeout or server-side outage
    #[error("Provider unavailable{}: {message}", at(.site))]
    ProviderUnavailable {
        message: String,
        site: Option<CallSite>,
    },

    /// Conversation invariant violated before any network call
    #[error("Malformed conversation: {message}")]
    MalformedConversation {
        message: String,
        message_index: Option<usize>,
    },

    /// Tool schema invariant violated at registration time
    #[error("Invalid tool schema for '{tool_name}': {message}")]
    InvalidToolSchema { tool_name: String, message: String },

    /// Caller cancelled the call
    #[error("Call was cancelled")]
    Cancelled,

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },
}

impl LadderError {
    /// Taxonomy kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            Self::ProviderUnavailable { .. } => ErrorKind::ProviderUnavailable,
            Self::MalformedConversation { .. } => ErrorKind::MalformedConversation,
            Self::InvalidToolSchema { .. } => ErrorKind::InvalidToolSchema,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Config { .. } => ErrorKind::Config,
        }
    }

    /// Stable code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::RateLimited => "LADDER_RATE_LIMITED",
            ErrorKind::Authentication => "LADDER_AUTHENTICATION",
            ErrorKind::InvalidRequest => "LADDER_INVALID_REQUEST",
            ErrorKind::ProviderUnavailable => "LADDER_PROVIDER_UNAVAILABLE",
            ErrorKind::MalformedConversation => "LADDER_MALFORMED_CONVERSATION",
            ErrorKind::InvalidToolSchema => "LADDER_INVALID_TOOL_SCHEMA",
            ErrorKind::Cancelled => "LADDER_CANCELLED",
            ErrorKind::Config => "LADDER_CONFIG",
        }
    }

    /// Whether the executor may retry this error
    pub fn is_transient(&self) -> bool {
        self.kind().is_transient()
    }

    /// Human-readable message without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            Self::RateLimited { message, .. }
            | Self::Authentication { message, .. }
            | Self::InvalidRequest { message, .. }
            | Self::ProviderUnavailable { message, .. }
            | Self::MalformedConversation { message, .. }
            | Self::InvalidToolSchema { message, .. }
            | Self::Config { message, .. } => message,
            Self::Cancelled => "call was cancelled",
        }
    }

    /// Provider call site, when the error came from a provider call
    pub fn site(&self) -> Option<&CallSite> {
        match self {
            Self::RateLimited { site, .. }
            | Self::Authentication { site, .. }
            | Self::InvalidRequest { site, .. }
            | Self::ProviderUnavailable { site, .. } => site.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_kinds() {
        assert!(ErrorKind::RateLimited.is_transient());
        assert!(ErrorKind::ProviderUnavailable.is_transient());
        assert!(!ErrorKind::Authentication.is_transient());
        assert!(!ErrorKind::InvalidRequest.is_transient());
        assert!(!ErrorKind::Cancelled.is_transient());
        assert!(!ErrorKind::MalformedConversation.is_transient());
    }

    #[test]
    fn test_display_includes_call_site() {
        let err = LadderError::rate_limited("quota exceeded")
            .with_site(CallSite::new("google", "gemini-1.5-pro", 2));
        let text = err.to_string();
        assert!(text.contains("google/gemini-1.5-pro"));
        assert!(text.contains("attempt 2"));
        assert!(text.contains("quota exceeded"));
    }

    #[test]
    fn test_display_without_site() {
        let err = LadderError::authentication("bad key");
        assert_eq!(err.to_string(), "Authentication failed: bad key");
    }

    #[test]
    fn test_error_codes_follow_kind() {
        assert_eq!(LadderError::Cancelled.error_code(), "LADDER_CANCELLED");
        assert_eq!(
            LadderError::provider_unavailable("down").error_code(),
            "LADDER_PROVIDER_UNAVAILABLE"
        );
    }
}
