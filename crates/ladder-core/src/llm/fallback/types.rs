//! Type definitions for the fallback state machine

use crate::error::LadderError;
use crate::llm::messages::Message;

/// Position of the controller in the ladder walk
#[derive(Debug, Clone)]
pub enum FallbackState {
    /// About to call the tier at `index`; `escalations` made so far
    Trying { index: usize, escalations: u32 },
    /// Moving to a more capable tier after an unverified result.
    /// The driver waits the escalation cooldown before resuming.
    Escalated {
        from_index: usize,
        to_index: usize,
        steps: u32,
    },
    /// Accepted response; `verified` is false when the controller gave up
    /// escalating and accepted an unverified tool-call outcome
    Done { message: Message, verified: bool },
    /// Terminal failure
    Failed(LadderError),
}

impl FallbackState {
    /// Done and Failed are never left again
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Failed(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Trying { .. } => "trying",
            Self::Escalated { .. } => "escalated",
            Self::Done { .. } => "done",
            Self::Failed(_) => "failed",
        }
    }
}

/// Why the controller moved between tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// Retries exhausted on rate limiting
    RateLimited,
    /// Retries exhausted on transport or server failures
    Unavailable,
    /// Required tool call missing from the response
    Unverified,
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate limited"),
            Self::Unavailable => write!(f, "unavailable"),
            Self::Unverified => write!(f, "tool call unverified"),
        }
    }
}

/// One recorded tier change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackEvent {
    pub from_index: usize,
    pub to_index: usize,
    pub from_model: String,
    pub to_model: String,
    pub reason: FallbackReason,
}
