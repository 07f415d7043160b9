//! Retry/fallback state machine over a model ladder
//!
//! The controller is pure: it consumes [`CallOutcome`]s and decides the next
//! state. Sleeping, cancellation and network calls belong to the driver in
//! [`crate::llm::client`].

use super::types::{FallbackEvent, FallbackReason, FallbackState};
use crate::config::ClientConfig;
use crate::error::{ErrorKind, LadderError, LadderResult};
use crate::llm::executor::CallOutcome;
use crate::llm::messages::Message;
use crate::llm::provider_types::ModelTier;
use std::collections::HashSet;
use tracing::{info, warn};

/// Walks the ladder for one conversation turn
#[derive(Debug)]
pub struct FallbackController {
    ladder: Vec<ModelTier>,
    verify_tool_calls: bool,
    max_escalations: u32,
    state: FallbackState,
    /// Tiers whose transient retries ran out during this turn
    exhausted: HashSet<usize>,
    history: Vec<FallbackEvent>,
    total_attempts: u32,
}

impl FallbackController {
    /// Start at the configured preferred index
    pub fn new(config: &ClientConfig) -> Self {
        Self::starting_at(config, config.start_index)
    }

    /// Start at an explicit index; out-of-range indexes fail immediately
    pub fn starting_at(config: &ClientConfig, index: usize) -> Self {
        let state = if index < config.provider_models.len() {
            FallbackState::Trying {
                index,
                escalations: 0,
            }
        } else {
            FallbackState::Failed(LadderError::config(format!(
                "start index {} is outside a ladder of {} models",
                index,
                config.provider_models.len()
            )))
        };
        Self {
            ladder: config.provider_models.clone(),
            verify_tool_calls: config.verify_tool_calls,
            max_escalations: config.max_escalations,
            state,
            exhausted: HashSet::new(),
            history: Vec::new(),
            total_attempts: 0,
        }
    }

    pub fn state(&self) -> &FallbackState {
        &self.state
    }

    pub fn history(&self) -> &[FallbackEvent] {
        &self.history
    }

    /// Network invocations reported so far
    pub fn total_attempts(&self) -> u32 {
        self.total_attempts
    }

    /// Tier the driver should call next, when in `Trying`
    pub fn current_tier(&self) -> Option<(usize, &ModelTier)> {
        match self.state {
            FallbackState::Trying { index, .. } => Some((index, &self.ladder[index])),
            _ => None,
        }
    }

    /// Feed the outcome of calling the current tier
    pub fn on_outcome(&mut self, outcome: CallOutcome) -> &FallbackState {
        let (index, escalations) = match self.state {
            FallbackState::Trying { index, escalations } => (index, escalations),
            _ => {
                tracing::debug!(state = self.state.name(), "outcome ignored outside trying state");
                return &self.state;
            }
        };
        self.total_attempts += outcome.attempts;

        self.state = match (outcome.message, outcome.error) {
            (Some(message), _) => self.on_success(index, escalations, message, outcome.tool_calls_verified),
            (None, Some(error)) => self.on_error(index, escalations, error),
            (None, None) => FallbackState::Failed(LadderError::provider_unavailable(
                "call produced neither a message nor an error",
            )),
        };
        &self.state
    }

    /// Leave `Escalated` for `Trying` at the target tier
    pub fn resume(&mut self) -> &FallbackState {
        if let FallbackState::Escalated { to_index, steps, .. } = self.state {
            self.state = FallbackState::Trying {
                index: to_index,
                escalations: steps,
            };
        }
        &self.state
    }

    /// Abort the walk; terminal states are kept
    pub fn cancel(&mut self) -> &FallbackState {
        if !self.state.is_terminal() {
            self.state = FallbackState::Failed(LadderError::Cancelled);
        }
        &self.state
    }

    /// Final result once terminal
    pub fn into_result(self) -> LadderResult<(Message, bool)> {
        match self.state {
            FallbackState::Done { message, verified } => Ok((message, verified)),
            FallbackState::Failed(error) => Err(error),
            other => Err(LadderError::config(format!(
                "fallback controller stopped in non-terminal state '{}'",
                other.name()
            ))),
        }
    }

    fn on_success(
        &mut self,
        index: usize,
        escalations: u32,
        message: Message,
        verified: bool,
    ) -> FallbackState {
        if verified || !self.verify_tool_calls {
            return FallbackState::Done {
                message,
                verified,
            };
        }

        if escalations < self.max_escalations {
            if let Some(target) = self.more_capable_than(index) {
                self.record(index, target, FallbackReason::Unverified);
                return FallbackState::Escalated {
                    from_index: index,
                    to_index: target,
                    steps: escalations + 1,
                };
            }
        }

        warn!(
            model = %self.ladder[index],
            index,
            steps = escalations,
            "accepting response without the required tool call"
        );
        FallbackState::Done {
            message,
            verified: false,
        }
    }

    fn on_error(&mut self, index: usize, escalations: u32, error: LadderError) -> FallbackState {
        let reason = match error.kind() {
            ErrorKind::RateLimited => FallbackReason::RateLimited,
            ErrorKind::ProviderUnavailable => FallbackReason::Unavailable,
            _ => {
                warn!(model = %self.ladder[index], index, error = %error, "fatal error, stopping");
                return FallbackState::Failed(error);
            }
        };

        self.exhausted.insert(index);
        match self.next_available_after(index) {
            Some(next) => {
                self.record(index, next, reason);
                FallbackState::Trying {
                    index: next,
                    escalations,
                }
            }
            None => {
                warn!(model = %self.ladder[index], index, %reason, "no fallback tier left");
                FallbackState::Failed(error)
            }
        }
    }

    /// Next later tier whose retries have not run out in this turn
    fn next_available_after(&self, index: usize) -> Option<usize> {
        (index + 1..self.ladder.len()).find(|i| !self.exhausted.contains(i))
    }

    /// Nearest tier that is more capable and still available.
    ///
    /// Two tiers with explicit capabilities are compared directly, so the
    /// target may sit on either side of `index`. When either capability is
    /// missing, only earlier tiers count as more capable. Ties in distance go
    /// to the earlier tier.
    fn more_capable_than(&self, index: usize) -> Option<usize> {
        let current = self.ladder[index].capability;
        (0..self.ladder.len())
            .filter(|&i| i != index && !self.exhausted.contains(&i))
            .filter(|&i| match (self.ladder[i].capability, current) {
                (Some(candidate), Some(current)) => candidate > current,
                _ => i < index,
            })
            .min_by_key(|&i| (i.abs_diff(index), i))
    }

    fn record(&mut self, from_index: usize, to_index: usize, reason: FallbackReason) {
        let event = FallbackEvent {
            from_index,
            to_index,
            from_model: self.ladder[from_index].to_string(),
            to_model: self.ladder[to_index].to_string(),
            reason,
        };
        info!(
            from = %event.from_model,
            to = %event.to_model,
            %reason,
            "switching model tier"
        );
        self.history.push(event);
    }
}
