//! Single-model call execution with retry on transient failures

use crate::error::{CallSite, LadderError};
use crate::llm::messages::Message;
use crate::llm::provider_types::LlmProvider;
use crate::llm::providers::{ProviderAdapter, WireRequest};
use crate::llm::tool_types::ToolChoice;
use crate::llm::verifier::ToolCallVerifier;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Result of executing one call against one model
///
/// Exactly one of `message` and `error` is set.
#[derive(Debug, Clone)]
pub struct CallOutcome {
    pub message: Option<Message>,
    pub error: Option<LadderError>,
    /// Whether the message satisfies the requested tool choice
    pub tool_calls_verified: bool,
    /// Network invocations performed, retries included
    pub attempts: u32,
}

impl CallOutcome {
    fn success(message: Message, tool_calls_verified: bool, attempts: u32) -> Self {
        Self {
            message: Some(message),
            error: None,
            tool_calls_verified,
            attempts,
        }
    }

    fn failure(error: LadderError, attempts: u32) -> Self {
        Self {
            message: None,
            error: Some(error),
            tool_calls_verified: false,
            attempts,
        }
    }

    pub fn is_success(&self) -> bool {
        self.message.is_some()
    }
}

/// Invokes one adapter for one model identifier
///
/// Transient failures are retried after a fixed delay; all other failures
/// end the call immediately. Nothing is shared between calls.
pub struct CallExecutor {
    adapter: Arc<dyn ProviderAdapter>,
    provider: LlmProvider,
    model: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl CallExecutor {
    pub fn new(
        adapter: Arc<dyn ProviderAdapter>,
        provider: LlmProvider,
        model: impl Into<String>,
        max_retries: u32,
        retry_delay: Duration,
    ) -> Self {
        Self {
            adapter,
            provider,
            model: model.into(),
            max_retries,
            retry_delay,
        }
    }

    /// Run the call, making at most `max_retries + 1` invocations
    ///
    /// `turn` is the index the response will take in the conversation. The
    /// cancellation token is checked before each attempt and raced against
    /// both the network call and the retry sleep.
    pub async fn execute(
        &self,
        request: &WireRequest,
        turn: usize,
        tool_choice: &ToolChoice,
        cancel: &CancellationToken,
    ) -> CallOutcome {
        let max_attempts = self.max_retries + 1;
        let mut attempt = 0;

        loop {
            attempt += 1;
            if cancel.is_cancelled() {
                return CallOutcome::failure(LadderError::Cancelled, attempt - 1);
            }

            let site = CallSite::new(self.provider.name(), &self.model, attempt);
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(LadderError::Cancelled),
                result = self.invoke_once(request, turn) => result,
            };

            let error = match result {
                Ok(message) => {
                    let verified = ToolCallVerifier::verify(&message, tool_choice);
                    debug!(
                        provider = %self.provider,
                        model = %self.model,
                        attempt,
                        verified,
                        "call succeeded"
                    );
                    return CallOutcome::success(message, verified, attempt);
                }
                Err(LadderError::Cancelled) => {
                    return CallOutcome::failure(LadderError::Cancelled, attempt);
                }
                Err(error) => error.with_site(site),
            };

            if !error.is_transient() || attempt >= max_attempts {
                if error.is_transient() {
                    warn!(
                        provider = %self.provider,
                        model = %self.model,
                        attempts = attempt,
                        kind = %error.kind(),
                        "retries exhausted"
                    );
                }
                return CallOutcome::failure(error, attempt);
            }

            warn!(
                provider = %self.provider,
                model = %self.model,
                attempt,
                max_attempts,
                delay_ms = self.retry_delay.as_millis() as u64,
                error = %error,
                "transient failure, retrying"
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return CallOutcome::failure(LadderError::Cancelled, attempt);
                }
                _ = tokio::time::sleep(self.retry_delay) => {}
            }
        }
    }

    async fn invoke_once(&self, request: &WireRequest, turn: usize) -> Result<Message, LadderError> {
        let response: Value = tokio::time::timeout(request.timeout, self.adapter.invoke(request))
            .await
            .map_err(|_| {
                LadderError::provider_unavailable(format!(
                    "no response within {}ms",
                    request.timeout.as_millis()
                ))
            })??;
        self.adapter.from_wire_response(&response, turn)
    }
}
