//! Public entry point: send a conversation through the model ladder

use crate::config::{ClientConfig, LadderConfig};
use crate::error::{LadderError, LadderResult};
use crate::llm::executor::CallExecutor;
use crate::llm::fallback::{FallbackController, FallbackEvent, FallbackState};
use crate::llm::messages::{Message, validate_conversation};
use crate::llm::provider_types::ModelTier;
use crate::llm::providers::{AdapterRegistry, RequestLimits, build_wire_request};
use crate::llm::tool_types::{ToolChoice, ToolDefinition, ToolSet};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

/// Everything known about a completed send
#[derive(Debug, Clone)]
pub struct ConversationReply {
    /// The new message for the caller to append
    pub message: Message,
    /// False when an unverified tool-call outcome was accepted
    pub tool_calls_verified: bool,
    /// Tier that produced the message
    pub tier: ModelTier,
    /// Network invocations across all tiers
    pub attempts: u32,
    /// Tier changes in order
    pub history: Vec<FallbackEvent>,
}

/// Multi-provider client with retry and fallback control
///
/// The client holds immutable configuration and adapters only; every call
/// owns its own executor and controller, so one client can serve concurrent
/// conversations.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: ClientConfig,
    adapters: AdapterRegistry,
}

impl LlmClient {
    /// Create a client over explicit adapters
    pub fn new(config: ClientConfig, adapters: AdapterRegistry) -> LadderResult<Self> {
        config.validate()?;
        if let Some(tier) = config
            .provider_models
            .iter()
            .find(|tier| !adapters.contains(tier.provider))
        {
            return Err(LadderError::config(format!(
                "no adapter registered for ladder entry {}",
                tier
            )));
        }
        Ok(Self { config, adapters })
    }

    /// Create a client with HTTP adapters for every provider in the ladder
    pub fn from_config(config: &LadderConfig) -> LadderResult<Self> {
        let adapters = AdapterRegistry::from_config(config)?;
        Self::new(config.client.clone(), adapters)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a conversation and return the new message
    pub async fn send_conversation(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        tool_choice: &ToolChoice,
        system_prompt: Option<&str>,
        cancel: &CancellationToken,
    ) -> LadderResult<Message> {
        self.send_conversation_detailed(messages, tools, tool_choice, system_prompt, cancel)
            .await
            .map(|reply| reply.message)
    }

    /// Send a conversation and report how the reply was obtained
    #[instrument(
        skip_all,
        fields(messages = messages.len(), tools = tools.len(), tool_choice = %tool_choice)
    )]
    pub async fn send_conversation_detailed(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        tool_choice: &ToolChoice,
        system_prompt: Option<&str>,
        cancel: &CancellationToken,
    ) -> LadderResult<ConversationReply> {
        if messages.is_empty() {
            return Err(LadderError::malformed_conversation("conversation is empty"));
        }
        validate_conversation(messages)?;
        ToolSet::from_definitions(tools.to_vec())?;
        tool_choice.validate_against(tools)?;

        let limits = RequestLimits {
            max_tokens: self.config.max_tokens,
            timeout: self.config.request_timeout,
        };
        let turn = messages.len();
        let mut controller = FallbackController::new(&self.config);
        let mut last_index = self.config.start_index;

        loop {
            let index = match controller.state() {
                FallbackState::Trying { index, .. } => *index,
                FallbackState::Escalated { .. } => {
                    self.cooldown(&mut controller, cancel).await;
                    continue;
                }
                FallbackState::Done { .. } | FallbackState::Failed(_) => break,
            };

            let tier = &self.config.provider_models[index];
            let adapter = self.adapters.get(tier.provider)?;
            let request = build_wire_request(
                adapter.as_ref(),
                &tier.model,
                messages,
                tools,
                tool_choice,
                system_prompt,
                limits,
            );
            let executor = CallExecutor::new(
                adapter,
                tier.provider,
                &tier.model,
                self.config.max_retries_for(index),
                self.config.retry_delay_for(index),
            );

            let outcome = executor.execute(&request, turn, tool_choice, cancel).await;
            last_index = index;
            controller.on_outcome(outcome);
        }

        let attempts = controller.total_attempts();
        let history = controller.history().to_vec();
        let (message, tool_calls_verified) = controller.into_result()?;
        let tier = self.config.provider_models[last_index].clone();
        info!(model = %tier, attempts, verified = tool_calls_verified, "conversation turn completed");

        Ok(ConversationReply {
            message,
            tool_calls_verified,
            tier,
            attempts,
            history,
        })
    }

    /// Wait the escalation cooldown, then resume or cancel
    async fn cooldown(&self, controller: &mut FallbackController, cancel: &CancellationToken) {
        let delay = self.config.escalation_cooldown;
        if let FallbackState::Escalated { to_index, steps, .. } = controller.state() {
            warn!(
                to = %self.config.provider_models[*to_index],
                steps,
                delay_ms = delay.as_millis() as u64,
                "escalating after unverified tool call"
            );
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                controller.cancel();
            }
            _ = tokio::time::sleep(delay) => {
                controller.resume();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::llm::messages::ToolResponse;
    use crate::llm::provider_types::LlmProvider;
    use crate::llm::providers::MockProviderAdapter;
    use std::sync::Arc;

    fn client_with(mock: MockProviderAdapter) -> LlmClient {
        let mut adapters = AdapterRegistry::new();
        adapters.insert(Arc::new(mock));
        LlmClient::new(
            ClientConfig::with_models(vec![ModelTier::new(LlmProvider::Google, "flash")]),
            adapters,
        )
        .unwrap()
    }

    fn google_mock() -> MockProviderAdapter {
        let mut mock = MockProviderAdapter::new();
        mock.expect_provider().return_const(LlmProvider::Google);
        mock
    }

    #[tokio::test]
    async fn test_malformed_conversation_never_reaches_network() {
        let mut mock = google_mock();
        mock.expect_invoke().never();
        let client = client_with(mock);

        let conversation = vec![
            Message::user("hi"),
            Message::tool_responses(vec![ToolResponse::new("ghost", "read_file", "x")]),
        ];
        let err = client
            .send_conversation(&conversation, &[], &ToolChoice::Auto, None, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedConversation);
    }

    #[tokio::test]
    async fn test_invalid_tool_schema_never_reaches_network() {
        let mut mock = google_mock();
        mock.expect_invoke().never();
        let client = client_with(mock);

        let mut tool = ToolDefinition::new("classify_repository", "Classify", vec![]);
        tool.parameters.required.push("repo_type".to_string());
        let err = client
            .send_conversation(
                &[Message::user("classify")],
                &[tool],
                &ToolChoice::Auto,
                None,
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidToolSchema);
    }

    #[test]
    fn test_missing_adapter_is_a_config_error() {
        let err = LlmClient::new(
            ClientConfig::with_models(vec![ModelTier::new(LlmProvider::Anthropic, "sonnet")]),
            AdapterRegistry::new(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
