//! Fallback controller tests

mod transitions;

use crate::config::ClientConfig;
use crate::error::LadderError;
use crate::llm::executor::CallOutcome;
use crate::llm::messages::{Message, ToolCall};
use crate::llm::provider_types::{LlmProvider, ModelTier};
use std::collections::HashMap;

fn ladder(models: &[&str]) -> ClientConfig {
    ClientConfig {
        provider_models: models
            .iter()
            .map(|m| ModelTier::new(LlmProvider::Google, *m))
            .collect(),
        max_escalations: 2,
        ..ClientConfig::default()
    }
}

fn verified(text: &str) -> CallOutcome {
    let call = ToolCall::new("c1", "classify_repository", HashMap::new());
    CallOutcome {
        message: Some(Message::assistant_with_tools(Some(text.to_string()), vec![call])),
        error: None,
        tool_calls_verified: true,
        attempts: 1,
    }
}

fn unverified(text: &str) -> CallOutcome {
    CallOutcome {
        message: Some(Message::assistant(text)),
        error: None,
        tool_calls_verified: false,
        attempts: 1,
    }
}

fn failed(error: LadderError, attempts: u32) -> CallOutcome {
    CallOutcome {
        message: None,
        error: Some(error),
        tool_calls_verified: false,
        attempts,
    }
}
