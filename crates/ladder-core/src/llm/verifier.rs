//! Tool-call verification
//!
//! A response can be a network-level success and still ignore a mandatory
//! tool call. The verifier reports that as a flag, never as an error.

use crate::llm::messages::Message;
use crate::llm::tool_types::ToolChoice;

/// Decides whether a response honors the requested tool choice
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolCallVerifier;

impl ToolCallVerifier {
    /// `Auto` and `None` always pass. `Required` passes when the message
    /// holds at least one tool call, and when a tool is named, at least one
    /// call of exactly that tool.
    pub fn verify(message: &Message, choice: &ToolChoice) -> bool {
        match choice {
            ToolChoice::Auto | ToolChoice::None => true,
            ToolChoice::Required { tool: None } => message.has_tool_calls(),
            ToolChoice::Required { tool: Some(name) } => {
                message.tool_calls().any(|call| &call.name == name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::messages::ToolCall;
    use std::collections::HashMap;

    fn with_call(name: &str) -> Message {
        Message::assistant_with_tools(None, vec![ToolCall::new("c1", name, HashMap::new())])
    }

    #[test]
    fn test_text_only_fails_required_tool() {
        let choice = ToolChoice::required_tool("classify_repository");
        assert!(!ToolCallVerifier::verify(&Message::assistant("It is a library"), &choice));
        assert!(ToolCallVerifier::verify(&with_call("classify_repository"), &choice));
    }

    #[test]
    fn test_other_tool_does_not_satisfy_named_requirement() {
        let choice = ToolChoice::required_tool("classify_repository");
        assert!(!ToolCallVerifier::verify(&with_call("read_file"), &choice));
    }

    #[test]
    fn test_any_tool_satisfies_unnamed_requirement() {
        assert!(ToolCallVerifier::verify(&with_call("read_file"), &ToolChoice::required()));
        assert!(!ToolCallVerifier::verify(&Message::assistant("no"), &ToolChoice::required()));
    }

    #[test]
    fn test_auto_and_none_always_pass() {
        let text = Message::assistant("plain");
        assert!(ToolCallVerifier::verify(&text, &ToolChoice::Auto));
        assert!(ToolCallVerifier::verify(&text, &ToolChoice::None));
        assert!(ToolCallVerifier::verify(&with_call("x"), &ToolChoice::None));
    }
}
