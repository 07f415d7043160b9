//! Unit tests for response parsers

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::llm::converters::MessageConverter;
    use crate::llm::messages::{ContentBlock, Message, MessageRole, ToolCall, ToolResponse};
    use crate::llm::parsers::responses::{ResponseParser, ToolCallIds};
    use serde_json::{Value, json};
    use std::collections::HashMap;

    fn sample_messages() -> Vec<Message> {
        let call = ToolCall::new(
            "toolu_01",
            "classify_repository",
            HashMap::from([
                ("repo_type".to_string(), json!("library")),
                ("confidence".to_string(), json!(0.9)),
            ]),
        );
        vec![
            Message::user("What kind of repository is this?"),
            Message::assistant("It looks like a library."),
            Message::assistant_with_tools(Some("Classifying".to_string()), vec![call]),
            Message::tool_responses(vec![ToolResponse::new(
                "toolu_01",
                "classify_repository",
                "{\"ok\":true}",
            )]),
        ]
    }

    /// Tool responses keep their id and content on every provider; Anthropic
    /// drops the tool name on the wire.
    fn assert_same_semantics(original: &Message, parsed: &Message, names_survive: bool) {
        assert_eq!(original.role, parsed.role);
        assert_eq!(original.content.len(), parsed.content.len());
        for (a, b) in original.content.iter().zip(&parsed.content) {
            match (a, b) {
                (ContentBlock::ToolResponse(a), ContentBlock::ToolResponse(b)) => {
                    assert_eq!(a.tool_call_id, b.tool_call_id);
                    assert_eq!(a.content, b.content);
                    if names_survive {
                        assert_eq!(a.name, b.name);
                    }
                }
                _ => assert_eq!(a, b),
            }
        }
    }

    #[test]
    fn test_google_round_trip() {
        for message in sample_messages() {
            let wire = MessageConverter::to_google(&message);
            let simulated = json!({ "candidates": [{ "content": wire[0], "finishReason": "STOP" }] });
            let parsed = ResponseParser::parse_google(&simulated, 0).unwrap();
            assert_same_semantics(&message, &parsed, true);
        }
    }

    #[test]
    fn test_anthropic_round_trip() {
        for message in sample_messages() {
            let wire = MessageConverter::to_anthropic(&message);
            let parsed = ResponseParser::parse_anthropic(&wire[0], 0).unwrap();
            assert_same_semantics(&message, &parsed, false);
        }
    }

    #[test]
    fn test_openai_round_trip() {
        for message in sample_messages() {
            let wire = MessageConverter::to_openai(&message);
            // Split tool messages come back as one message each
            let blocks: Vec<ContentBlock> = wire
                .iter()
                .flat_map(|m| {
                    let simulated = json!({ "choices": [{ "message": m }] });
                    ResponseParser::parse_openai(&simulated, 0).unwrap().content
                })
                .collect();
            let parsed_role = ResponseParser::parse_openai(&json!({ "choices": [{ "message": wire[0] }] }), 0)
                .unwrap()
                .role;
            assert_same_semantics(&message, &Message::new(parsed_role, blocks), true);
        }
    }

    #[test]
    fn test_reparsed_conversation_still_validates() {
        let originals = sample_messages();
        for provider in ["anthropic", "openai"] {
            let reparsed: Vec<Message> = originals
                .iter()
                .map(|message| match provider {
                    "anthropic" => {
                        ResponseParser::parse_anthropic(&MessageConverter::to_anthropic(message)[0], 0)
                            .unwrap()
                    }
                    _ => ResponseParser::parse_openai(
                        &json!({ "choices": [{ "message": MessageConverter::to_openai(message)[0] }] }),
                        0,
                    )
                    .unwrap(),
                })
                .collect();
            assert!(
                crate::llm::messages::validate_conversation(&reparsed).is_ok(),
                "{} round trip broke validation",
                provider
            );
        }
    }

    #[test]
    fn test_google_generates_deterministic_ids() {
        let response = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"functionCall": {"name": "read_file", "args": {"path": "a"}}},
                        {"functionCall": {"name": "read_file", "args": {"path": "b"}}}
                    ]
                },
                "finishReason": "STOP"
            }]
        });
        let first = ResponseParser::parse_google(&response, 4).unwrap();
        let second = ResponseParser::parse_google(&response, 4).unwrap();
        assert_eq!(first, second);

        let ids: Vec<&str> = first.tool_calls().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["call_4_0_read_file", "call_4_1_read_file"]);
    }

    #[test]
    fn test_provider_ids_do_not_advance_counter() {
        let mut ids = ToolCallIds::new(2);
        assert_eq!(ids.resolve(Some("given"), "x"), "given");
        assert_eq!(ids.resolve(None, "x"), "call_2_0_x");
        assert_eq!(ids.resolve(Some(""), "y"), "call_2_1_y");
    }

    #[test]
    fn test_google_early_termination() {
        let response = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "The repository is a"}]},
                "finishReason": "MAX_TOKENS"
            }]
        });
        let message = ResponseParser::parse_google(&response, 0).unwrap();
        assert_eq!(message.role, MessageRole::Assistant);
        assert_eq!(
            message.text(),
            "Model response terminated early. Finish Reason: MAX_TOKENS.\nThe repository is a"
        );
    }

    #[test]
    fn test_google_safety_stop_without_parts_still_explains() {
        let response = json!({ "candidates": [{ "finishReason": "SAFETY" }] });
        let message = ResponseParser::parse_google(&response, 0).unwrap();
        assert!(message.text().contains("Finish Reason: SAFETY"));
    }

    #[test]
    fn test_google_blocked_prompt_is_invalid_request() {
        let response = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let err = ResponseParser::parse_google(&response, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn test_anthropic_keeps_block_order() {
        let response = json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "content": [
                {"type": "text", "text": "First"},
                {"type": "tool_use", "id": "toolu_1", "name": "list_files", "input": {}},
                {"type": "text", "text": "Then"}
            ],
            "stop_reason": "tool_use"
        });
        let message = ResponseParser::parse_anthropic(&response, 0).unwrap();
        assert_eq!(message.content.len(), 3);
        assert_eq!(message.content[0].as_text(), Some("First"));
        assert_eq!(message.content[1].as_tool_call().unwrap().id, "toolu_1");
        assert_eq!(message.content[2].as_text(), Some("Then"));
    }

    #[test]
    fn test_openai_tool_calls() {
        let response = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {
                            "name": "get_weather",
                            "arguments": "{\"location\": \"San Francisco\"}"
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        });
        let message = ResponseParser::parse_openai(&response, 0).unwrap();
        let call = message.tool_calls().next().unwrap();
        assert_eq!(call.id, "call_abc");
        assert_eq!(call.get_string("location").as_deref(), Some("San Francisco"));
    }

    #[test]
    fn test_openai_malformed_arguments_are_not_swallowed() {
        let response = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "tool_calls": [{"function": {"name": "x", "arguments": "{not json"}}]
                }
            }]
        });
        let err = ResponseParser::parse_openai(&response, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProviderUnavailable);
    }

    #[test]
    fn test_empty_response_is_an_error() {
        let response = json!({ "choices": [{ "message": { "role": "assistant", "content": "" } }] });
        assert!(ResponseParser::parse_openai(&response, 0).is_err());

        let response: Value = json!({ "role": "assistant", "content": [] });
        assert!(ResponseParser::parse_anthropic(&response, 0).is_err());
    }
}
