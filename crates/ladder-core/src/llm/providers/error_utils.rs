//! Provider error classification and sanitization helpers.

use crate::error::LadderError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

const MAX_ERROR_TEXT_CHARS: usize = 1_024;
const REDACTED: &str = "[REDACTED]";

static BEARER_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bBearer\s+[A-Za-z0-9._\-+/=]{8,}").expect("valid bearer token regex")
});

static KEY_VALUE_SECRET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b(api[_-]?key|key|access[_-]?token|token|secret|password|authorization|x-api-key|x-goog-api-key)\b\s*[:=]\s*["']?[^"',&\s}]+"#,
    )
    .expect("valid key/value secret regex")
});

/// Sanitize provider error text by redacting secrets and truncating large payloads.
pub fn sanitize_provider_error_text(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "<empty error response body>".to_string();
    }

    if let Ok(mut json) = serde_json::from_str::<Value>(trimmed) {
        redact_json_value(&mut json);
        let serialized =
            serde_json::to_string(&json).unwrap_or_else(|_| "<unserializable error>".to_string());
        return truncate_with_suffix(serialized);
    }

    truncate_with_suffix(redact_inline_secrets(trimmed))
}

fn redact_json_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, val) in map.iter_mut() {
                if is_sensitive_key(key) {
                    *val = Value::String(REDACTED.to_string());
                } else {
                    redact_json_value(val);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_json_value),
        Value::String(s) => *s = redact_inline_secrets(s),
        _ => {}
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let normalized = key.to_ascii_lowercase().replace(['-', ' '], "_");
    [
        "api_key",
        "token",
        "secret",
        "password",
        "authorization",
        "cookie",
        "private_key",
    ]
    .iter()
    .any(|needle| normalized.contains(needle))
}

fn redact_inline_secrets(input: &str) -> String {
    let redacted_bearer = BEARER_TOKEN_RE.replace_all(input, "Bearer [REDACTED]");
    KEY_VALUE_SECRET_RE
        .replace_all(&redacted_bearer, "$1=[REDACTED]")
        .into_owned()
}

fn truncate_with_suffix(input: String) -> String {
    let char_count = input.chars().count();
    if char_count <= MAX_ERROR_TEXT_CHARS {
        return input;
    }

    let truncated: String = input.chars().take(MAX_ERROR_TEXT_CHARS).collect();
    format!(
        "{}... [truncated {} chars]",
        truncated,
        char_count - MAX_ERROR_TEXT_CHARS
    )
}

/// Map an HTTP status and response body onto the error taxonomy.
///
/// The body is sanitized before it becomes part of the message.
pub fn classify_status(status: u16, body: &str) -> LadderError {
    let sanitized = sanitize_provider_error_text(body);
    let message = format!("status {}: {}", status, sanitized);

    // Gemini reports quota and key problems in the body as well
    if body.contains("RESOURCE_EXHAUSTED") {
        return LadderError::rate_limited(message);
    }
    if body.contains("API_KEY_INVALID") {
        return LadderError::authentication(message);
    }

    match status {
        429 => LadderError::rate_limited(message),
        401 | 403 => LadderError::authentication(message),
        408 | 529 => LadderError::provider_unavailable(message),
        500..=599 => LadderError::provider_unavailable(message),
        400..=499 => LadderError::invalid_request(message),
        _ => LadderError::provider_unavailable(format!("unexpected {}", message)),
    }
}

/// Build a LadderError from a non-success HTTP response.
pub async fn handle_http_error(response: reqwest::Response, provider: &str) -> LadderError {
    let status = response.status().as_u16();
    let error_text = response.text().await.unwrap_or_default();
    let error = classify_status(status, &error_text);
    tracing::debug!(provider, status, kind = %error.kind(), "provider returned an error status");
    error
}

/// Build a LadderError from a body that is not valid JSON.
pub fn handle_parse_error(err: reqwest::Error, provider: &str) -> LadderError {
    LadderError::provider_unavailable(format!(
        "failed to deserialize {} response as JSON: {}",
        provider, err
    ))
}
