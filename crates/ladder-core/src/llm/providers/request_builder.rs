//! Shared HTTP plumbing for provider adapters

use super::error_utils::{handle_http_error, handle_parse_error};
use crate::error::{LadderError, LadderResult};
use crate::llm::provider_types::TimeoutConfig;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

/// Build the HTTP client shared by one adapter
pub fn build_http_client(timeouts: &TimeoutConfig) -> LadderResult<Client> {
    Client::builder()
        .connect_timeout(timeouts.connection_timeout())
        .timeout(timeouts.request_timeout())
        .build()
        .map_err(|e| LadderError::config(format!("failed to build HTTP client: {}", e)))
}

/// Send a JSON request and decode a JSON response, classifying failures
pub async fn send_json(request: RequestBuilder, body: &Value, provider: &str) -> LadderResult<Value> {
    tracing::debug!(provider, body = %body, "sending provider request");

    let response = request.json(body).send().await?;
    if !response.status().is_success() {
        return Err(handle_http_error(response, provider).await);
    }

    let response_json: Value = response
        .json()
        .await
        .map_err(|e| handle_parse_error(e, provider))?;
    tracing::debug!(provider, response = %response_json, "provider response received");
    Ok(response_json)
}
