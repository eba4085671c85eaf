//! Anthropic Messages API adapter.

use async_trait::async_trait;
use std::time::Duration;

use super::error::{LlmError, Result};
use super::provider::{
    http_client, map_http_error, non_empty, Completion, CompletionProvider, CompletionRequest,
};

/// Configuration for the Anthropic adapter.
#[derive(Clone)]
pub struct AnthropicConfig {
    pub api_key: String,
    /// Base URL for the API (defaults to `https://api.anthropic.com`).
    pub base_url: String,
    /// API version header value.
    pub api_version: String,
    pub timeout: Option<Duration>,
}

impl AnthropicConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.anthropic.com".to_string(),
            api_version: "2023-06-01".to_string(),
            timeout: None,
        }
    }

    /// Set the base URL (useful for testing with mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Build a Messages API request body. The system instruction goes top-level.
pub fn build_messages_request(model: &str, request: &CompletionRequest) -> serde_json::Value {
    let mut body = serde_json::json!({
        "model": model,
        "max_tokens": request.max_tokens,
        "temperature": request.temperature,
        "messages": [{"role": "user", "content": request.prompt}],
    });
    if let Some(system) = &request.system {
        body["system"] = serde_json::Value::String(system.clone());
    }
    body
}

/// Concatenate the `text` content blocks of a response.
pub fn parse_messages_response(body: &serde_json::Value) -> Option<String> {
    let blocks = body.get("content")?.as_array()?;
    let text: String = blocks
        .iter()
        .filter(|b| b.get("type").and_then(|t| t.as_str()) == Some("text"))
        .filter_map(|b| b.get("text").and_then(|t| t.as_str()))
        .collect();
    Some(text)
}

/// Anthropic Messages provider.
pub struct AnthropicProvider {
    config: AnthropicConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("base_url", &self.config.base_url)
            .field("api_version", &self.config.api_version)
            .finish()
    }
}

impl AnthropicProvider {
    pub fn new(config: AnthropicConfig) -> Self {
        let client = http_client(config.timeout);
        Self { config, client }
    }
}

#[async_trait]
impl CompletionProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, model: &str, request: &CompletionRequest) -> Result<Completion> {
        let url = format!("{}/v1/messages", self.config.base_url);
        let body = build_messages_request(model, request);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", &self.config.api_version)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest("Anthropic", &e))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_http_error("Anthropic", status, &body_text));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::Provider(format!("Anthropic response was not JSON: {e}")))?;
        non_empty("Anthropic", model, parse_messages_response(&json))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_is_top_level() {
        let req = CompletionRequest::new("question").with_system("persona");
        let body = build_messages_request("claude-2.1", &req);
        assert_eq!(body["system"], "persona");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn parse_joins_text_blocks() {
        let body = serde_json::json!({
            "content": [
                {"type": "text", "text": "Hello "},
                {"type": "tool_use", "id": "t1"},
                {"type": "text", "text": "world"}
            ]
        });
        assert_eq!(parse_messages_response(&body).as_deref(), Some("Hello world"));
    }

    #[test]
    fn parse_missing_content() {
        assert!(parse_messages_response(&serde_json::json!({"id": "x"})).is_none());
    }
}
