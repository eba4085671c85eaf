//! OpenAI Chat Completions adapter.

use async_trait::async_trait;
use std::time::Duration;

use super::error::{LlmError, Result};
use super::provider::{
    http_client, map_http_error, non_empty, Completion, CompletionProvider, CompletionRequest,
};

/// Configuration for the OpenAI adapter.
#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    /// Base URL for the API (defaults to `https://api.openai.com`).
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.openai.com".to_string(),
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

/// Build a Chat Completions request body.
pub fn build_chat_request(model: &str, request: &CompletionRequest) -> serde_json::Value {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = &request.system {
        messages.push(serde_json::json!({"role": "system", "content": system}));
    }
    messages.push(serde_json::json!({"role": "user", "content": request.prompt}));

    serde_json::json!({
        "model": model,
        "messages": messages,
        "max_tokens": request.max_tokens,
        "temperature": request.temperature,
    })
}

/// Pull the first choice's message content out of a response body.
pub fn parse_chat_response(body: &serde_json::Value) -> Option<String> {
    body.get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .map(String::from)
}

/// OpenAI Chat Completions provider.
pub struct OpenAiProvider {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("base_url", &self.config.base_url)
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(config: OpenAiConfig) -> Self {
        let client = http_client(config.timeout);
        Self { config, client }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, model: &str, request: &CompletionRequest) -> Result<Completion> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);
        let body = build_chat_request(model, request);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest("OpenAI", &e))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_http_error("OpenAI", status, &body_text));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::Provider(format!("OpenAI response was not JSON: {e}")))?;
        non_empty("OpenAI", model, parse_chat_response(&json))
    }
}
