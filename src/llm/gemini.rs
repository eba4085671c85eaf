//! Google Gemini `generateContent` adapter.

use async_trait::async_trait;
use std::time::Duration;

use super::error::{LlmError, Result};
use super::provider::{
    http_client, map_http_error, non_empty, Completion, CompletionProvider, CompletionRequest,
};

#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    /// Base URL for the API (defaults to `https://generativelanguage.googleapis.com`).
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
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

pub fn build_generate_request(request: &CompletionRequest) -> serde_json::Value {
    let mut body = serde_json::json!({
        "contents": [{"role": "user", "parts": [{"text": request.prompt}]}],
        "generationConfig": {
            "maxOutputTokens": request.max_tokens,
            "temperature": request.temperature,
        },
    });
    if let Some(system) = &request.system {
        body["systemInstruction"] = serde_json::json!({"parts": [{"text": system}]});
    }
    body
}

/// Text of the first candidate, parts concatenated.
pub fn parse_generate_response(body: &serde_json::Value) -> Option<String> {
    let parts = body
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    Some(
        parts
            .iter()
            .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
            .collect(),
    )
}

/// Gemini provider.
pub struct GeminiProvider {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("base_url", &self.config.base_url)
            .finish()
    }
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig) -> Self {
        let client = http_client(config.timeout);
        Self { config, client }
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, model: &str, request: &CompletionRequest) -> Result<Completion> {
        let url = format!(
            "{}/v1beta/models/{model}:generateContent",
            self.config.base_url
        );
        let body = build_generate_request(request);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest("Gemini", &e))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_http_error("Gemini", status, &body_text));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::Provider(format!("Gemini response was not JSON: {e}")))?;
        non_empty("Gemini", model, parse_generate_response(&json))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_shape() {
        let req = CompletionRequest::new("prompt").with_max_tokens(256);
        let body = build_generate_request(&req);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "prompt");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 256);
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn parse_first_candidate() {
        let body = serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": "one "}, {"text": "two"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        });
        assert_eq!(parse_generate_response(&body).as_deref(), Some("one two"));
    }

    #[test]
    fn parse_blocked_prompt_has_no_candidates() {
        let body = serde_json::json!({"promptFeedback": {"blockReason": "SAFETY"}});
        assert!(parse_generate_response(&body).is_none());
    }
}
