//! Completion provider trait and shared request types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::error::{LlmError, Result};

/// Hosted LLM vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    OpenAi,
    Anthropic,
    Google,
}

impl AiProvider {
    /// Lowercase identifier used on the command line and in config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
        }
    }

    /// Environment variable holding this vendor's API key.
    pub fn key_var(&self) -> &'static str {
        match self {
            Self::OpenAi => crate::credentials::OPENAI_API_KEY,
            Self::Anthropic => crate::credentials::ANTHROPIC_API_KEY,
            Self::Google => crate::credentials::GOOGLE_API_KEY,
        }
    }

    pub fn all() -> [AiProvider; 3] {
        [Self::OpenAi, Self::Anthropic, Self::Google]
    }
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AiProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            "google" | "gemini" => Ok(Self::Google),
            other => Err(format!("unknown AI provider: {other}")),
        }
    }
}

/// A single-turn completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// User prompt.
    pub prompt: String,
    /// Optional system instruction.
    pub system: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    /// Request with the summarizer defaults (800 tokens, temperature 0.7).
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system: None,
            max_tokens: 800,
            temperature: 0.7,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Text produced by a provider, tagged with the concrete model that wrote it.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub model: String,
}

/// A hosted LLM API that turns a prompt into text.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short lowercase provider name for logs.
    fn name(&self) -> &str;

    /// Run one completion against the concrete `model`.
    async fn complete(&self, model: &str, request: &CompletionRequest) -> Result<Completion>;
}

/// Build an HTTP client, applying `timeout` when set.
pub(crate) fn http_client(timeout: Option<Duration>) -> reqwest::Client {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().unwrap_or_else(|_| reqwest::Client::new())
}

/// Map an HTTP error status to the appropriate [`LlmError`].
pub(crate) fn map_http_error(provider: &str, status: reqwest::StatusCode, body: &str) -> LlmError {
    let message = extract_error_message(body);
    match status.as_u16() {
        401 | 403 => LlmError::Auth(format!("{provider} authentication failed: {message}")),
        429 => LlmError::Request(format!("{provider} rate limited: {message}")),
        code => LlmError::Provider(format!("{provider} HTTP {code}: {message}")),
    }
}

/// Extract `error.message` from a JSON error body, falling back to the raw body.
pub(crate) fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string())
}

/// Reject blank completions.
pub(crate) fn non_empty(provider: &str, model: &str, text: Option<String>) -> Result<Completion> {
    match text {
        Some(text) if !text.trim().is_empty() => Ok(Completion {
            text: text.trim().to_owned(),
            model: model.to_owned(),
        }),
        _ => Err(LlmError::EmptyCompletion(format!(
            "{provider} returned no text for {model}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parses_and_displays() {
        assert_eq!("OpenAI".parse::<AiProvider>(), Ok(AiProvider::OpenAi));
        assert_eq!("gemini".parse::<AiProvider>(), Ok(AiProvider::Google));
        assert!("mistral".parse::<AiProvider>().is_err());
        assert_eq!(AiProvider::Anthropic.to_string(), "anthropic");
        assert_eq!(AiProvider::Google.key_var(), "GOOGLE_API_KEY");
    }

    #[test]
    fn request_defaults() {
        let req = CompletionRequest::new("hi");
        assert_eq!(req.max_tokens, 800);
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
        assert!(req.system.is_none());
    }

    #[test]
    fn extract_error_from_json() {
        let body = r#"{"error":{"message":"Invalid API key","type":"authentication_error"}}"#;
        assert_eq!(extract_error_message(body), "Invalid API key");
        assert_eq!(extract_error_message("Something went wrong"), "Something went wrong");
    }

    #[test]
    fn http_status_mapping() {
        let auth = map_http_error("openai", reqwest::StatusCode::UNAUTHORIZED, "{}");
        assert_eq!(auth.code(), "AUTH_FAILED");
        let limited = map_http_error("openai", reqwest::StatusCode::TOO_MANY_REQUESTS, "slow");
        assert_eq!(limited.code(), "REQUEST_FAILED");
        let server = map_http_error("openai", reqwest::StatusCode::BAD_GATEWAY, "oops");
        assert_eq!(server.to_string(), "[PROVIDER_ERROR] openai HTTP 502: oops");
    }

    #[test]
    fn blank_text_is_empty_completion() {
        let err = non_empty("anthropic", "claude-2.1", Some("  \n".into())).unwrap_err();
        assert_eq!(err.code(), "EMPTY_COMPLETION");
        let ok = non_empty("anthropic", "claude-2.1", Some(" hi ".into())).expect("text");
        assert_eq!(ok.text, "hi");
        assert_eq!(ok.model, "claude-2.1");
    }
}
