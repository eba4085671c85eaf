//! End-to-end tests for the summarization HTTP service.

use deep_research::config::ServerSection;
use deep_research::entities::EntityExtractor;
use deep_research::llm::{
    AnthropicConfig, AnthropicProvider, CompletionProvider, GeminiConfig, GeminiProvider,
    OpenAiConfig, OpenAiProvider,
};
use deep_research::prompt::PromptBuilder;
use deep_research::summarizer::{
    HealthResponse, SummarizationService, SummarizeResponse, SummarizerProviders,
    SummarizerServer,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Nothing listens on port 1, so every call fails fast.
const UNREACHABLE: &str = "http://127.0.0.1:1";

fn providers(openai_url: &str) -> SummarizerProviders {
    let timeout = Duration::from_secs(5);
    let openai: Arc<dyn CompletionProvider> = Arc::new(OpenAiProvider::new(
        OpenAiConfig::new("sk-test")
            .with_base_url(openai_url)
            .with_timeout(timeout),
    ));
    let anthropic: Arc<dyn CompletionProvider> = Arc::new(AnthropicProvider::new(
        AnthropicConfig::new("ak-test")
            .with_base_url(UNREACHABLE)
            .with_timeout(timeout),
    ));
    let gemini: Arc<dyn CompletionProvider> = Arc::new(GeminiProvider::new(
        GeminiConfig::new("gk-test")
            .with_base_url(UNREACHABLE)
            .with_timeout(timeout),
    ));
    SummarizerProviders {
        openai,
        anthropic,
        gemini,
    }
}

async fn start(openai_url: &str) -> SummarizerServer {
    let service = SummarizationService::new(
        providers(openai_url),
        PromptBuilder::new(EntityExtractor::heuristic().expect("recognizer")),
    );
    let config = ServerSection {
        host: "127.0.0.1".into(),
        port: 0,
    };
    SummarizerServer::start(Arc::new(service), &config)
        .await
        .expect("server starts")
}

fn body(model: Option<&str>) -> serde_json::Value {
    let mut body = json!({
        "query": "what is rust ownership",
        "results": [
            {"title": "Understanding Ownership", "snippet": "Ownership is Rust's most unique feature.", "url": "https://doc.rust-lang.org/book/ch04-01.html"},
            {"title": "Understanding ownership!", "snippet": "Duplicate title.", "url": "https://mirror.example/ownership"},
            {"title": "Borrowing in Rust", "snippet": "References borrow values.", "url": "https://www.example.com/borrowing"}
        ]
    });
    if let Some(model) = model {
        body["model"] = json!(model);
    }
    body
}

#[tokio::test]
async fn health_reports_ok() {
    let server = start(UNREACHABLE).await;
    let health: HealthResponse = reqwest::get(format!("http://{}/health", server.addr()))
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn default_model_summarizes_through_openai() {
    let openai = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("[1] Understanding Ownership"))
        .and(body_string_contains("[2] Borrowing in Rust"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Ownership governs memory [1]."}}]
        })))
        .expect(1)
        .mount(&openai)
        .await;

    let server = start(&openai.uri()).await;
    let response: SummarizeResponse = reqwest::Client::new()
        .post(format!("http://{}/summarize", server.addr()))
        .json(&body(None))
        .send()
        .await
        .expect("request")
        .json()
        .await
        .expect("json");

    assert_eq!(response.summary, "Ownership governs memory [1].");
    assert_eq!(response.model_used, "gpt-4o");
}

#[tokio::test]
async fn unreachable_family_returns_placeholder() {
    let server = start(UNREACHABLE).await;
    let response = reqwest::Client::new()
        .post(format!("http://{}/summarize", server.addr()))
        .json(&body(Some("claude")))
        .send()
        .await
        .expect("request");
    assert!(response.status().is_success());

    let response: SummarizeResponse = response.json().await.expect("json");
    assert_eq!(
        response.summary,
        "Unable to generate summary with the selected model: claude"
    );
    assert_eq!(response.model_used, "claude");
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let server = start(UNREACHABLE).await;
    let response = reqwest::Client::new()
        .post(format!("http://{}/summarize", server.addr()))
        .json(&json!({"results": []}))
        .send()
        .await
        .expect("request");
    assert!(response.status().is_client_error());
}
