//! Summarization request handling.
//!
//! Builds a prompt from the caller's results, then runs the requested model
//! family's chain. Exhausting the chain is a normal response carrying a
//! placeholder summary, never an error.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::credentials::RequiredLlmKeys;
use crate::llm::{
    build_provider, AiProvider, ChainOutcome, CompletionProvider, CompletionRequest, ModelChain,
    ModelFamily,
};
use crate::prompt::{PromptBuilder, ResultItem};

/// Model family used when a request does not name one.
pub const DEFAULT_MODEL: &str = "gpt-4o";

fn default_model() -> String {
    DEFAULT_MODEL.to_owned()
}

/// `POST /summarize` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeRequest {
    pub query: String,
    pub results: Vec<ResultItem>,
    #[serde(default = "default_model")]
    pub model: String,
}

/// `POST /summarize` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
    /// Concrete model that answered, or the requested family on failure.
    pub model_used: String,
}

/// Placeholder returned when no model variant produced a summary.
pub fn unavailable_summary(model: &str) -> String {
    format!("Unable to generate summary with the selected model: {model}")
}

/// One provider per model family.
#[derive(Clone)]
pub struct SummarizerProviders {
    pub openai: Arc<dyn CompletionProvider>,
    pub anthropic: Arc<dyn CompletionProvider>,
    pub gemini: Arc<dyn CompletionProvider>,
}

impl SummarizerProviders {
    /// Default-endpoint adapters for all three vendors.
    pub fn from_keys(keys: RequiredLlmKeys, timeout: Option<Duration>) -> Self {
        Self {
            openai: build_provider(AiProvider::OpenAi, keys.openai, timeout),
            anthropic: build_provider(AiProvider::Anthropic, keys.anthropic, timeout),
            gemini: build_provider(AiProvider::Google, keys.google, timeout),
        }
    }

    pub fn for_family(&self, family: ModelFamily) -> Arc<dyn CompletionProvider> {
        match family.provider() {
            AiProvider::OpenAi => Arc::clone(&self.openai),
            AiProvider::Anthropic => Arc::clone(&self.anthropic),
            AiProvider::Google => Arc::clone(&self.gemini),
        }
    }
}

/// Stateless summarization over injected providers.
pub struct SummarizationService {
    providers: SummarizerProviders,
    prompts: PromptBuilder,
    max_tokens: u32,
    temperature: f32,
}

impl SummarizationService {
    pub fn new(providers: SummarizerProviders, prompts: PromptBuilder) -> Self {
        let defaults = CompletionRequest::new(String::new());
        Self {
            providers,
            prompts,
            max_tokens: defaults.max_tokens,
            temperature: defaults.temperature,
        }
    }

    pub fn with_sampling(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    /// Model chain for a requested family name; unknown names get an empty chain.
    pub fn chain_for(&self, model: &str) -> ModelChain {
        match model.parse::<ModelFamily>() {
            Ok(family) => ModelChain::for_family(self.providers.for_family(family), family),
            Err(e) => {
                warn!(model, error = %e, "no model variants for requested model");
                ModelChain::empty()
            }
        }
    }

    pub async fn summarize(&self, request: SummarizeRequest) -> SummarizeResponse {
        let request_id = Uuid::new_v4();
        let SummarizeRequest {
            query,
            results,
            model,
        } = request;
        info!(
            %request_id,
            results = results.len(),
            model = model.as_str(),
            "processing summarize request"
        );
        tracing::trace!(%request_id, query = query.as_str(), "summarize query");

        let prompt = self.prompts.build(&query, results);
        let completion_request = CompletionRequest::new(prompt.text)
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature);

        match self.chain_for(&model).run(&completion_request).await {
            ChainOutcome::Completed { completion, .. } => {
                info!(%request_id, model_used = completion.model.as_str(), "summary generated");
                SummarizeResponse {
                    summary: completion.text,
                    model_used: completion.model,
                }
            }
            ChainOutcome::Exhausted { failures } => {
                warn!(
                    %request_id,
                    model = model.as_str(),
                    attempts = failures.len(),
                    "all model variants failed"
                );
                SummarizeResponse {
                    summary: unavailable_summary(&model),
                    model_used: model,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::entities::EntityExtractor;
    use crate::llm::{Completion, LlmError, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recorder {
        name: &'static str,
        answer: Option<&'static str>,
        seen: Mutex<Vec<(String, CompletionRequest)>>,
    }

    impl Recorder {
        fn new(name: &'static str, answer: Option<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                name,
                answer,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CompletionProvider for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        async fn complete(&self, model: &str, request: &CompletionRequest) -> Result<Completion> {
            self.seen
                .lock()
                .unwrap()
                .push((model.to_owned(), request.clone()));
            match self.answer {
                Some(text) => Ok(Completion {
                    text: text.to_owned(),
                    model: model.to_owned(),
                }),
                None => Err(LlmError::Request("connection refused".into())),
            }
        }
    }

    fn service(
        openai: Arc<Recorder>,
        anthropic: Arc<Recorder>,
        gemini: Arc<Recorder>,
    ) -> SummarizationService {
        SummarizationService::new(
            SummarizerProviders {
                openai,
                anthropic,
                gemini,
            },
            PromptBuilder::new(EntityExtractor::heuristic().unwrap()),
        )
    }

    fn request(model: &str) -> SummarizeRequest {
        SummarizeRequest {
            query: "top 10 AI tools".into(),
            results: vec![ResultItem::new("AI Tools", "A roundup.", "https://a.com")],
            model: model.into(),
        }
    }

    #[test]
    fn request_model_defaults_to_gpt4o() {
        let req: SummarizeRequest =
            serde_json::from_str(r#"{"query":"q","results":[]}"#).unwrap();
        assert_eq!(req.model, "gpt-4o");
    }

    #[tokio::test]
    async fn routes_family_to_its_provider() {
        let openai = Recorder::new("openai", Some("unused"));
        let anthropic = Recorder::new("anthropic", Some("Claude summary"));
        let gemini = Recorder::new("gemini", Some("unused"));
        let svc = service(openai.clone(), anthropic.clone(), gemini.clone());

        let response = svc.summarize(request("claude")).await;
        assert_eq!(response.summary, "Claude summary");
        assert_eq!(response.model_used, "claude-3-sonnet-20240229");
        assert!(openai.seen.lock().unwrap().is_empty());

        let seen = anthropic.seen.lock().unwrap();
        let (_, sent) = &seen[0];
        assert_eq!(sent.max_tokens, 800);
        assert!(sent.prompt.contains("[1] AI Tools"));
    }

    #[tokio::test]
    async fn exhausted_chain_returns_placeholder() {
        let failing = || Recorder::new("down", None);
        let gemini = failing();
        let svc = service(failing(), failing(), gemini.clone());

        let response = svc.summarize(request("gemini")).await;
        assert_eq!(
            response,
            SummarizeResponse {
                summary: "Unable to generate summary with the selected model: gemini".into(),
                model_used: "gemini".into(),
            }
        );
        assert_eq!(gemini.seen.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn unknown_model_gets_placeholder_without_calls() {
        let openai = Recorder::new("openai", Some("never"));
        let svc = service(
            openai.clone(),
            Recorder::new("anthropic", Some("never")),
            Recorder::new("gemini", Some("never")),
        );
        let response = svc.summarize(request("llama-3")).await;
        assert_eq!(response.model_used, "llama-3");
        assert!(response.summary.starts_with("Unable to generate summary"));
        assert!(openai.seen.lock().unwrap().is_empty());
    }
}
