//! Hosted language model access.
//!
//! Three adapters share the [`CompletionProvider`] trait:
//! - **OpenAI** Chat Completions
//! - **Anthropic** Messages
//! - **Google** Gemini `generateContent`
//!
//! [`ModelChain`] layers ordered model fallback on top of any provider.

pub mod anthropic;
pub mod error;
pub mod fallback;
pub mod family;
pub mod gemini;
pub mod openai;
pub mod provider;

pub use anthropic::{AnthropicConfig, AnthropicProvider};
pub use error::{LlmError, Result};
pub use fallback::{ChainOutcome, ModelChain, ModelFailure};
pub use family::ModelFamily;
pub use gemini::{GeminiConfig, GeminiProvider};
pub use openai::{OpenAiConfig, OpenAiProvider};
pub use provider::{AiProvider, Completion, CompletionProvider, CompletionRequest};

use std::sync::Arc;
use std::time::Duration;

/// Construct the adapter for `provider` with its default endpoint.
pub fn build_provider(
    provider: AiProvider,
    api_key: impl Into<String>,
    timeout: Option<Duration>,
) -> Arc<dyn CompletionProvider> {
    let api_key = api_key.into();
    match provider {
        AiProvider::OpenAi => {
            let mut config = OpenAiConfig::new(api_key);
            config.timeout = timeout;
            Arc::new(OpenAiProvider::new(config))
        }
        AiProvider::Anthropic => {
            let mut config = AnthropicConfig::new(api_key);
            config.timeout = timeout;
            Arc::new(AnthropicProvider::new(config))
        }
        AiProvider::Google => {
            let mut config = GeminiConfig::new(api_key);
            config.timeout = timeout;
            Arc::new(GeminiProvider::new(config))
        }
    }
}
