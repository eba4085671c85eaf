//! Ordered model fallback for one provider.
//!
//! [`ModelChain`] tries each concrete model id in order and returns the first
//! completion. Every failed attempt is captured, so callers see either a
//! completion with the failures that preceded it or the full list of failures.
//! An empty chain is valid and is immediately exhausted.

use std::sync::Arc;
use tracing::{info, warn};

use super::error::LlmError;
use super::family::ModelFamily;
use super::provider::{Completion, CompletionProvider, CompletionRequest};

/// One failed model attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelFailure {
    pub model: String,
    pub error: LlmError,
}

/// Result of running a chain.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainOutcome {
    /// A model answered. `failures` lists the models tried before it.
    Completed {
        completion: Completion,
        failures: Vec<ModelFailure>,
    },
    /// Every model failed, or the chain was empty.
    Exhausted { failures: Vec<ModelFailure> },
}

impl ChainOutcome {
    pub fn completion(&self) -> Option<&Completion> {
        match self {
            Self::Completed { completion, .. } => Some(completion),
            Self::Exhausted { .. } => None,
        }
    }

    pub fn failures(&self) -> &[ModelFailure] {
        match self {
            Self::Completed { failures, .. } | Self::Exhausted { failures } => failures,
        }
    }
}

/// Concrete models tried in order against one provider.
#[derive(Clone)]
pub struct ModelChain {
    provider: Option<Arc<dyn CompletionProvider>>,
    models: Vec<String>,
}

impl std::fmt::Debug for ModelChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelChain")
            .field("provider", &self.provider.as_ref().map(|p| p.name().to_owned()))
            .field("models", &self.models)
            .finish()
    }
}

impl ModelChain {
    pub fn new(provider: Arc<dyn CompletionProvider>, models: Vec<String>) -> Self {
        Self {
            provider: Some(provider),
            models,
        }
    }

    /// Chain over every variant of `family`.
    pub fn for_family(provider: Arc<dyn CompletionProvider>, family: ModelFamily) -> Self {
        let models = family.variants().iter().map(|m| (*m).to_owned()).collect();
        Self::new(provider, models)
    }

    /// A chain with nothing to try.
    pub fn empty() -> Self {
        Self {
            provider: None,
            models: Vec::new(),
        }
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn is_empty(&self) -> bool {
        self.provider.is_none() || self.models.is_empty()
    }

    /// Try each model until one produces a completion.
    pub async fn run(&self, request: &CompletionRequest) -> ChainOutcome {
        let mut failures = Vec::new();
        let Some(provider) = &self.provider else {
            return ChainOutcome::Exhausted { failures };
        };

        for model in &self.models {
            match provider.complete(model, request).await {
                Ok(completion) => {
                    info!(
                        provider = provider.name(),
                        model = model.as_str(),
                        prior_failures = failures.len(),
                        "completion succeeded"
                    );
                    return ChainOutcome::Completed {
                        completion,
                        failures,
                    };
                }
                Err(error) => {
                    warn!(
                        provider = provider.name(),
                        model = model.as_str(),
                        code = error.code(),
                        error = %error,
                        "model attempt failed, trying next"
                    );
                    failures.push(ModelFailure {
                        model: model.clone(),
                        error,
                    });
                }
            }
        }
        ChainOutcome::Exhausted { failures }
    }
}
