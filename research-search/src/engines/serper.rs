//! Serper.dev Google results API.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::SearchConfig;
use crate::engine::SearchBackend;
use crate::error::SearchError;
use crate::http;
use crate::orchestrator::scoring::score_by_position;
use crate::types::{SearchProvider, SearchResult};

/// Production endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://google.serper.dev";

/// Serper backend. Authenticates with the `X-API-KEY` header.
#[derive(Debug, Clone)]
pub struct SerperEngine {
    base_url: String,
}

impl SerperEngine {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }
}

impl Default for SerperEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchBackend for SerperEngine {
    fn provider(&self) -> SearchProvider {
        SearchProvider::Serper
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
        config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let key = config
            .credentials
            .serper_api_key
            .as_deref()
            .ok_or_else(|| SearchError::MissingCredential("SERPER_API_KEY".into()))?;

        tracing::trace!(query, "Serper search");

        let client = http::build_client(config)?;
        let response = client
            .post(format!("{}/search", self.base_url))
            .header("X-API-KEY", key)
            .json(&json!({ "q": query, "num": max_results }))
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest("Serper request failed", e))?;
        let body = http::read_body("Serper", response).await?;

        parse_serper_json(&body, max_results)
    }
}

#[derive(Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperOrganic>,
}

#[derive(Deserialize)]
struct SerperOrganic {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

/// Parse the `organic` section of a Serper response.
pub fn parse_serper_json(body: &str, max_results: usize) -> Result<Vec<SearchResult>, SearchError> {
    let response: SerperResponse = serde_json::from_str(body)
        .map_err(|e| SearchError::Parse(format!("Serper response: {e}")))?;

    let results = response
        .organic
        .into_iter()
        .filter(|o| !o.link.is_empty())
        .take(max_results)
        .map(|o| SearchResult::new(o.title, o.link, o.snippet, SearchProvider::Serper))
        .collect();
    Ok(score_by_position(results))
}
