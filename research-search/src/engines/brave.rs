//! Brave Search API.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::SearchConfig;
use crate::engine::SearchBackend;
use crate::error::SearchError;
use crate::http;
use crate::orchestrator::scoring::score_by_position;
use crate::types::{SearchProvider, SearchResult};

/// Production endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://api.search.brave.com";

/// The API rejects `count` above 20.
const MAX_COUNT: usize = 20;

/// Brave Search backend. Authenticates with `X-Subscription-Token`.
#[derive(Debug, Clone)]
pub struct BraveEngine {
    base_url: String,
}

impl BraveEngine {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }
}

impl Default for BraveEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchBackend for BraveEngine {
    fn provider(&self) -> SearchProvider {
        SearchProvider::Brave
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
        config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let token = config
            .credentials
            .brave_api_key
            .as_deref()
            .ok_or_else(|| SearchError::MissingCredential("BRAVE_API_KEY".into()))?;

        tracing::trace!(query, "Brave search");

        let count = max_results.clamp(1, MAX_COUNT).to_string();
        let safe = if config.safe_search { "strict" } else { "off" };

        let client = http::build_client(config)?;
        let response = client
            .get(format!("{}/res/v1/web/search", self.base_url))
            .query(&[("q", query), ("count", count.as_str()), ("safesearch", safe)])
            .header("Accept", "application/json")
            .header("X-Subscription-Token", token)
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest("Brave request failed", e))?;
        let body = http::read_body("Brave", response).await?;

        parse_brave_json(&body, max_results)
    }
}

#[derive(Deserialize)]
struct BraveResponse {
    #[serde(default)]
    web: Option<BraveWeb>,
}

#[derive(Deserialize)]
struct BraveWeb {
    #[serde(default)]
    results: Vec<BraveItem>,
}

#[derive(Deserialize)]
struct BraveItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: String,
}

/// Parse the `web.results` section of a Brave response.
pub fn parse_brave_json(body: &str, max_results: usize) -> Result<Vec<SearchResult>, SearchError> {
    let response: BraveResponse = serde_json::from_str(body)
        .map_err(|e| SearchError::Parse(format!("Brave response: {e}")))?;

    let results = response
        .web
        .map(|web| web.results)
        .unwrap_or_default()
        .into_iter()
        .filter(|item| !item.url.is_empty())
        .take(max_results)
        .map(|item| {
            SearchResult::new(item.title, item.url, item.description, SearchProvider::Brave)
        })
        .collect();
    Ok(score_by_position(results))
}
