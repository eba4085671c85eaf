//! Google Custom Search JSON API.
//!
//! Needs both an API key and a Programmable Search Engine id (`cx`).
//! The API returns at most 10 items per request.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::SearchConfig;
use crate::engine::SearchBackend;
use crate::error::SearchError;
use crate::http;
use crate::orchestrator::scoring::score_by_position;
use crate::types::{SearchProvider, SearchResult};

/// Production endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";

/// Hard per-request item limit imposed by the API.
const MAX_ITEMS_PER_REQUEST: usize = 10;

/// Google Custom Search backend.
#[derive(Debug, Clone)]
pub struct GoogleEngine {
    base_url: String,
}

impl GoogleEngine {
    /// Backend pointed at the production API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Backend pointed at a different endpoint root (mock servers, proxies).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }
}

impl Default for GoogleEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchBackend for GoogleEngine {
    fn provider(&self) -> SearchProvider {
        SearchProvider::Google
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
        config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let creds = &config.credentials;
        let key = creds
            .google_api_key
            .as_deref()
            .ok_or_else(|| SearchError::MissingCredential("GOOGLE_SEARCH_API_KEY".into()))?;
        let cx = creds
            .google_engine_id
            .as_deref()
            .ok_or_else(|| SearchError::MissingCredential("GOOGLE_SEARCH_ENGINE_ID".into()))?;

        tracing::trace!(query, "Google search");

        let num = max_results.clamp(1, MAX_ITEMS_PER_REQUEST).to_string();
        let mut params = vec![("key", key), ("cx", cx), ("q", query), ("num", num.as_str())];
        if config.safe_search {
            params.push(("safe", "active"));
        }

        let client = http::build_client(config)?;
        let response = client
            .get(format!("{}/customsearch/v1", self.base_url))
            .query(&params)
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest("Google request failed", e))?;
        let body = http::read_body("Google", response).await?;

        parse_google_json(&body, max_results)
    }
}

#[derive(Deserialize)]
struct GoogleResponse {
    #[serde(default)]
    items: Vec<GoogleItem>,
}

#[derive(Deserialize)]
struct GoogleItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

/// Parse a Custom Search response body.
///
/// A response without `items` (no hits) is an empty list, not an error.
pub fn parse_google_json(body: &str, max_results: usize) -> Result<Vec<SearchResult>, SearchError> {
    let response: GoogleResponse = serde_json::from_str(body)
        .map_err(|e| SearchError::Parse(format!("Google response: {e}")))?;

    let results = response
        .items
        .into_iter()
        .filter(|item| !item.link.is_empty())
        .take(max_results)
        .map(|item| SearchResult::new(item.title, item.link, item.snippet, SearchProvider::Google))
        .collect();
    Ok(score_by_position(results))
}
