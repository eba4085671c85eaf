//! Tavily search API.
//!
//! Tavily is the only web provider that reports its own relevance score;
//! that score is used as-is instead of position decay.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::SearchConfig;
use crate::engine::SearchBackend;
use crate::error::SearchError;
use crate::http;
use crate::types::{SearchProvider, SearchResult};

/// Production endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://api.tavily.com";

/// Tavily backend. The API key travels in the request body.
#[derive(Debug, Clone)]
pub struct TavilyEngine {
    base_url: String,
}

impl TavilyEngine {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }
}

impl Default for TavilyEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchBackend for TavilyEngine {
    fn provider(&self) -> SearchProvider {
        SearchProvider::Tavily
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
        config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let key = config
            .credentials
            .tavily_api_key
            .as_deref()
            .ok_or_else(|| SearchError::MissingCredential("TAVILY_API_KEY".into()))?;

        tracing::trace!(query, "Tavily search");

        let client = http::build_client(config)?;
        let response = client
            .post(format!("{}/search", self.base_url))
            .json(&json!({
                "api_key": key,
                "query": query,
                "max_results": max_results,
                "search_depth": "advanced",
            }))
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest("Tavily request failed", e))?;
        let body = http::read_body("Tavily", response).await?;

        parse_tavily_json(&body, max_results)
    }
}

#[derive(Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyItem>,
}

#[derive(Deserialize)]
struct TavilyItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    score: f64,
}

/// Parse a Tavily response. `content` becomes the snippet.
pub fn parse_tavily_json(body: &str, max_results: usize) -> Result<Vec<SearchResult>, SearchError> {
    let response: TavilyResponse = serde_json::from_str(body)
        .map_err(|e| SearchError::Parse(format!("Tavily response: {e}")))?;

    Ok(response
        .results
        .into_iter()
        .filter(|item| !item.url.is_empty())
        .take(max_results)
        .map(|item| {
            SearchResult::new(item.title, item.url, item.content, SearchProvider::Tavily)
                .with_score(item.score)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_native_scores() {
        let body = r#"{
            "query": "llm agents",
            "results": [
                {"title": "A", "url": "https://a.com", "content": "about a", "score": 0.91},
                {"title": "B", "url": "https://b.com", "content": "about b", "score": 0.42}
            ]
        }"#;
        let results = parse_tavily_json(body, 5).expect("parse");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].snippet, "about a");
        assert!((results[0].relevance_score - 0.91).abs() < f64::EPSILON);
        assert!((results[1].relevance_score - 0.42).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_score_defaults_to_zero() {
        let body = r#"{"results": [{"title": "A", "url": "https://a.com", "content": "x"}]}"#;
        let results = parse_tavily_json(body, 5).expect("parse");
        assert_eq!(results[0].relevance_score, 0.0);
    }

    #[test]
    fn error_payload_without_results_is_empty() {
        let results = parse_tavily_json(r#"{"detail": "rate limited"}"#, 5).expect("parse");
        assert!(results.is_empty());
    }
}
