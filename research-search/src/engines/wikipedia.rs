//! Wikipedia article search via the MediaWiki `list=search` API.

use async_trait::async_trait;
use scraper::Html;
use serde::Deserialize;

use crate::config::SearchConfig;
use crate::engine::SearchBackend;
use crate::error::SearchError;
use crate::http;
use crate::types::{SearchProvider, SearchResult};

/// Production endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://en.wikipedia.org";

/// Fixed relevance assigned to every Wikipedia hit.
pub const WIKIPEDIA_RELEVANCE: f64 = 0.6;

/// Snippets longer than this are cut and suffixed with `...`.
pub const MAX_SNIPPET_CHARS: usize = 500;

/// Wikipedia backend. Keyless.
#[derive(Debug, Clone)]
pub struct WikipediaEngine {
    base_url: String,
}

impl WikipediaEngine {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }
}

impl Default for WikipediaEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchBackend for WikipediaEngine {
    fn provider(&self) -> SearchProvider {
        SearchProvider::Wikipedia
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
        config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, "Wikipedia search");

        let limit = max_results.to_string();
        let client = http::build_client(config)?;
        let response = client
            .get(format!("{}/w/api.php", self.base_url))
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("format", "json"),
                ("srsearch", query),
                ("srlimit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest("Wikipedia request failed", e))?;
        let body = http::read_body("Wikipedia", response).await?;

        parse_wikipedia_json(&body, &self.base_url, max_results)
    }
}

#[derive(Deserialize)]
struct WikiResponse {
    #[serde(default)]
    query: Option<WikiQuery>,
}

#[derive(Deserialize)]
struct WikiQuery {
    #[serde(default)]
    search: Vec<WikiHit>,
}

#[derive(Deserialize)]
struct WikiHit {
    title: String,
    #[serde(default)]
    snippet: String,
}

/// Remove highlight markup and decode entities from a search snippet.
fn strip_html(fragment: &str) -> String {
    let parsed = Html::parse_fragment(fragment);
    let text: String = parsed.root_element().text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn cap_snippet(text: String) -> String {
    if text.chars().count() <= MAX_SNIPPET_CHARS {
        return text;
    }
    let mut capped: String = text.chars().take(MAX_SNIPPET_CHARS).collect();
    capped.push_str("...");
    capped
}

/// Article URL for a page title on the given wiki.
pub fn article_url(base_url: &str, title: &str) -> String {
    let slug = title.replace(' ', "_");
    let encoded: String = url::form_urlencoded::byte_serialize(slug.as_bytes()).collect();
    // Keep path-safe characters readable.
    let encoded = encoded.replace("%28", "(").replace("%29", ")").replace("%2C", ",");
    format!("{}/wiki/{encoded}", base_url.trim_end_matches('/'))
}

/// Parse a MediaWiki search response.
pub fn parse_wikipedia_json(
    body: &str,
    base_url: &str,
    max_results: usize,
) -> Result<Vec<SearchResult>, SearchError> {
    let response: WikiResponse = serde_json::from_str(body)
        .map_err(|e| SearchError::Parse(format!("Wikipedia response: {e}")))?;

    Ok(response
        .query
        .map(|q| q.search)
        .unwrap_or_default()
        .into_iter()
        .take(max_results)
        .map(|hit| {
            let url = article_url(base_url, &hit.title);
            let snippet = cap_snippet(strip_html(&hit.snippet));
            SearchResult::new(hit.title, url, snippet, SearchProvider::Wikipedia)
                .with_score(WIKIPEDIA_RELEVANCE)
        })
        .collect())
}
