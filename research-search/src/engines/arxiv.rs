//! arXiv paper search via the public Atom export API.

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

use crate::config::SearchConfig;
use crate::engine::SearchBackend;
use crate::error::SearchError;
use crate::http;
use crate::types::{SearchProvider, SearchResult};

/// Production endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://export.arxiv.org";

/// Fixed relevance assigned to every arXiv hit.
pub const ARXIV_RELEVANCE: f64 = 0.8;

/// arXiv backend. Keyless.
#[derive(Debug, Clone)]
pub struct ArxivEngine {
    base_url: String,
}

impl ArxivEngine {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }
}

impl Default for ArxivEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchBackend for ArxivEngine {
    fn provider(&self) -> SearchProvider {
        SearchProvider::Arxiv
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
        config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, "arXiv search");

        let search_query = format!("all:{query}");
        let max = max_results.to_string();

        let client = http::build_client(config)?;
        let response = client
            .get(format!("{}/api/query", self.base_url))
            .query(&[
                ("search_query", search_query.as_str()),
                ("max_results", max.as_str()),
                ("sortBy", "relevance"),
            ])
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest("arXiv request failed", e))?;
        let feed = http::read_body("arXiv", response).await?;

        parse_arxiv_atom(&feed, max_results)
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn child_text(entry: ElementRef<'_>, selector: &Selector) -> String {
    entry
        .select(selector)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .unwrap_or_default()
}

/// Parse an arXiv Atom feed.
///
/// The entry `id` (the abstract page URL) is the result URL and the
/// abstract is the snippet.
pub fn parse_arxiv_atom(feed: &str, max_results: usize) -> Result<Vec<SearchResult>, SearchError> {
    let parse = |css: &str| {
        Selector::parse(css).map_err(|e| SearchError::Parse(format!("invalid selector {css}: {e:?}")))
    };
    let entry_sel = parse("entry")?;
    let title_sel = parse("title")?;
    let id_sel = parse("id")?;
    let summary_sel = parse("summary")?;

    let document = Html::parse_document(feed);
    let results = document
        .select(&entry_sel)
        .filter_map(|entry| {
            let url = child_text(entry, &id_sel);
            if url.is_empty() {
                return None;
            }
            Some(
                SearchResult::new(
                    child_text(entry, &title_sel),
                    url,
                    child_text(entry, &summary_sel),
                    SearchProvider::Arxiv,
                )
                .with_score(ARXIV_RELEVANCE),
            )
        })
        .take(max_results)
        .collect();
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query: search_query=all:agents</title>
  <id>http://arxiv.org/api/abc</id>
  <entry>
    <id>http://arxiv.org/abs/2308.00001v1</id>
    <title>Multi-Agent Systems
      for Research</title>
    <summary>  We study   cooperative LLM agents.
    </summary>
    <link href="http://arxiv.org/abs/2308.00001v1" rel="alternate" type="text/html"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2309.12345v2</id>
    <title>Tool Use in Language Models</title>
    <summary>Tools help.</summary>
  </entry>
</feed>"#;

    #[test]
    fn parses_entries_not_feed_header() {
        let results = parse_arxiv_atom(FEED, 10).expect("parse");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Multi-Agent Systems for Research");
        assert_eq!(results[0].url, "http://arxiv.org/abs/2308.00001v1");
        assert_eq!(results[0].snippet, "We study cooperative LLM agents.");
        assert!((results[1].relevance_score - ARXIV_RELEVANCE).abs() < f64::EPSILON);
        assert_eq!(results[1].source, SearchProvider::Arxiv);
    }

    #[test]
    fn respects_max_results() {
        assert_eq!(parse_arxiv_atom(FEED, 1).expect("parse").len(), 1);
    }

    #[test]
    fn feed_without_entries_is_empty() {
        let empty = r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>none</title></feed>"#;
        assert!(parse_arxiv_atom(empty, 5).expect("parse").is_empty());
    }
}
