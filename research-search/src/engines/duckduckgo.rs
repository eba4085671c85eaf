//! DuckDuckGo HTML endpoint, the keyless last-resort web provider.
//!
//! Posts a form to the JavaScript-free endpoint and scrapes results with
//! CSS selectors. Result links arrive wrapped in a `/l/?uddg=` redirect
//! that is unwrapped here; sponsored results are skipped.

use async_trait::async_trait;
use scraper::{Html, Selector};
use url::Url;

use crate::config::SearchConfig;
use crate::engine::SearchBackend;
use crate::error::SearchError;
use crate::http;
use crate::orchestrator::scoring::score_by_position;
use crate::types::{SearchProvider, SearchResult};

/// Production endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

/// DuckDuckGo HTML backend. Needs no credential.
#[derive(Debug, Clone)]
pub struct DuckDuckGoEngine {
    endpoint: String,
}

impl DuckDuckGoEngine {
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
        }
    }

    /// Post to `{base_url}/html/` instead of the production endpoint.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            endpoint: format!("{}/html/", base_url.into().trim_end_matches('/')),
        }
    }
}

impl Default for DuckDuckGoEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchBackend for DuckDuckGoEngine {
    fn provider(&self) -> SearchProvider {
        SearchProvider::DuckDuckGo
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
        config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, "DuckDuckGo search");

        let mut form = vec![("q", query)];
        if config.safe_search {
            form.push(("kp", "1"));
        }

        let client = http::build_client(config)?;
        let response = client
            .post(&self.endpoint)
            .form(&form)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest("DuckDuckGo request failed", e))?;
        let html = http::read_body("DuckDuckGo", response).await?;

        tracing::trace!(bytes = html.len(), "DuckDuckGo response received");
        parse_duckduckgo_html(&html, max_results)
    }
}

/// Resolve a result href to the target URL.
///
/// Protocol-relative hrefs get `https:`; `duckduckgo.com/l/` redirect
/// wrappers are replaced by their decoded `uddg` parameter.
fn unwrap_redirect(href: &str) -> Option<String> {
    let absolute = match href.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => href.to_owned(),
    };
    let parsed = Url::parse(&absolute).ok()?;

    let is_redirect = parsed.host_str() == Some("duckduckgo.com") && parsed.path().starts_with("/l/");
    if !is_redirect {
        return Some(absolute);
    }
    parsed
        .query_pairs()
        .find(|(key, _)| key == "uddg")
        .map(|(_, target)| target.into_owned())
}

fn selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css).map_err(|e| SearchError::Parse(format!("invalid selector {css}: {e:?}")))
}

/// Scrape results out of a DuckDuckGo HTML page.
pub fn parse_duckduckgo_html(
    html: &str,
    max_results: usize,
) -> Result<Vec<SearchResult>, SearchError> {
    let document = Html::parse_document(html);
    let result_sel = selector(
        ".result.results_links.results_links_deep:not(.result--ad), .web-result:not(.result--ad)",
    )?;
    let link_sel = selector(".result__a")?;
    let snippet_sel = selector(".result__snippet")?;

    let mut results = Vec::new();
    for block in document.select(&result_sel) {
        if results.len() >= max_results {
            break;
        }
        let Some(link) = block.select(&link_sel).next() else {
            continue;
        };
        let title = link.text().collect::<String>().trim().to_owned();
        let Some(url) = link.value().attr("href").and_then(unwrap_redirect) else {
            continue;
        };
        if title.is_empty() {
            continue;
        }
        let snippet = block
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_owned())
            .unwrap_or_default();

        results.push(SearchResult::new(title, url, snippet, SearchProvider::DuckDuckGo));
    }

    tracing::debug!(count = results.len(), "DuckDuckGo results parsed");
    Ok(score_by_position(results))
}
