//! # research-search
//!
//! Multi-provider web and academic search for the research pipeline.
//!
//! ## Design
//!
//! - Keyed APIs (Google Custom Search, Serper, Tavily, Brave) are tried in
//!   priority order, filtered by which credentials are configured
//! - DuckDuckGo's HTML endpoint is always the final, keyless fallback
//! - Providers are queried one at a time; aggregation stops once the result
//!   cap is met and records every provider failure instead of raising
//! - Near-duplicate titles are dropped with a character-level similarity
//!   ratio above 0.85
//! - arXiv and Wikipedia serve academic queries
//!
//! ## Security
//!
//! - API keys never appear in logs, errors or `Debug` output
//! - No network listeners; this is a library
//! - Search queries are logged only at trace level

pub mod academic;
pub mod config;
pub mod content;
pub mod engine;
pub mod engines;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod types;

pub use academic::{academic_search, AcademicSearch, AcademicSource};
pub use config::{ProviderCredentials, SearchConfig};
pub use content::{extract_content, fetch_page_content};
pub use engine::SearchBackend;
pub use error::{Result, SearchError};
pub use orchestrator::{
    deduplicate, deduplicate_by, provider_plan, title_similarity, AttemptFailure,
    SearchAggregator, SearchOutcome,
};
pub use types::{PageContent, SearchProvider, SearchResult};

/// Search the web with ordered provider fallback.
///
/// Plans providers from `preference` and the configured credentials,
/// collects up to `config.max_results` results, and returns them together
/// with the per-provider failures. Total provider failure is an empty
/// outcome, not an error.
///
/// # Errors
///
/// Returns [`SearchError::Config`] only if `config` is invalid.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> research_search::Result<()> {
/// let config = research_search::SearchConfig::default();
/// let outcome = research_search::search("rust async runtimes", None, &config).await?;
/// for result in &outcome.results {
///     println!("{}: {}", result.title, result.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(
    query: &str,
    preference: Option<SearchProvider>,
    config: &SearchConfig,
) -> Result<SearchOutcome> {
    config.validate()?;
    let aggregator = SearchAggregator::for_preference(preference, config.clone());
    Ok(aggregator.search(query, config.max_results).await)
}
