//! Ordered-fallback search aggregation.
//!
//! [`SearchAggregator`] walks an injected strategy list of backends in
//! order, asking each for the number of results still missing. A backend
//! that fails is recorded in [`SearchOutcome::attempts`] and skipped; the
//! aggregator itself never fails.

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::SearchConfig;
use crate::engine::SearchBackend;
use crate::engines;
use crate::error::SearchError;
use crate::orchestrator::plan::provider_plan;
use crate::orchestrator::url_normalize::normalize_url;
use crate::types::{SearchProvider, SearchResult};

/// A single provider failure captured during aggregation.
#[derive(Debug, Clone)]
pub struct AttemptFailure {
    /// Provider that failed.
    pub provider: SearchProvider,
    /// What went wrong.
    pub error: SearchError,
}

/// Results plus every per-provider failure seen while collecting them.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Collected results, in provider order, at most the requested cap.
    pub results: Vec<SearchResult>,
    /// Failures, in the order the providers were tried.
    pub attempts: Vec<AttemptFailure>,
}

impl SearchOutcome {
    /// Whether any provider failed while producing this outcome.
    pub fn had_failures(&self) -> bool {
        !self.attempts.is_empty()
    }
}

/// Queries backends in priority order until the result cap is met.
pub struct SearchAggregator {
    backends: Vec<Arc<dyn SearchBackend>>,
    config: SearchConfig,
}

impl SearchAggregator {
    /// Create an aggregator over an explicit strategy list.
    pub fn new(backends: Vec<Arc<dyn SearchBackend>>, config: SearchConfig) -> Self {
        Self { backends, config }
    }

    /// Create an aggregator with the built-in backend for each planned provider.
    pub fn from_plan(plan: &[SearchProvider], config: SearchConfig) -> Self {
        let backends = plan.iter().map(|p| engines::backend_for(*p)).collect();
        Self::new(backends, config)
    }

    /// Plan providers from a preference and the configured credentials.
    pub fn for_preference(preference: Option<SearchProvider>, config: SearchConfig) -> Self {
        let plan = provider_plan(preference, &config.credentials);
        Self::from_plan(&plan, config)
    }

    /// Providers in the order they will be tried.
    pub fn providers(&self) -> Vec<SearchProvider> {
        self.backends.iter().map(|b| b.provider()).collect()
    }

    /// The configuration passed to every backend.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Collect up to `cap` results.
    ///
    /// Stops as soon as the cap is met. Results whose normalised URL was
    /// already collected are skipped. Zero backends or a zero cap yield an
    /// empty outcome.
    pub async fn search(&self, query: &str, cap: usize) -> SearchOutcome {
        let mut outcome = SearchOutcome::default();
        let mut seen_urls: HashSet<String> = HashSet::new();

        tracing::trace!(query, cap, "aggregated search");

        for backend in &self.backends {
            let remaining = cap.saturating_sub(outcome.results.len());
            if remaining == 0 {
                break;
            }
            let provider = backend.provider();

            match backend.search(query, remaining, &self.config).await {
                Ok(results) => {
                    let before = outcome.results.len();
                    for result in results {
                        if outcome.results.len() >= cap {
                            break;
                        }
                        if seen_urls.insert(normalize_url(&result.url)) {
                            outcome.results.push(result);
                        }
                    }
                    tracing::info!(
                        %provider,
                        added = outcome.results.len() - before,
                        total = outcome.results.len(),
                        "search provider returned results"
                    );
                }
                Err(error) => {
                    tracing::warn!(%provider, %error, "search provider failed, trying next");
                    outcome.attempts.push(AttemptFailure { provider, error });
                }
            }
        }

        if outcome.results.is_empty() && !self.backends.is_empty() {
            tracing::warn!(
                failures = outcome.attempts.len(),
                "all search providers exhausted without results"
            );
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedBackend {
        provider: SearchProvider,
        urls: Vec<&'static str>,
        calls: AtomicUsize,
        requested: AtomicUsize,
    }

    impl FixedBackend {
        fn new(provider: SearchProvider, urls: Vec<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                provider,
                urls,
                calls: AtomicUsize::new(0),
                requested: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl SearchBackend for FixedBackend {
        fn provider(&self) -> SearchProvider {
            self.provider
        }

        async fn search(
            &self,
            _query: &str,
            max_results: usize,
            _config: &SearchConfig,
        ) -> Result<Vec<SearchResult>, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requested.store(max_results, Ordering::SeqCst);
            // Ignores max_results on purpose to exercise the cap.
            Ok(self
                .urls
                .iter()
                .map(|u| SearchResult::new(format!("title {u}"), *u, "", self.provider))
                .collect())
        }
    }

    struct FailingBackend(SearchProvider);

    #[async_trait]
    impl SearchBackend for FailingBackend {
        fn provider(&self) -> SearchProvider {
            self.0
        }

        async fn search(
            &self,
            _query: &str,
            _max_results: usize,
            _config: &SearchConfig,
        ) -> Result<Vec<SearchResult>, SearchError> {
            Err(SearchError::Http("503".into()))
        }
    }

    #[tokio::test]
    async fn zero_backends_yield_empty_outcome() {
        let aggregator = SearchAggregator::new(Vec::new(), SearchConfig::default());
        let outcome = aggregator.search("anything", 5).await;
        assert!(outcome.results.is_empty());
        assert!(!outcome.had_failures());
    }

    #[tokio::test]
    async fn stops_once_cap_is_met() {
        let first = FixedBackend::new(SearchProvider::Serper, vec!["https://a.com", "https://b.com"]);
        let second = FixedBackend::new(SearchProvider::DuckDuckGo, vec!["https://c.com"]);
        let aggregator = SearchAggregator::new(
            vec![first.clone(), second.clone()],
            SearchConfig::default(),
        );

        let outcome = aggregator.search("q", 2).await;
        assert_eq!(outcome.results.len(), 2);
        assert_eq!(second.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn never_exceeds_cap_even_if_backend_overdelivers() {
        let greedy = FixedBackend::new(
            SearchProvider::Brave,
            vec!["https://a.com", "https://b.com", "https://c.com", "https://d.com"],
        );
        let aggregator = SearchAggregator::new(vec![greedy], SearchConfig::default());
        let outcome = aggregator.search("q", 3).await;
        assert_eq!(outcome.results.len(), 3);
    }

    #[tokio::test]
    async fn failures_recorded_and_next_provider_used() {
        let fallback = FixedBackend::new(SearchProvider::DuckDuckGo, vec!["https://x.com"]);
        let aggregator = SearchAggregator::new(
            vec![
                Arc::new(FailingBackend(SearchProvider::Tavily)),
                Arc::new(FailingBackend(SearchProvider::Brave)),
                fallback,
            ],
            SearchConfig::default(),
        );

        let outcome = aggregator.search("q", 5).await;
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].source, SearchProvider::DuckDuckGo);
        let failed: Vec<_> = outcome.attempts.iter().map(|a| a.provider).collect();
        assert_eq!(failed, vec![SearchProvider::Tavily, SearchProvider::Brave]);
    }

    #[tokio::test]
    async fn later_providers_asked_for_remaining_count() {
        let first = FixedBackend::new(SearchProvider::Google, vec!["https://a.com"]);
        let second = FixedBackend::new(SearchProvider::DuckDuckGo, vec!["https://b.com"]);
        let aggregator =
            SearchAggregator::new(vec![first, second.clone()], SearchConfig::default());

        aggregator.search("q", 4).await;
        assert_eq!(second.requested.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn same_page_from_two_providers_kept_once() {
        let first = FixedBackend::new(SearchProvider::Serper, vec!["https://www.example.com/page/"]);
        let second = FixedBackend::new(
            SearchProvider::DuckDuckGo,
            vec!["http://example.com/page", "https://other.com"],
        );
        let aggregator = SearchAggregator::new(vec![first, second], SearchConfig::default());

        let outcome = aggregator.search("q", 5).await;
        let urls: Vec<_> = outcome.results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, ["https://www.example.com/page/", "https://other.com"]);
    }

    #[tokio::test]
    async fn all_failures_yield_empty_results() {
        let aggregator = SearchAggregator::new(
            vec![Arc::new(FailingBackend(SearchProvider::DuckDuckGo))],
            SearchConfig::default(),
        );
        let outcome = aggregator.search("q", 5).await;
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.attempts.len(), 1);
    }

    #[test]
    fn for_preference_plans_from_credentials() {
        let aggregator = SearchAggregator::for_preference(None, SearchConfig::default());
        assert_eq!(aggregator.providers(), vec![SearchProvider::DuckDuckGo]);
    }
}
