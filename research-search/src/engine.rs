//! Trait definition for pluggable search provider backends.
//!
//! Each provider implements [`SearchBackend`] to provide a uniform interface
//! for querying and parsing results. Backends are object safe so the
//! aggregator can hold an ordered strategy list of `Arc<dyn SearchBackend>`.

use async_trait::async_trait;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::{SearchProvider, SearchResult};

/// A pluggable search provider backend.
///
/// Implementors handle their own URL construction, authentication,
/// response parsing and error mapping. A single call never retries;
/// resilience comes from falling back to the next backend.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Returns which provider this backend represents.
    fn provider(&self) -> SearchProvider;

    /// Perform a search and return up to `max_results` parsed results.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the credential is missing, the HTTP request
    /// fails, or the response cannot be parsed.
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError>;
}
