//! Provider adapters.
//!
//! Each adapter implements [`SearchBackend`](crate::engine::SearchBackend),
//! accepts an overridable base URL and exposes a pure `parse_*` function
//! for its response format.

pub mod arxiv;
pub mod brave;
pub mod duckduckgo;
pub mod google;
pub mod serper;
pub mod tavily;
pub mod wikipedia;

use std::sync::Arc;

use crate::engine::SearchBackend;
use crate::types::SearchProvider;

pub use arxiv::ArxivEngine;
pub use brave::BraveEngine;
pub use duckduckgo::DuckDuckGoEngine;
pub use google::GoogleEngine;
pub use serper::SerperEngine;
pub use tavily::TavilyEngine;
pub use wikipedia::WikipediaEngine;

/// Built-in backend for `provider`, pointed at the production endpoint.
pub fn backend_for(provider: SearchProvider) -> Arc<dyn SearchBackend> {
    match provider {
        SearchProvider::Google => Arc::new(GoogleEngine::new()),
        SearchProvider::Serper => Arc::new(SerperEngine::new()),
        SearchProvider::Tavily => Arc::new(TavilyEngine::new()),
        SearchProvider::Brave => Arc::new(BraveEngine::new()),
        SearchProvider::DuckDuckGo => Arc::new(DuckDuckGoEngine::new()),
        SearchProvider::Arxiv => Arc::new(ArxivEngine::new()),
        SearchProvider::Wikipedia => Arc::new(WikipediaEngine::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_for_matches_provider() {
        for provider in SearchProvider::all() {
            assert_eq!(backend_for(*provider).provider(), *provider);
        }
    }

    #[test]
    fn engines_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GoogleEngine>();
        assert_send_sync::<DuckDuckGoEngine>();
        assert_send_sync::<WikipediaEngine>();
    }
}
