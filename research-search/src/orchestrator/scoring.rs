//! Position-decay scoring for providers that report no native relevance.
//!
//! Formula: `score = provider_weight * 1.0 / (1.0 + position * 0.1)`.
//! Tavily reports its own score, arXiv and Wikipedia use fixed scores;
//! everything else is ranked by where the provider placed the result.

use crate::types::{SearchProvider, SearchResult};

/// Score for the result at 0-based `position` in `provider`'s list.
pub fn position_score(provider: SearchProvider, position: usize) -> f64 {
    provider.weight() / (1.0 + position as f64 * 0.1)
}

/// Assign position-decay scores to a single provider's result list.
pub fn score_by_position(mut results: Vec<SearchResult>) -> Vec<SearchResult> {
    for (position, result) in results.iter_mut().enumerate() {
        result.relevance_score = position_score(result.source, position);
    }
    results
}
