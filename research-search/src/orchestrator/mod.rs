//! Search orchestration: provider planning, ordered fallback, URL-level
//! duplicate skipping, title deduplication and scoring.

pub mod aggregate;
pub mod dedup;
pub mod plan;
pub mod scoring;
pub mod url_normalize;

pub use aggregate::{AttemptFailure, SearchAggregator, SearchOutcome};
pub use dedup::{deduplicate, deduplicate_by, title_similarity, DEDUP_THRESHOLD};
pub use plan::{parse_preference, provider_plan};
