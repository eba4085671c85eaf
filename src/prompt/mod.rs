//! Summarization prompts.
//!
//! A query is classified into one of seven categories, and each category has
//! its own instruction template. Results are deduplicated and mined for
//! entities before rendering.

pub mod builder;
pub mod classifier;
pub mod templates;

pub use builder::{source_domain, BuiltPrompt, PromptBuilder, ResultItem};
pub use classifier::{classify, QueryCategory};
