//! Error types for the research pipeline and summarization service.

use crate::llm::LlmError;
use research_search::SearchError;

/// Top-level error type for the deep research system.
#[derive(Debug, thiserror::Error)]
pub enum ResearchError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// A required credential is missing or unreadable.
    #[error("credential error: {0}")]
    Credentials(String),

    /// Search layer error (invalid search configuration).
    #[error("search error: {0}")]
    Search(#[from] SearchError),

    /// Language model call failed.
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Entity recognition failed.
    #[error("entity extraction error: {0}")]
    Entities(String),

    /// Report rendering or persistence error.
    #[error("report error: {0}")]
    Report(String),

    /// HTTP server error.
    #[error("server error: {0}")]
    Server(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ResearchError>;
