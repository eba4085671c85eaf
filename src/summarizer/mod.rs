//! Stateless summarization of search results with hosted LLMs.

pub mod server;
pub mod service;

pub use server::{router, HealthResponse, SummarizerServer};
pub use service::{
    unavailable_summary, SummarizationService, SummarizeRequest, SummarizeResponse,
    SummarizerProviders, DEFAULT_MODEL,
};
