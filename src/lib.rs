//! Deep research: multi-agent research reports and search-result
//! summarization over hosted LLMs.
//!
//! # Architecture
//!
//! - **Search**: the `research-search` crate queries web and academic
//!   providers with ordered fallback and title deduplication
//! - **Entities**: [`entities`] mines search results for named entities
//! - **Prompts**: [`prompt`] classifies the query and renders a
//!   category-specific summarization prompt
//! - **LLM**: [`llm`] adapters for OpenAI, Anthropic and Gemini, plus
//!   per-family model fallback chains
//! - **Summarizer**: [`summarizer`] HTTP service (`POST /summarize`)
//! - **Research**: [`research`] agent team, task plan, evidence gathering,
//!   report rendering and persistence

pub mod config;
pub mod credentials;
pub mod entities;
pub mod error;
pub mod llm;
pub mod prompt;
pub mod research;
pub mod summarizer;

pub use config::ResearchConfig;
pub use credentials::{CredentialSource, LlmKeys};
pub use error::{ResearchError, Result};
pub use research::{ResearchPipeline, ResearchReport};
pub use summarizer::{SummarizationService, SummarizerServer};
