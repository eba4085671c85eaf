//! Core types for search results and provider identification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single search result produced by a provider adapter.
///
/// Immutable once created; consumed by deduplication, entity extraction
/// and prompt rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The title of the result page.
    pub title: String,
    /// The URL of the result.
    pub url: String,
    /// A text snippet summarising the page content.
    pub snippet: String,
    /// Which provider returned this result.
    pub source: SearchProvider,
    /// Relevance score (higher is better).
    pub relevance_score: f64,
    /// Extracted page content, when fetched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl SearchResult {
    /// Build a result with no relevance score and no extracted content.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
        source: SearchProvider,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
            source,
            relevance_score: 0.0,
            content: None,
        }
    }

    /// Set the relevance score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.relevance_score = score;
        self
    }
}

/// External search providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchProvider {
    /// Google Custom Search JSON API (key + engine id).
    Google,
    /// Serper.dev Google results API.
    Serper,
    /// Tavily search API.
    Tavily,
    /// Brave Search API.
    Brave,
    /// DuckDuckGo HTML endpoint. Keyless; the final web fallback.
    DuckDuckGo,
    /// arXiv paper search.
    Arxiv,
    /// Wikipedia article search.
    Wikipedia,
}

impl SearchProvider {
    /// Returns the human-readable name of this provider.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Serper => "Serper",
            Self::Tavily => "Tavily",
            Self::Brave => "Brave",
            Self::DuckDuckGo => "DuckDuckGo",
            Self::Arxiv => "arXiv",
            Self::Wikipedia => "Wikipedia",
        }
    }

    /// Whether this provider needs an API credential.
    pub fn requires_credentials(&self) -> bool {
        matches!(self, Self::Google | Self::Serper | Self::Tavily | Self::Brave)
    }

    /// Whether this is a general web search provider (as opposed to academic).
    pub fn is_web(&self) -> bool {
        !matches!(self, Self::Arxiv | Self::Wikipedia)
    }

    /// Ranking weight used for providers that do not report their own score.
    pub fn weight(&self) -> f64 {
        match self {
            Self::Google => 1.2,
            Self::Serper => 1.1,
            Self::Tavily | Self::Brave | Self::DuckDuckGo => 1.0,
            Self::Arxiv => 0.8,
            Self::Wikipedia => 0.6,
        }
    }

    /// Returns all provider variants.
    pub fn all() -> &'static [SearchProvider] {
        &[
            Self::Google,
            Self::Serper,
            Self::Tavily,
            Self::Brave,
            Self::DuckDuckGo,
            Self::Arxiv,
            Self::Wikipedia,
        ]
    }
}

impl fmt::Display for SearchProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SearchProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "serper" => Ok(Self::Serper),
            "tavily" => Ok(Self::Tavily),
            "brave" => Ok(Self::Brave),
            "duckduckgo" | "ddg" => Ok(Self::DuckDuckGo),
            "arxiv" => Ok(Self::Arxiv),
            "wikipedia" => Ok(Self::Wikipedia),
            other => Err(format!("unknown search provider: {other}")),
        }
    }
}

/// Extracted readable content from a fetched web page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageContent {
    /// The URL that was fetched.
    pub url: String,
    /// The page title extracted from HTML.
    pub title: String,
    /// Cleaned, readable text content with HTML boilerplate stripped.
    pub text: String,
    /// Number of words in the extracted text.
    pub word_count: usize,
}
