//! Research tools and evidence gathering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use research_search::{
    deduplicate, fetch_page_content, AcademicSearch, AcademicSource, AttemptFailure,
    SearchAggregator, SearchResult,
};

use crate::config::ResearchSection;

/// Capabilities an agent can be given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    WebSearch,
    AcademicSearch,
    ContentExtraction,
    TextAnalysis,
}

impl ToolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WebSearch => "web_search",
            Self::AcademicSearch => "academic_search",
            Self::ContentExtraction => "content_extraction",
            Self::TextAnalysis => "text_analysis",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much evidence one gathering pass collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatherLimits {
    pub web_results: usize,
    pub academic_results: usize,
    /// Top web results whose pages are downloaded.
    pub fetch_pages: usize,
    pub page_chars: usize,
}

impl From<&ResearchSection> for GatherLimits {
    fn from(section: &ResearchSection) -> Self {
        Self {
            web_results: section.max_sources,
            academic_results: section.max_academic_sources,
            fetch_pages: section.fetch_pages,
            page_chars: section.page_chars,
        }
    }
}

/// Search results collected for one query.
#[derive(Debug, Clone, Default)]
pub struct Evidence {
    pub web: Vec<SearchResult>,
    pub academic: Vec<SearchResult>,
    /// Web providers that failed along the way.
    pub failures: Vec<AttemptFailure>,
}

impl Evidence {
    pub fn is_empty(&self) -> bool {
        self.web.is_empty() && self.academic.is_empty()
    }

    pub fn len(&self) -> usize {
        self.web.len() + self.academic.len()
    }

    /// Web results first, then academic ones.
    pub fn sources(&self) -> impl Iterator<Item = &SearchResult> {
        self.web.iter().chain(self.academic.iter())
    }

    /// Numbered listing for a task prompt.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return "No search results were found.".to_owned();
        }
        let mut out = String::new();
        for (i, result) in self.sources().enumerate() {
            out.push_str(&format!(
                "[{}] {} ({})\nURL: {}\n{}\n",
                i + 1,
                result.title,
                result.source,
                result.url,
                result.snippet
            ));
            if let Some(content) = &result.content {
                out.push_str(&format!("Extracted content: {content}\n"));
            }
            out.push('\n');
        }
        out.trim_end().to_owned()
    }
}

/// Search backends shared by every research task.
pub struct ToolBox {
    web: SearchAggregator,
    academic: Arc<AcademicSearch>,
    limits: GatherLimits,
}

impl ToolBox {
    pub fn new(web: SearchAggregator, academic: Arc<AcademicSearch>, limits: GatherLimits) -> Self {
        Self {
            web,
            academic,
            limits,
        }
    }

    pub fn limits(&self) -> GatherLimits {
        self.limits
    }

    /// Web and academic results for `query`, deduplicated by title.
    ///
    /// Provider failures are recorded, never raised. The top web results get
    /// their page text attached when the download succeeds.
    pub async fn gather(&self, query: &str) -> Evidence {
        let outcome = self.web.search(query, self.limits.web_results).await;
        let academic = self
            .academic
            .search(
                query,
                self.limits.academic_results,
                AcademicSource::All,
                self.web.config(),
            )
            .await;

        let (mut web, academic): (Vec<_>, Vec<_>) = deduplicate(
            outcome.results.into_iter().chain(academic).collect(),
        )
        .into_iter()
        .partition(|r| r.source.is_web());

        self.attach_content(&mut web).await;

        tracing::info!(
            web = web.len(),
            academic = academic.len(),
            failures = outcome.attempts.len(),
            "evidence gathered"
        );
        Evidence {
            web,
            academic,
            failures: outcome.attempts,
        }
    }

    async fn attach_content(&self, results: &mut [SearchResult]) {
        for result in results.iter_mut().take(self.limits.fetch_pages) {
            match fetch_page_content(&result.url, self.limits.page_chars, self.web.config()).await
            {
                Ok(page) => result.content = Some(page.text),
                Err(error) => {
                    tracing::debug!(url = result.url.as_str(), %error, "page content unavailable");
                }
            }
        }
    }
}
