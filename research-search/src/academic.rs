//! Academic search across arXiv and Wikipedia.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;
use crate::engine::SearchBackend;
use crate::engines::{ArxivEngine, WikipediaEngine};
use crate::types::SearchResult;

/// Which academic sources to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcademicSource {
    Arxiv,
    Wikipedia,
    #[default]
    All,
}

impl fmt::Display for AcademicSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Arxiv => "arxiv",
            Self::Wikipedia => "wikipedia",
            Self::All => "all",
        })
    }
}

impl FromStr for AcademicSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arxiv" => Ok(Self::Arxiv),
            "wikipedia" => Ok(Self::Wikipedia),
            "all" => Ok(Self::All),
            other => Err(format!("unknown academic source: {other}")),
        }
    }
}

/// Academic search over injectable arXiv and Wikipedia backends.
pub struct AcademicSearch {
    arxiv: Arc<dyn SearchBackend>,
    wikipedia: Arc<dyn SearchBackend>,
}

impl AcademicSearch {
    pub fn new(arxiv: Arc<dyn SearchBackend>, wikipedia: Arc<dyn SearchBackend>) -> Self {
        Self { arxiv, wikipedia }
    }

    /// Query the selected sources and return at most `max_results` hits.
    ///
    /// With [`AcademicSource::All`], arXiv is asked for `max(1, max/2)`
    /// results and Wikipedia for `max(1, max/3)`. A failing source is logged
    /// and skipped.
    pub async fn search(
        &self,
        query: &str,
        max_results: usize,
        source: AcademicSource,
        config: &SearchConfig,
    ) -> Vec<SearchResult> {
        if max_results == 0 {
            return Vec::new();
        }

        let (arxiv_slots, wiki_slots) = match source {
            AcademicSource::Arxiv => (Some(max_results), None),
            AcademicSource::Wikipedia => (None, Some(max_results)),
            AcademicSource::All => (Some((max_results / 2).max(1)), Some((max_results / 3).max(1))),
        };

        let mut results = Vec::new();
        for (backend, slots) in [(&self.arxiv, arxiv_slots), (&self.wikipedia, wiki_slots)] {
            let Some(slots) = slots else { continue };
            match backend.search(query, slots, config).await {
                Ok(found) => results.extend(found.into_iter().take(slots)),
                Err(error) => {
                    tracing::warn!(provider = %backend.provider(), %error, "academic source failed");
                }
            }
        }

        results.truncate(max_results);
        results
    }
}

impl Default for AcademicSearch {
    fn default() -> Self {
        Self::new(Arc::new(ArxivEngine::new()), Arc::new(WikipediaEngine::new()))
    }
}

/// Academic search with the production arXiv and Wikipedia endpoints.
pub async fn academic_search(
    query: &str,
    max_results: usize,
    source: AcademicSource,
    config: &SearchConfig,
) -> Vec<SearchResult> {
    AcademicSearch::default()
        .search(query, max_results, source, config)
        .await
}
