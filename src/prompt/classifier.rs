//! Keyword scoring of query intent.
//!
//! Every category is scored; single-word keywords match whole tokens (weight
//! 1) and multi-word phrases match consecutive tokens (weight 2). The highest
//! score wins. Ties fall back to [`QueryCategory::PRIORITY`], and a query that
//! scores zero everywhere is [`QueryCategory::General`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Query intent buckets, each with its own prompt template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryCategory {
    List,
    HowTo,
    Definition,
    Comparison,
    News,
    Technical,
    General,
}

impl QueryCategory {
    /// Scored categories in tie-break order.
    pub const PRIORITY: [QueryCategory; 6] = [
        Self::List,
        Self::HowTo,
        Self::Definition,
        Self::Comparison,
        Self::News,
        Self::Technical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::HowTo => "how_to",
            Self::Definition => "definition",
            Self::Comparison => "comparison",
            Self::News => "news",
            Self::Technical => "technical",
            Self::General => "general",
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::List => &[
                "top", "list", "best", "worst", "ranking", "ranked", "10", "5", "3", "20",
            ],
            Self::HowTo => &["how to", "how do", "steps", "guide", "tutorial", "process"],
            Self::Definition => &["what is", "define", "definition", "meaning", "explain"],
            Self::Comparison => &["vs", "versus", "compare", "difference", "better", "which"],
            Self::News => &[
                "latest",
                "recent",
                "news",
                "update",
                "2024",
                "2025",
                "announcement",
            ],
            Self::Technical => &[
                "api",
                "code",
                "programming",
                "technical",
                "implementation",
                "architecture",
            ],
            Self::General => &[],
        }
    }
}

impl fmt::Display for QueryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn tokenize(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

fn keyword_weight(tokens: &[String], keyword: &str) -> usize {
    let parts: Vec<&str> = keyword.split(' ').collect();
    let present = tokens
        .windows(parts.len())
        .any(|window| window.iter().zip(&parts).all(|(t, p)| t == p));
    match (present, parts.len()) {
        (false, _) => 0,
        (true, 1) => 1,
        (true, _) => 2,
    }
}

fn score_tokens(tokens: &[String], category: QueryCategory) -> usize {
    category
        .keywords()
        .iter()
        .map(|k| keyword_weight(tokens, k))
        .sum()
}

/// Score of `query` against one category's keywords.
pub fn score(query: &str, category: QueryCategory) -> usize {
    score_tokens(&tokenize(query), category)
}

/// Classify `query`. Total and deterministic.
pub fn classify(query: &str) -> QueryCategory {
    let tokens = tokenize(query);
    let mut best = (QueryCategory::General, 0);
    for category in QueryCategory::PRIORITY {
        let score = score_tokens(&tokens, category);
        // Strictly greater keeps the earlier category on ties.
        if score > best.1 {
            best = (category, score);
        }
    }
    tracing::trace!(category = %best.0, score = best.1, "classified query");
    best.0
}
