//! Prompt assembly: dedup, entity pass, numbered context, category template.

use serde::{Deserialize, Serialize};

use research_search::{deduplicate_by, SearchResult};

use super::classifier::{classify, QueryCategory};
use super::templates::template_for;
use crate::entities::{EntityCount, EntityExtractor};

/// The title/snippet/url triple a prompt is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

impl ResultItem {
    pub fn new(
        title: impl Into<String>,
        snippet: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            url: url.into(),
        }
    }
}

impl From<&SearchResult> for ResultItem {
    fn from(result: &SearchResult) -> Self {
        Self::new(&result.title, &result.snippet, &result.url)
    }
}

/// A rendered prompt and what went into it.
#[derive(Debug, Clone)]
pub struct BuiltPrompt {
    pub text: String,
    pub category: QueryCategory,
    /// Results after deduplication, in prompt order.
    pub sources: Vec<ResultItem>,
    pub entities: Vec<EntityCount>,
}

/// Host of `url` without a leading `www.`; the raw string if it does not parse.
pub fn source_domain(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_owned()))
        .unwrap_or_else(|| url.to_owned())
}

/// `[i] title\nsnippet\nSource: url` blocks separated by blank lines.
pub fn render_context(sources: &[ResultItem]) -> String {
    sources
        .iter()
        .enumerate()
        .map(|(i, r)| format!("[{}] {}\n{}\nSource: {}", i + 1, r.title, r.snippet, r.url))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Entity block for the prompt, or an empty string when there are none.
pub fn render_entity_section(entities: &[EntityCount]) -> String {
    if entities.is_empty() {
        return String::new();
    }
    let lines: Vec<String> = entities
        .iter()
        .map(|c| format!("- {} ({})", c.entity.text, c.entity.label))
        .collect();
    format!(
        "\n\nKey Entities Extracted from Search Results:\n{}\n",
        lines.join("\n")
    )
}

/// Builds category-specific summarization prompts.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    extractor: EntityExtractor,
}

impl PromptBuilder {
    pub fn new(extractor: EntityExtractor) -> Self {
        Self { extractor }
    }

    pub fn build(&self, query: &str, results: Vec<ResultItem>) -> BuiltPrompt {
        let received = results.len();
        let sources = deduplicate_by(results, |r| r.title.as_str());
        let entities = self
            .extractor
            .extract(sources.iter().map(|r| r.snippet.as_str()));
        let category = classify(query);
        let template = template_for(category);

        let instructions: String = template
            .instructions()
            .iter()
            .enumerate()
            .map(|(i, line)| format!("{}. {line}\n", i + 1))
            .collect();

        let text = format!(
            "You are {role}. Based on the following web search results for \"{query}\", {task}.\n{entities}\nSEARCH RESULTS:\n{context}\n\nINSTRUCTIONS:\n{instructions}\n{closing}",
            role = template.role,
            task = template.task,
            entities = render_entity_section(&entities),
            context = render_context(&sources),
            closing = template.closing,
        );

        tracing::debug!(
            %category,
            received,
            kept = sources.len(),
            entities = entities.len(),
            "built summarization prompt"
        );
        BuiltPrompt {
            text,
            category,
            sources,
            entities,
        }
    }
}
