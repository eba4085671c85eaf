//! Research report model, rendering and persistence.

use chrono::{DateTime, Local};
use pulldown_cmark::{Options, Parser};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use research_search::SearchResult;

use super::analysis::TextAnalysis;
use super::tasks::{Audience, ResearchDepth};
use crate::error::{ResearchError, Result};
use crate::llm::AiProvider;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Html,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Html => "html",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Markdown => "markdown",
            Self::Html => "html",
            Self::Json => "json",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// Outcome of a completed research run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchReport {
    pub topic: String,
    pub research_depth: ResearchDepth,
    pub target_audience: Audience,
    pub ai_provider: AiProvider,
    pub ai_model: String,
    pub timestamp: DateTime<Local>,
    pub execution_time: f64,
    /// Full report written by the reporter agent.
    pub summary: String,
    /// Final quality review.
    pub review: String,
    pub key_findings: Vec<String>,
    pub recommendations: Vec<String>,
    pub sources: Vec<SearchResult>,
    pub analysis: TextAnalysis,
}

/// Items of the bullet list under the first heading containing `heading`.
///
/// Headings are matched case-insensitively and may be markdown (`##`) or
/// bold (`**Key Findings**`) lines. Numbered items count as bullets.
pub fn section_bullets(markdown: &str, heading: &str) -> Vec<String> {
    let wanted = heading.to_lowercase();
    let mut in_section = false;
    let mut items = Vec::new();

    for line in markdown.lines() {
        let trimmed = line.trim();
        if is_heading(trimmed) {
            if in_section {
                break;
            }
            in_section = trimmed.to_lowercase().contains(&wanted);
            continue;
        }
        if !in_section {
            continue;
        }
        if let Some(item) = bullet_text(trimmed) {
            items.push(item.to_owned());
        }
    }
    items
}

fn is_heading(line: &str) -> bool {
    line.starts_with('#') || (line.starts_with("**") && line.trim_end_matches(':').ends_with("**"))
}

fn bullet_text(line: &str) -> Option<&str> {
    let rest = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix("• "))
        .or_else(|| {
            let digits = line.chars().take_while(char::is_ascii_digit).count();
            if digits == 0 {
                return None;
            }
            line[digits..]
                .strip_prefix(". ")
                .or_else(|| line[digits..].strip_prefix(") "))
        })?;
    let rest = rest.trim();
    (!rest.is_empty()).then_some(rest)
}

fn source_kind(result: &SearchResult) -> &'static str {
    if result.source.is_web() {
        "web"
    } else {
        "academic"
    }
}

fn details(report: &ResearchReport) -> [(&'static str, String); 7] {
    [
        ("Topic", report.topic.clone()),
        ("Research Depth", report.research_depth.to_string()),
        ("Target Audience", report.target_audience.to_string()),
        ("AI Provider", report.ai_provider.as_str().to_uppercase()),
        ("AI Model", report.ai_model.clone()),
        ("Timestamp", report.timestamp.to_rfc3339()),
        ("Execution Time", format!("{:.2} seconds", report.execution_time)),
    ]
}

pub fn render_markdown(report: &ResearchReport) -> String {
    let mut md = format!(
        "# Deep Research Report: {}\n\n## Executive Summary\n\n{}\n\n## Research Details\n\n",
        report.topic,
        report.summary.trim()
    );
    for (label, value) in details(report) {
        md.push_str(&format!("- **{label}**: {value}\n"));
    }

    md.push_str("\n## Key Findings\n\n");
    for finding in &report.key_findings {
        md.push_str(&format!("- {finding}\n"));
    }
    md.push_str("\n## Recommendations\n\n");
    for rec in &report.recommendations {
        md.push_str(&format!("- {rec}\n"));
    }
    md.push_str("\n## Sources\n\n");
    for source in &report.sources {
        md.push_str(&format!(
            "- [{}]({}) ({})\n",
            source.title,
            source.url,
            source_kind(source)
        ));
    }
    md
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

const HTML_STYLE: &str = "body { font-family: Arial, sans-serif; margin: 40px; }
        h1 { color: #2c3e50; }
        h2 { color: #34495e; margin-top: 30px; }
        ul { line-height: 1.6; }";

/// Standalone HTML page with the markdown report as its body.
pub fn render_html(report: &ResearchReport) -> String {
    let markdown = render_markdown(report);
    let mut body = String::new();
    pulldown_cmark::html::push_html(
        &mut body,
        Parser::new_ext(&markdown, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH),
    );
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n    <meta charset=\"utf-8\">\n    \
         <title>Deep Research Report: {}</title>\n    <style>\n        {HTML_STYLE}\n    </style>\n\
         </head>\n<body>\n{body}</body>\n</html>\n",
        escape_html(&report.topic)
    )
}

/// Render `report` in `format`.
///
/// # Errors
///
/// Returns [`ResearchError::Report`] if JSON serialization fails.
pub fn render(report: &ResearchReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Markdown => Ok(render_markdown(report)),
        OutputFormat::Html => Ok(render_html(report)),
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| ResearchError::Report(format!("JSON serialization failed: {e}"))),
    }
}

/// Longest topic slug, in characters, used in a report filename.
pub const MAX_TOPIC_SLUG_CHARS: usize = 80;

/// Filesystem-safe form of a topic: letters, digits, `-` and `_`, with
/// spaces turned into underscores.
///
/// Cut to [`MAX_TOPIC_SLUG_CHARS`] characters. A topic with nothing usable
/// becomes `research`.
pub fn safe_topic(topic: &str) -> String {
    let kept: String = topic
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .take(MAX_TOPIC_SLUG_CHARS)
        .collect();
    let slug = kept.trim().replace(' ', "_");
    if slug.is_empty() {
        "research".to_owned()
    } else {
        slug
    }
}

/// Report path inside `dir`, stamped with the report's own timestamp.
pub fn report_path(report: &ResearchReport, format: OutputFormat, dir: &Path) -> PathBuf {
    dir.join(format!(
        "{}_{}.{}",
        safe_topic(&report.topic),
        report.timestamp.format("%Y%m%d_%H%M%S"),
        format.extension()
    ))
}

/// Render `report` and write it under `dir`, creating the directory.
///
/// # Errors
///
/// Returns an error if rendering or writing fails.
pub fn save_report(report: &ResearchReport, format: OutputFormat, dir: &Path) -> Result<PathBuf> {
    let content = render(report, format)?;
    std::fs::create_dir_all(dir)?;
    let path = report_path(report, format, dir);
    std::fs::write(&path, content)?;
    tracing::info!(path = %path.display(), %format, "research report saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::research::analysis::analyze;
    use chrono::TimeZone;
    use research_search::SearchProvider;

    fn report() -> ResearchReport {
        let summary = "## Key Findings\n- Rust is memory safe\n- Adoption is growing\n\n\
                       ## Recommendations\n1. Start with CLI tools\n";
        ResearchReport {
            topic: "Rust & <Safety>".into(),
            research_depth: ResearchDepth::Basic,
            target_audience: Audience::Technical,
            ai_provider: AiProvider::Anthropic,
            ai_model: "claude-3-sonnet-20240229".into(),
            timestamp: Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap(),
            execution_time: 12.3456,
            summary: summary.into(),
            review: "Rating: 9/10. Approved.".into(),
            key_findings: section_bullets(summary, "key findings"),
            recommendations: section_bullets(summary, "recommendations"),
            sources: vec![
                SearchResult::new("Rust Book", "https://doc.rust-lang.org/book", "s", SearchProvider::Google),
                SearchResult::new("Ownership paper", "https://arxiv.org/abs/1", "s", SearchProvider::Arxiv),
            ],
            analysis: analyze(summary),
        }
    }

    #[test]
    fn bullets_stop_at_next_heading() {
        let text = "Intro\n**Key Findings:**\n- one\n* two\n3) three\n## Next\n- other";
        assert_eq!(section_bullets(text, "Key Findings"), ["one", "two", "three"]);
        assert!(section_bullets(text, "Risks").is_empty());
    }

    #[test]
    fn markdown_layout() {
        let md = render_markdown(&report());
        assert!(md.starts_with("# Deep Research Report: Rust & <Safety>\n\n## Executive Summary"));
        assert!(md.contains("- **AI Provider**: ANTHROPIC\n"));
        assert!(md.contains("- **Research Depth**: basic\n"));
        assert!(md.contains("- **Execution Time**: 12.35 seconds\n"));
        assert!(md.contains("## Key Findings\n\n- Rust is memory safe\n- Adoption is growing\n"));
        assert!(md.contains("## Recommendations\n\n- Start with CLI tools\n"));
        assert!(md.contains("- [Rust Book](https://doc.rust-lang.org/book) (web)\n"));
        assert!(md.contains("- [Ownership paper](https://arxiv.org/abs/1) (academic)\n"));
    }

    #[test]
    fn html_escapes_title_and_renders_body() {
        let html = render_html(&report());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Deep Research Report: Rust &amp; &lt;Safety&gt;</title>"));
        assert!(html.contains("<h2>Key Findings</h2>"));
        assert!(html.contains("<li>Rust is memory safe</li>"));
    }

    #[test]
    fn safe_topic_strips_punctuation() {
        assert_eq!(safe_topic("AI: the future?  "), "AI_the_future");
        assert_eq!(safe_topic("rust-lang & co_op"), "rust-lang__co_op");
    }

    #[test]
    fn safe_topic_is_capped_and_never_empty() {
        let long = "Über ".repeat(60);
        let slug = safe_topic(&long);
        assert_eq!(slug.chars().count(), MAX_TOPIC_SLUG_CHARS - 1);
        assert!(slug.starts_with("Über_Über"));
        assert!(!slug.ends_with('_'));
        assert_eq!(safe_topic("?!"), "research");
        assert_eq!(safe_topic("   "), "research");
    }

    #[test]
    fn long_topic_still_saves() {
        let mut report = report();
        report.topic = "How will solid-state batteries, sodium-ion chemistries and \
                        grid-scale storage change the economics of renewable energy \
                        across Europe, North America and Asia over the next decade, \
                        and which companies, policies and supply chains matter most \
                        for investors, utilities and national governments today?"
            .into();
        assert!(report.topic.len() > 255);

        let dir = tempfile::tempdir().unwrap();
        let path = save_report(&report, OutputFormat::Markdown, dir.path()).unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.len() < 255, "{name}");
        assert!(name.starts_with("How_will_solid-state_batteries"));
        assert!(name.ends_with("_20240305_140709.md"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), render_markdown(&report));
    }

    #[test]
    fn save_writes_timestamped_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("reports");
        let report = report();

        let path = save_report(&report, OutputFormat::Markdown, &out).unwrap();
        assert_eq!(path, out.join("Rust__Safety_20240305_140709.md"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, render_markdown(&report));

        let json_path = save_report(&report, OutputFormat::Json, &out).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
        assert_eq!(value["ai_provider"], "anthropic");
        assert_eq!(value["research_depth"], "basic");
        assert_eq!(value["key_findings"][1], "Adoption is growing");
    }

    #[test]
    fn format_parsing() {
        assert_eq!("MD".parse::<OutputFormat>(), Ok(OutputFormat::Markdown));
        assert_eq!(OutputFormat::Html.extension(), "html");
        assert!("pdf".parse::<OutputFormat>().is_err());
    }
}
