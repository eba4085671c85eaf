//! Readable-text extraction from web pages.
//!
//! Walks the parsed DOM, skipping non-content subtrees (scripts, styles,
//! navigation and similar), prefers `article`/`main` regions over the whole
//! body, collapses whitespace and truncates to a character budget.

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::http;
use crate::types::PageContent;

/// Default character budget for extracted text.
pub const DEFAULT_MAX_CHARS: usize = 2000;

/// Elements whose whole subtree is dropped.
const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "nav", "footer", "header", "aside", "noscript", "svg", "iframe", "form",
];

/// Content regions in preference order.
const CONTENT_REGIONS: &[&str] = &["article", "main", "[role=\"main\"]", "body"];

/// Download `url` and extract its readable text.
///
/// # Errors
///
/// Returns [`SearchError::Http`]/[`SearchError::Timeout`] on transport
/// failures or non-success status, and [`SearchError::Parse`] when the page
/// has no extractable text.
pub async fn fetch_page_content(
    url: &str,
    max_chars: usize,
    config: &SearchConfig,
) -> Result<PageContent> {
    tracing::trace!(url, "fetching page content");

    let client = http::build_client(config)?;
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| SearchError::from_reqwest("page fetch failed", e))?;
    let html = http::read_body("page fetch", response).await?;

    let page = extract_content(&html, url, max_chars)?;
    tracing::debug!(url, words = page.word_count, "page content extracted");
    Ok(page)
}

/// Extract readable text from raw HTML.
///
/// Text longer than `max_chars` characters is cut and suffixed with `...`.
///
/// # Errors
///
/// Returns [`SearchError::Parse`] if no text remains after stripping.
pub fn extract_content(html: &str, url: &str, max_chars: usize) -> Result<PageContent> {
    let document = Html::parse_document(html);

    let title = page_title(&document);
    let text = main_text(&document);
    if text.is_empty() {
        return Err(SearchError::Parse("no extractable content found".into()));
    }

    let text = truncate_chars(text, max_chars);
    let word_count = text.split_whitespace().count();

    Ok(PageContent {
        url: url.to_owned(),
        title,
        text,
        word_count,
    })
}

fn page_title(document: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_owned())
        .unwrap_or_default()
}

fn main_text(document: &Html) -> String {
    for region in CONTENT_REGIONS {
        let Ok(selector) = Selector::parse(region) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            let mut raw = String::new();
            collect_text(element, &mut raw);
            let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
            if !text.is_empty() {
                return text;
            }
        }
    }
    String::new()
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            Node::Element(el) if SKIPPED_TAGS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, out);
                }
            }
            _ => {}
        }
    }
}

fn truncate_chars(text: String, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text;
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}
