//! Rule-based text analysis of research output.
//!
//! Sentiment is a word-list ratio, keywords are stop-word-filtered frequency
//! counts, and the summary is the first three sentences.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "amazing", "wonderful", "positive", "beneficial", "successful",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "negative", "harmful", "failed", "problem", "issue",
];

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few",
    "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "itself", "just", "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of",
    "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own",
    "same", "she", "should", "so", "some", "such", "than", "that", "the", "their", "theirs",
    "them", "themselves", "then", "there", "these", "they", "this", "those", "through", "to",
    "too", "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves",
];

/// Number of sentences kept by the extractive summary.
pub const SUMMARY_SENTENCES: usize = 3;

/// Number of keywords reported.
pub const TOP_KEYWORDS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: SentimentLabel,
    /// `(positive - negative) / words`.
    pub score: f64,
    pub positive_words: usize,
    pub negative_words: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub word: String,
    pub frequency: usize,
    /// Share of all kept words, in percent.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStatistics {
    pub word_count: usize,
    pub sentence_count: usize,
    pub average_sentence_length: f64,
    pub unique_words: usize,
    /// Unique words over total words.
    pub lexical_diversity: f64,
}

/// Full analysis of one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnalysis {
    pub sentiment: Sentiment,
    pub keywords: Vec<Keyword>,
    pub summary: String,
    pub statistics: TextStatistics,
}

/// Lowercased alphanumeric words.
fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|w| w.trim_matches('\'').to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Sentences, split after `.`, `!` or `?` followed by whitespace or end of text.
pub fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars.peek().is_none_or(|(_, next)| next.is_whitespace());
            if at_boundary {
                let end = i + c.len_utf8();
                let sentence = text[start..end].trim();
                if !sentence.is_empty() {
                    out.push(sentence);
                }
                start = end;
            }
        }
    }
    let rest = text[start..].trim();
    if !rest.is_empty() {
        out.push(rest);
    }
    out
}

pub fn sentiment(text: &str) -> Sentiment {
    let words = words(text);
    let positive_words = words
        .iter()
        .filter(|w| POSITIVE_WORDS.contains(&w.as_str()))
        .count();
    let negative_words = words
        .iter()
        .filter(|w| NEGATIVE_WORDS.contains(&w.as_str()))
        .count();

    let score = if words.is_empty() {
        0.0
    } else {
        (positive_words as f64 - negative_words as f64) / words.len() as f64
    };
    let label = if score > 0.1 {
        SentimentLabel::Positive
    } else if score < -0.1 {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    };
    Sentiment {
        label,
        score,
        positive_words,
        negative_words,
    }
}

/// Most frequent non-stop-words longer than two characters.
pub fn keywords(text: &str, top_n: usize) -> Vec<Keyword> {
    let kept: Vec<String> = words(text)
        .into_iter()
        .filter(|w| w.len() > 2 && w.chars().all(char::is_alphanumeric))
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
        .collect();

    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for word in &kept {
        let count = counts.entry(word.as_str()).or_insert(0);
        if *count == 0 {
            order.push(word.as_str());
        }
        *count += 1;
    }

    let mut ranked: Vec<(&str, usize)> = order
        .into_iter()
        .map(|w| (w, counts.get(w).copied().unwrap_or_default()))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(top_n)
        .map(|(word, frequency)| Keyword {
            word: word.to_owned(),
            frequency,
            percentage: frequency as f64 / kept.len() as f64 * 100.0,
        })
        .collect()
}

/// First [`SUMMARY_SENTENCES`] sentences, or the whole text when it is short.
pub fn summarize(text: &str) -> String {
    let sentences = sentences(text);
    if sentences.len() <= SUMMARY_SENTENCES {
        return text.to_owned();
    }
    sentences[..SUMMARY_SENTENCES].join(" ")
}

pub fn statistics(text: &str) -> TextStatistics {
    let words = words(text);
    let sentence_count = sentences(text).len();
    let unique: HashSet<&str> = words.iter().map(String::as_str).collect();
    let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
    TextStatistics {
        word_count: words.len(),
        sentence_count,
        average_sentence_length: ratio(words.len(), sentence_count),
        unique_words: unique.len(),
        lexical_diversity: ratio(unique.len(), words.len()),
    }
}

/// Run every analysis over `text`.
pub fn analyze(text: &str) -> TextAnalysis {
    TextAnalysis {
        sentiment: sentiment(text),
        keywords: keywords(text, TOP_KEYWORDS),
        summary: summarize(text),
        statistics: statistics(text),
    }
}
