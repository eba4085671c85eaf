//! Near-duplicate removal by fuzzy title similarity.
//!
//! Titles are case-folded and trimmed, then compared with a character-level
//! matching ratio (`2 * matches / total_len`). A result whose title scores
//! above [`DEDUP_THRESHOLD`] against any previously kept title is dropped.
//! First-seen wins and the surviving order is the input order.
//!
//! Comparison is pairwise against the kept set, O(n²) in the number of
//! results. Result caps are in the low tens, so this stays cheap.

use similar::TextDiff;

use crate::types::SearchResult;

/// Similarity above which two titles are considered the same result.
pub const DEDUP_THRESHOLD: f64 = 0.85;

/// Case-folded, whitespace-trimmed comparison key for a title.
fn title_key(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Character-level similarity ratio in `[0.0, 1.0]` between two titles.
///
/// Both titles are case-folded and trimmed first. Two empty titles are
/// identical (ratio 1.0).
pub fn title_similarity(a: &str, b: &str) -> f64 {
    similarity_of_keys(&title_key(a), &title_key(b))
}

fn similarity_of_keys(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    f64::from(TextDiff::from_chars(a, b).ratio())
}

/// Drop results whose titles are near-duplicates of an earlier result.
///
/// Idempotent: running it on its own output returns the same sequence.
pub fn deduplicate(results: Vec<SearchResult>) -> Vec<SearchResult> {
    deduplicate_by(results, |r| r.title.as_str())
}

/// [`deduplicate`] for any item type, comparing the title `title_of` returns.
pub fn deduplicate_by<T>(items: Vec<T>, title_of: impl Fn(&T) -> &str) -> Vec<T> {
    let mut kept_keys: Vec<String> = Vec::with_capacity(items.len());
    let mut kept: Vec<T> = Vec::with_capacity(items.len());

    for item in items {
        let key = title_key(title_of(&item));
        let duplicate_of = kept_keys
            .iter()
            .position(|seen| similarity_of_keys(&key, seen) > DEDUP_THRESHOLD);

        if let Some(index) = duplicate_of {
            tracing::trace!(
                title = %title_of(&item),
                kept = %title_of(&kept[index]),
                "dropping near-duplicate result"
            );
            continue;
        }
        kept_keys.push(key);
        kept.push(item);
    }

    kept
}
