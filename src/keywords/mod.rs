//! Query → ordered search terms.
//!
//! Lowercase, split into runs of word characters, drop stop-words and one-char tokens,
//! drop repeats. When nothing survives, the first raw token stands in so a non-blank
//! query always yields at least one term.

mod stopwords;


pub use stopwords::{STOPWORDS, is_stopword};

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::constants::MIN_TERM_CHARS;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("word pattern is valid"));

const FALLBACK_TRIM: &[char] = &['?', '.', ','];

/// Extracts search terms from a free-text query.
///
/// Returns an empty list only when the query is empty or whitespace.
pub fn extract_keywords(query: &str) -> Vec<String> {
    let lowered = query.to_lowercase();
    let mut seen = HashSet::new();

    let terms: Vec<String> = WORD
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| token.chars().count() >= MIN_TERM_CHARS)
        .filter(|token| !is_stopword(token))
        .filter(|token| seen.insert(*token))
        .map(str::to_string)
        .collect();

    if !terms.is_empty() {
        return terms;
    }

    fallback_term(&lowered).into_iter().collect()
}

fn fallback_term(lowered: &str) -> Option<String> {
    let first = lowered.split_whitespace().next()?;
    let trimmed = first.trim_matches(FALLBACK_TRIM);

    if trimmed.is_empty() {
        Some(first.to_string())
    } else {
        Some(trimmed.to_string())
    }
}
