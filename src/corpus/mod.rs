//! Corpus loading: raw text → ordered, immutable verse records.
//!
//! Lines are parsed as `"<REF> <BODY>"`. When no line in the input has that shape the
//! loader switches to line mode and keeps every sufficiently long line under a synthetic
//! `"Line N"` reference. The parsed records are the whole lexical index: retrieval scans
//! them linearly.

pub mod error;
/// Raw text acquisition (file or URL).
pub mod source;


pub use error::CorpusError;
pub use source::CorpusSource;

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::constants::LINE_FALLBACK_MIN_CHARS;
use crate::hashing::FingerprintBuilder;

// "GN 1:1 ...", "1 Co 13:4 ..." keep the book and chapter:verse together.
static BOOK_CHAPTER_VERSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*((?:\d\s+)?\S+\s+\d+[:.]\d+[a-z]?)\s+(.*\S)\s*$")
        .expect("book/chapter/verse pattern is valid")
});

static REFERENCE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\S+)\s+(.*\S)\s*$").expect("reference pattern is valid"));

/// One addressable verse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerseRecord {
    reference: String,
    text: String,
}

impl VerseRecord {
    /// Builds a record, trimming both fields.
    pub fn new(reference: impl Into<String>, text: impl Into<String>) -> Result<Self, CorpusError> {
        let reference = reference.into().trim().to_string();
        let text = text.into().trim().to_string();

        if reference.is_empty() {
            return Err(CorpusError::EmptyReference);
        }
        if text.is_empty() {
            return Err(CorpusError::EmptyText { reference });
        }

        Ok(Self { reference, text })
    }

    /// Short locator, e.g. `"JO 3:16"` or `"Line 12"`.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Verse body.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for VerseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.reference, self.text)
    }
}

/// How the raw text was turned into records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// At least one line matched the `"<REF> <BODY>"` shape.
    Structured,
    /// No line matched; every long-enough line became a `"Line N"` record.
    LineFallback,
}

/// Ordered sequence of verse records, in source order.
#[derive(Debug, Clone)]
pub struct Corpus {
    records: Vec<VerseRecord>,
    mode: ParseMode,
    fingerprint: String,
}

impl Corpus {
    /// Parses raw corpus text.
    pub fn parse(raw: &str) -> Self {
        let mut matched_lines = 0usize;
        let mut records = Vec::new();

        for line in raw.lines() {
            let Some(caps) = BOOK_CHAPTER_VERSE
                .captures(line)
                .or_else(|| REFERENCE_TOKEN.captures(line))
            else {
                continue;
            };
            matched_lines += 1;

            if let Ok(record) = VerseRecord::new(&caps[1], &caps[2]) {
                records.push(record);
            }
        }

        if matched_lines > 0 {
            debug!(
                matched_lines,
                records = records.len(),
                "corpus parsed in structured mode"
            );
            return Self::build(records, ParseMode::Structured);
        }

        let records: Vec<VerseRecord> = raw
            .lines()
            .enumerate()
            .filter_map(|(i, line)| {
                let trimmed = line.trim();
                if trimmed.chars().count() < LINE_FALLBACK_MIN_CHARS {
                    return None;
                }
                VerseRecord::new(format!("Line {}", i + 1), trimmed).ok()
            })
            .collect();

        warn!(
            records = records.len(),
            min_chars = LINE_FALLBACK_MIN_CHARS,
            "no line matched the reference pattern; indexing corpus line by line"
        );

        Self::build(records, ParseMode::LineFallback)
    }

    /// Builds a corpus from already-parsed records (exact duplicates are dropped).
    pub fn from_records(records: impl IntoIterator<Item = VerseRecord>) -> Self {
        Self::build(records.into_iter().collect(), ParseMode::Structured)
    }

    fn build(records: Vec<VerseRecord>, mode: ParseMode) -> Self {
        let mut seen: HashSet<(String, String)> = HashSet::with_capacity(records.len());
        let mut unique = Vec::with_capacity(records.len());
        let mut fingerprint = FingerprintBuilder::new();

        for record in records {
            if !seen.insert((record.reference.clone(), record.text.clone())) {
                continue;
            }
            fingerprint.push(&record.reference, &record.text);
            unique.push(record);
        }

        Self {
            records: unique,
            mode,
            fingerprint: fingerprint.finish(),
        }
    }

    pub fn records(&self) -> &[VerseRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VerseRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    /// BLAKE3 hex fingerprint over the records, in order.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a VerseRecord;
    type IntoIter = std::slice::Iter<'a, VerseRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
