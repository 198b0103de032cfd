//! Two-pass keyword matching over the corpus.
//!
//! Pass 1 keeps verses containing every term. Only when it finds nothing, pass 2 keeps
//! verses containing any term, capped at [`DISJUNCTIVE_CAP`] candidates. Both passes walk
//! the corpus in source order and skip verses whose text was already collected.
//!
//! Terms match as whole words, case-insensitively: `"sin"` does not match `"using"`.


use std::collections::HashSet;

use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::constants::{DEFAULT_LIMIT, DISJUNCTIVE_CAP};
use crate::corpus::{Corpus, VerseRecord};
use crate::keywords::extract_keywords;
use crate::retrieval::{Passage, RetrievalResult};

/// Which lexical pass produced the matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPass {
    /// Every term matched.
    Conjunctive,
    /// At least one term matched.
    Disjunctive,
}

/// Lexical result plus the pass that produced it (`None` when nothing matched).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalOutcome {
    pub pass: Option<MatchPass>,
    pub result: RetrievalResult,
}

impl LexicalOutcome {
    fn no_match() -> Self {
        Self {
            pass: None,
            result: RetrievalResult::NoMatch,
        }
    }
}

/// Whole-word, case-insensitive matcher for a single term.
#[derive(Debug, Clone)]
pub struct TermMatcher {
    term: String,
    pattern: Regex,
}

impl TermMatcher {
    /// Builds a matcher; returns `None` for blank terms.
    pub fn new(term: &str) -> Option<Self> {
        let term = term.trim();
        if term.is_empty() {
            return None;
        }

        let pattern = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(term)))
            .case_insensitive(true)
            .build()
            .ok()?;

        Some(Self {
            term: term.to_string(),
            pattern,
        })
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Keyword retriever over a parsed [`Corpus`].
#[derive(Debug, Clone)]
pub struct LexicalRetriever {
    disjunctive_cap: usize,
}

impl Default for LexicalRetriever {
    fn default() -> Self {
        Self {
            disjunctive_cap: DISJUNCTIVE_CAP,
        }
    }
}

impl LexicalRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the candidate cap of the disjunctive pass.
    pub fn with_disjunctive_cap(mut self, cap: usize) -> Self {
        self.disjunctive_cap = cap;
        self
    }

    pub fn disjunctive_cap(&self) -> usize {
        self.disjunctive_cap
    }

    /// Extracts keywords from `query` and searches with [`DEFAULT_LIMIT`] when `limit` is `None`.
    pub fn search_query(
        &self,
        query: &str,
        corpus: &Corpus,
        limit: Option<usize>,
    ) -> RetrievalResult {
        let terms = extract_keywords(query);
        debug!(query, ?terms, "extracted keywords");
        self.search(&terms, corpus, limit.unwrap_or(DEFAULT_LIMIT))
    }

    /// Runs the two-pass match and keeps the first `limit` passages.
    ///
    /// Returns [`RetrievalResult::NoMatch`] for an empty term list, an empty corpus, a zero
    /// limit, or when neither pass matches.
    pub fn search<S: AsRef<str>>(
        &self,
        terms: &[S],
        corpus: &Corpus,
        limit: usize,
    ) -> RetrievalResult {
        self.search_detailed(terms, corpus, limit).result
    }

    /// Like [`search`](Self::search), also reporting which pass matched.
    pub fn search_detailed<S: AsRef<str>>(
        &self,
        terms: &[S],
        corpus: &Corpus,
        limit: usize,
    ) -> LexicalOutcome {
        let matchers = build_matchers(terms);

        if matchers.is_empty() || corpus.is_empty() || limit == 0 {
            return LexicalOutcome::no_match();
        }

        let (pass, mut hits) = match self.conjunctive(&matchers, corpus) {
            hits if !hits.is_empty() => (MatchPass::Conjunctive, hits),
            _ => (MatchPass::Disjunctive, self.disjunctive(&matchers, corpus)),
        };

        debug!(
            terms = matchers.len(),
            ?pass,
            hits = hits.len(),
            limit,
            "lexical search finished"
        );

        if hits.is_empty() {
            return LexicalOutcome::no_match();
        }

        hits.truncate(limit);
        LexicalOutcome {
            pass: Some(pass),
            result: RetrievalResult::from_passages(
                hits.into_iter()
                    .map(|record| Passage::new(record.reference(), record.text()))
                    .collect(),
            ),
        }
    }

    fn conjunctive<'c>(
        &self,
        matchers: &[TermMatcher],
        corpus: &'c Corpus,
    ) -> Vec<&'c VerseRecord> {
        collect_unique(corpus, usize::MAX, |text| {
            matchers.iter().all(|m| m.is_match(text))
        })
    }

    fn disjunctive<'c>(
        &self,
        matchers: &[TermMatcher],
        corpus: &'c Corpus,
    ) -> Vec<&'c VerseRecord> {
        collect_unique(corpus, self.disjunctive_cap, |text| {
            matchers.iter().any(|m| m.is_match(text))
        })
    }
}

fn build_matchers<S: AsRef<str>>(terms: &[S]) -> Vec<TermMatcher> {
    terms
        .iter()
        .filter_map(|t| TermMatcher::new(t.as_ref()))
        .collect()
}

fn collect_unique<'c>(
    corpus: &'c Corpus,
    cap: usize,
    matches: impl Fn(&str) -> bool,
) -> Vec<&'c VerseRecord> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut hits = Vec::new();

    for record in corpus {
        if hits.len() >= cap {
            break;
        }
        if seen.contains(record.text()) || !matches(record.text()) {
            continue;
        }
        seen.insert(record.text());
        hits.push(record);
    }

    hits
}
