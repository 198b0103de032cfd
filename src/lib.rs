//! Lectio library crate (used by the CLI and integration tests).
//!
//! Retrieves verses from a fixed corpus as grounding context for a downstream
//! generator. Two interchangeable backends answer a query:
//! - lexical: keyword extraction plus two-pass (all terms, then any term) whole-word
//!   matching over the parsed corpus
//! - semantic: cosine nearest neighbours over a pre-built vector index
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`Corpus`], [`VerseRecord`], [`CorpusSource`] - Corpus loading
//! - [`extract_keywords`] - Query terms
//! - [`LexicalRetriever`], [`SemanticRetriever`] - Backends
//! - [`RetrievalResult`], [`RetrievalError`], [`Availability`] - Outcomes
//! - [`ContextAssembler`], [`Context`] - Context blocks
//! - [`RetrievalEngine`], [`Backend`], [`Config`] - Wiring
//!
//! ## Embedding & Index
//! - [`QueryEmbedder`], [`StubEmbedder`], [`HttpEmbedder`] - Query embedding
//! - [`VectorIndex`] - Binary (`rkyv`) and JSON index artifacts
//!
//! ## Test/Mock Support
//! [`MockEmbedder`] is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod context;
pub mod corpus;
pub mod embedding;
pub mod engine;
pub mod hashing;
pub mod index;
pub mod keywords;
pub mod lexical;
pub mod retrieval;
pub mod semantic;

pub use config::{Config, ConfigError};
pub use constants::{DEFAULT_LIMIT, DISJUNCTIVE_CAP};
pub use context::{Context, ContextAssembler, NO_CONTEXT_MARKER};
pub use corpus::{Corpus, CorpusError, CorpusSource, ParseMode, VerseRecord};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
pub use embedding::{
    EmbeddingError, HttpEmbedder, HttpEmbedderConfig, QueryEmbedder, StubEmbedder,
};
pub use engine::{Backend, RetrievalEngine};
pub use hashing::{FingerprintBuilder, hash_text, hash_to_u64};
pub use index::{IndexEntry, IndexError, Neighbor, VectorIndex};
pub use keywords::extract_keywords;
pub use lexical::{LexicalOutcome, LexicalRetriever, MatchPass};
pub use retrieval::{Availability, Passage, RetrievalError, RetrievalResult};
pub use semantic::SemanticRetriever;
