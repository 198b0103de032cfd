//! Corpus error types.

use thiserror::Error;

/// Errors that can occur while acquiring or building a corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// The raw corpus text could not be obtained (missing file, failed fetch).
    #[error("corpus unavailable at '{location}': {reason}")]
    Unavailable { location: String, reason: String },

    /// A verse record was constructed with an empty body.
    #[error("verse '{reference}' has an empty body")]
    EmptyText { reference: String },

    /// A verse record was constructed with an empty reference.
    #[error("verse reference cannot be empty")]
    EmptyReference,
}
