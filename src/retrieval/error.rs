use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::index::IndexError;

/// Errors returned by retrieval calls.
///
/// "Nothing matched" is not an error; see [`super::RetrievalResult::NoMatch`].
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The corpus was never loaded (missing file, failed fetch).
    #[error("corpus unavailable: {reason}")]
    CorpusUnavailable { reason: String },

    /// The vector index was never loaded, or no query embedder is configured.
    #[error("vector index unavailable: {reason}")]
    IndexUnavailable { reason: String },

    /// Query embedding failed.
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    /// Index lookup failed (e.g. query/index dimension mismatch).
    #[error(transparent)]
    Index(#[from] IndexError),

    /// A result limit of zero was requested.
    #[error("result limit must be at least 1")]
    InvalidLimit,
}

impl RetrievalError {
    /// Returns `true` for configuration errors (backend not loaded).
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::CorpusUnavailable { .. } | Self::IndexUnavailable { .. }
        )
    }

    /// Returns `true` when the embedding service failed in transit (down, refused, 5xx).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Embedding(e) if e.is_transport())
    }
}
