use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::embedding::EmbeddingError;

/// Vector index load, build and lookup errors.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("index file {} is empty", path.display())]
    EmptyFile { path: PathBuf },

    #[error("index file {} is corrupt: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("invalid JSON index {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported index format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("entry {label:?} has dimension {actual}, expected {expected}")]
    InconsistentDimension {
        label: String,
        expected: usize,
        actual: usize,
    },

    #[error("entry {label:?} has an empty embedding")]
    EmptyEmbedding { label: String },

    #[error("query dimension {actual} does not match index dimension {expected}")]
    QueryDimensionMismatch { expected: usize, actual: usize },

    #[error("index serialization failed: {0}")]
    Serialization(String),

    #[error("embedding failed while building index: {0}")]
    Embedding(#[from] EmbeddingError),
}

pub type IndexResult<T> = Result<T, IndexError>;
