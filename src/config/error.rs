//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric variable could not be parsed.
    #[error("failed to parse {name}='{value}': {source}")]
    ParseInt {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// `LECTIO_LIMIT` was zero.
    #[error("invalid limit '{value}': must be at least 1")]
    InvalidLimit { value: String },

    /// `LECTIO_MAX_CONTEXT_CHARS` was zero.
    #[error("invalid context budget '{value}': must be at least 1")]
    InvalidContextBudget { value: String },

    /// `LECTIO_BACKEND` named an unknown backend.
    #[error("unknown backend '{value}': expected lexical, semantic or hybrid")]
    UnknownBackend { value: String },

    /// The semantic backend was selected without an index.
    #[error("backend '{backend}' requires LECTIO_INDEX_PATH")]
    MissingIndexPath { backend: String },

    /// The embedder URL is not an http(s) URL.
    #[error("invalid embedder URL '{value}': expected http:// or https://")]
    InvalidEmbedderUrl { value: String },

    /// Path exists but is not a file (when a file was expected).
    #[error("path is not a file: {}", path.display())]
    NotAFile { path: PathBuf },
}
