//! Retrieval result types shared by both backends.
//!
//! A retrieval call has three distinguishable outcomes:
//! - `Ok(RetrievalResult::Found(..))`: one or more passages
//! - `Ok(RetrievalResult::NoMatch)`: the backend ran and matched nothing
//! - `Err(RetrievalError::*Unavailable)`: the backend was never loaded

mod error;


pub use error::RetrievalError;

use std::fmt;
use std::sync::Arc;

/// One labelled span of retrieved text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage {
    /// Verse reference or index source label.
    pub label: String,
    /// Passage body.
    pub text: String,
}

impl Passage {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }

    /// Returns `"{label}: {text}"`.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Passage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.text)
    }
}

/// Ordered retrieval output. `Found` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrievalResult {
    Found(Vec<Passage>),
    NoMatch,
}

impl RetrievalResult {
    /// Wraps passages, mapping an empty list to [`RetrievalResult::NoMatch`].
    pub fn from_passages(passages: Vec<Passage>) -> Self {
        if passages.is_empty() {
            Self::NoMatch
        } else {
            Self::Found(passages)
        }
    }

    pub fn passages(&self) -> &[Passage] {
        match self {
            Self::Found(passages) => passages,
            Self::NoMatch => &[],
        }
    }

    pub fn into_passages(self) -> Vec<Passage> {
        match self {
            Self::Found(passages) => passages,
            Self::NoMatch => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.passages().len()
    }

    pub fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch)
    }

    /// Rendered `"{label}: {text}"` lines, in order.
    pub fn rendered(&self) -> Vec<String> {
        self.passages().iter().map(Passage::render).collect()
    }
}

/// A shared, read-only resource that may have failed to load.
///
/// Backends keep the failure reason so retrieval can report it instead of returning an
/// empty result.
#[derive(Debug)]
pub enum Availability<T> {
    Ready(Arc<T>),
    Unavailable { reason: String },
}

impl<T> Clone for Availability<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Ready(value) => Self::Ready(Arc::clone(value)),
            Self::Unavailable { reason } => Self::Unavailable {
                reason: reason.clone(),
            },
        }
    }
}

impl<T> Availability<T> {
    pub fn ready(value: T) -> Self {
        Self::Ready(Arc::new(value))
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Keeps the value, or the error's message as the unavailability reason.
    pub fn from_result<E: fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::ready(value),
            Err(err) => Self::unavailable(err.to_string()),
        }
    }

    pub fn get(&self) -> Option<&Arc<T>> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Ready(_) => None,
            Self::Unavailable { reason } => Some(reason),
        }
    }
}

impl<T> From<Arc<T>> for Availability<T> {
    fn from(value: Arc<T>) -> Self {
        Self::Ready(value)
    }
}
