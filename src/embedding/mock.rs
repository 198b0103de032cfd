use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{EmbeddingError, QueryEmbedder};

/// Embedder returning fixed vectors for known texts; unknown texts fail.
#[derive(Default)]
pub struct MockEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    calls: AtomicUsize,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the vector returned for `text` (matched after trimming).
    pub fn with_vector(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.trim().to_string(), vector);
        self
    }

    /// Number of `embed` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueryEmbedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        self.vectors
            .get(text.trim())
            .cloned()
            .ok_or_else(|| EmbeddingError::InferenceFailed {
                reason: format!("no mock vector registered for {text:?}"),
            })
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
