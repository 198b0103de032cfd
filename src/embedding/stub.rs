use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use super::{EmbeddingError, QueryEmbedder, normalize};
use crate::constants::DEFAULT_STUB_DIM;
use crate::hashing::hash_to_u64;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+").expect("token pattern is valid"));

/// Deterministic embedder: sums one pseudo-random unit direction per lowercase word.
///
/// Texts sharing words get similar vectors, identical texts get identical vectors. No
/// model files are required.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    dim: usize,
}

impl Default for StubEmbedder {
    fn default() -> Self {
        Self {
            dim: DEFAULT_STUB_DIM,
        }
    }
}

impl StubEmbedder {
    pub fn new(dim: usize) -> Result<Self, EmbeddingError> {
        if dim == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "stub embedding dimension must be non-zero".to_string(),
            });
        }
        Ok(Self { dim })
    }

    /// Synchronous embedding (the stub never suspends).
    pub fn embed_sync(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let lowered = trimmed.to_lowercase();
        let mut embedding = vec![0.0f32; self.dim];
        let mut tokens = 0usize;

        for token in TOKEN.find_iter(&lowered) {
            self.accumulate(&mut embedding, token.as_str());
            tokens += 1;
        }

        if tokens == 0 {
            self.accumulate(&mut embedding, &lowered);
        }

        debug!(text_len = text.len(), tokens, "generated stub embedding");

        normalize(&mut embedding);
        Ok(embedding)
    }

    fn accumulate(&self, embedding: &mut [f32], token: &str) {
        let mut state = hash_to_u64(token.as_bytes());
        for value in embedding.iter_mut() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            *value += ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
        }
    }
}

#[async_trait]
impl QueryEmbedder for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_sync(text)
    }

    fn model_name(&self) -> &str {
        "stub"
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.dim)
    }
}
