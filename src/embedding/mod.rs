//! Query embedding.
//!
//! The semantic retriever embeds queries with the same function that built the vector
//! index. That identity is a deployment contract; nothing here checks it.
//!
//! - [`StubEmbedder`] is deterministic and needs no model (tests, offline demos).
//! - [`HttpEmbedder`] calls an Ollama-compatible embeddings endpoint.

mod error;
/// Ollama-compatible HTTP embedder.
pub mod http;
/// Deterministic hash-seeded embedder.
pub mod stub;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use error::EmbeddingError;
pub use http::{HttpEmbedder, HttpEmbedderConfig};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;
pub use stub::StubEmbedder;

use async_trait::async_trait;

/// Turns text into a fixed-dimension vector.
#[async_trait]
pub trait QueryEmbedder: Send + Sync {
    /// Embeds a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embeds several texts, in order. The default runs [`embed`](Self::embed) sequentially.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    /// Identifier recorded in index artifacts (model name or `"stub"`).
    fn model_name(&self) -> &str;

    /// Output dimension, when known ahead of the first call.
    fn dimension(&self) -> Option<usize> {
        None
    }
}

/// L2-normalizes a vector in place (zero vectors are left untouched).
pub fn normalize(embedding: &mut [f32]) {
    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in embedding.iter_mut() {
            *x /= norm;
        }
    }
}
