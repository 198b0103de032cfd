//! Semantic (embedding) retrieval over a [`VectorIndex`].
//!
//! Query vectors are cached by the BLAKE3 hash of the whitespace-normalized query, so
//! repeated questions skip the embedder.


use std::sync::Arc;

use moka::sync::Cache;
use tracing::debug;

use crate::constants::DEFAULT_EMBEDDING_CACHE_CAPACITY;
use crate::embedding::QueryEmbedder;
use crate::hashing::hash_text;
use crate::index::VectorIndex;
use crate::retrieval::{Availability, Passage, RetrievalError, RetrievalResult};

/// Nearest-neighbour retriever bound to one query embedder.
pub struct SemanticRetriever {
    embedder: Arc<dyn QueryEmbedder>,
    cache: Cache<[u8; 32], Arc<Vec<f32>>>,
}

impl std::fmt::Debug for SemanticRetriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticRetriever")
            .field("model", &self.embedder.model_name())
            .field("cached_queries", &self.cache.entry_count())
            .finish()
    }
}

impl SemanticRetriever {
    /// Creates a retriever with the default query-cache capacity.
    pub fn new(embedder: Arc<dyn QueryEmbedder>) -> Self {
        Self::with_cache_capacity(embedder, DEFAULT_EMBEDDING_CACHE_CAPACITY)
    }

    /// Creates a retriever whose query cache holds at most `capacity` vectors.
    pub fn with_cache_capacity(embedder: Arc<dyn QueryEmbedder>, capacity: u64) -> Self {
        Self {
            embedder,
            cache: Cache::builder().max_capacity(capacity).build(),
        }
    }

    pub fn embedder(&self) -> &Arc<dyn QueryEmbedder> {
        &self.embedder
    }

    /// Number of cached query vectors.
    pub fn cached_queries(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    /// Embeds `query`, serving repeated queries from the cache.
    pub async fn embed_query(&self, query: &str) -> Result<Arc<Vec<f32>>, RetrievalError> {
        let normalized = normalize_query(query);
        let key = hash_text(&normalized);

        if let Some(hit) = self.cache.get(&key) {
            debug!(query_len = query.len(), "query embedding cache hit");
            return Ok(hit);
        }

        let embedding = Arc::new(self.embedder.embed(&normalized).await?);
        self.cache.insert(key, Arc::clone(&embedding));

        Ok(embedding)
    }

    /// Returns up to `k` passages most similar to `query`, most similar first.
    ///
    /// An unloaded index is an error; an empty index, a blank query or `k == 0` yield
    /// [`RetrievalResult::NoMatch`].
    pub async fn search(
        &self,
        query: &str,
        index: &Availability<VectorIndex>,
        k: usize,
    ) -> Result<RetrievalResult, RetrievalError> {
        let index = match index {
            Availability::Ready(index) => index,
            Availability::Unavailable { reason } => {
                return Err(RetrievalError::IndexUnavailable {
                    reason: reason.clone(),
                });
            }
        };

        if k == 0 || index.is_empty() || query.trim().is_empty() {
            debug!(k, entries = index.len(), "semantic search skipped");
            return Ok(RetrievalResult::NoMatch);
        }

        let embedding = self.embed_query(query).await?;
        let neighbors = index.nearest(&embedding, k)?;

        debug!(
            k,
            hits = neighbors.len(),
            top_score = neighbors.first().map(|n| n.score),
            "semantic search complete"
        );

        Ok(RetrievalResult::from_passages(
            neighbors
                .into_iter()
                .map(|n| Passage::new(n.entry.label.clone(), n.entry.content.clone()))
                .collect(),
        ))
    }
}

fn normalize_query(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ")
}
