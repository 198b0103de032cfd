//! Backend selection: lexical, semantic, or both.
//!
//! The engine owns the loaded corpus and index slots. A slot that failed to load stays
//! [`Availability::Unavailable`] and every query against it reports why.

#[cfg(test)]
mod tests;

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::context::{Context, ContextAssembler};
use crate::corpus::Corpus;
use crate::embedding::{HttpEmbedder, QueryEmbedder, StubEmbedder};
use crate::index::VectorIndex;
use crate::lexical::LexicalRetriever;
use crate::retrieval::{Availability, Passage, RetrievalError, RetrievalResult};
use crate::semantic::SemanticRetriever;

/// Which retriever answers queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Two-pass keyword matching over the corpus.
    #[default]
    Lexical,
    /// Nearest neighbours in the vector index.
    Semantic,
    /// Semantic hits first, then lexical, deduplicated by text.
    Hybrid,
}

/// Returned when parsing an unknown backend name.
#[derive(Debug, Error)]
#[error("unknown backend {0:?}")]
pub struct UnknownBackend(pub String);

impl FromStr for Backend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lexical" => Ok(Self::Lexical),
            "semantic" => Ok(Self::Semantic),
            "hybrid" => Ok(Self::Hybrid),
            _ => Err(UnknownBackend(s.to_string())),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lexical => "lexical",
            Self::Semantic => "semantic",
            Self::Hybrid => "hybrid",
        })
    }
}

/// Read-only retrieval front end shared across queries.
#[derive(Debug)]
pub struct RetrievalEngine {
    backend: Backend,
    corpus: Availability<Corpus>,
    index: Availability<VectorIndex>,
    lexical: LexicalRetriever,
    semantic: Option<SemanticRetriever>,
    assembler: ContextAssembler,
}

impl RetrievalEngine {
    /// Creates an engine with no semantic retriever and no index.
    pub fn new(backend: Backend, corpus: Availability<Corpus>) -> Self {
        Self {
            backend,
            corpus,
            index: Availability::unavailable("no vector index configured"),
            lexical: LexicalRetriever::default(),
            semantic: None,
            assembler: ContextAssembler::default(),
        }
    }

    /// Attaches a vector index and the retriever that embeds queries for it.
    pub fn with_semantic(
        mut self,
        index: Availability<VectorIndex>,
        retriever: SemanticRetriever,
    ) -> Self {
        if let (Some(corpus), Some(index)) = (self.corpus.get(), index.get())
            && let Some(indexed) = index.corpus_fingerprint()
            && indexed != corpus.fingerprint()
        {
            warn!(
                corpus = %corpus.fingerprint(),
                index = %indexed,
                "vector index was built from a different corpus"
            );
        }

        self.index = index;
        self.semantic = Some(retriever);
        self
    }

    pub fn with_lexical(mut self, lexical: LexicalRetriever) -> Self {
        self.lexical = lexical;
        self
    }

    pub fn with_assembler(mut self, assembler: ContextAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    /// Loads the corpus, and the index when a semantic backend needs one.
    ///
    /// Load failures become unavailable slots, logged at `warn`.
    pub async fn from_config(config: &Config) -> Self {
        let corpus = Availability::from_result(config.corpus_source().load().await);
        if let Some(reason) = corpus.reason() {
            warn!(%reason, "corpus unavailable");
        }

        let assembler = config
            .max_context_chars
            .map_or_else(ContextAssembler::default, ContextAssembler::with_max_chars);

        let engine = Self::new(config.backend, corpus).with_assembler(assembler);

        if config.backend == Backend::Lexical {
            debug!("lexical backend selected, skipping vector index");
            return engine;
        }

        let index = match &config.index_path {
            Some(path) => Availability::from_result(VectorIndex::load(path)),
            None => Availability::unavailable("LECTIO_INDEX_PATH is not set"),
        };
        if let Some(reason) = index.reason() {
            warn!(%reason, "vector index unavailable");
        }

        let embedder: Arc<dyn QueryEmbedder> = match config.http_embedder_config() {
            Some(http) => match HttpEmbedder::new(http) {
                Ok(embedder) => Arc::new(embedder),
                Err(e) => {
                    warn!(error = %e, "invalid embedder settings");
                    return engine.with_semantic(
                        Availability::unavailable(e.to_string()),
                        SemanticRetriever::new(Arc::new(StubEmbedder::default())),
                    );
                }
            },
            None => {
                warn!("No LECTIO_EMBEDDER_URL configured, running embedder in stub mode");
                Arc::new(stub_for(&index))
            }
        };

        let retriever =
            SemanticRetriever::with_cache_capacity(embedder, config.embedding_cache_capacity);
        engine.with_semantic(index, retriever)
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn corpus(&self) -> &Availability<Corpus> {
        &self.corpus
    }

    pub fn index(&self) -> &Availability<VectorIndex> {
        &self.index
    }

    pub fn assembler(&self) -> &ContextAssembler {
        &self.assembler
    }

    /// Runs the configured backend and returns up to `limit` passages.
    pub async fn retrieve(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<RetrievalResult, RetrievalError> {
        if limit == 0 {
            return Err(RetrievalError::InvalidLimit);
        }

        let result = match self.backend {
            Backend::Lexical => self.retrieve_lexical(query, limit),
            Backend::Semantic => self.retrieve_semantic(query, limit).await,
            Backend::Hybrid => self.retrieve_hybrid(query, limit).await,
        }?;

        info!(
            backend = %self.backend,
            limit,
            passages = result.len(),
            "query retrieved"
        );

        Ok(result)
    }

    /// [`retrieve`](Self::retrieve), then assemble at most `limit` entries.
    pub async fn context(&self, query: &str, limit: usize) -> Result<Context, RetrievalError> {
        let result = self.retrieve(query, limit).await?;
        Ok(self.assembler.assemble(&result, limit))
    }

    fn retrieve_lexical(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<RetrievalResult, RetrievalError> {
        match &self.corpus {
            Availability::Ready(corpus) => {
                Ok(self.lexical.search_query(query, corpus, Some(limit)))
            }
            Availability::Unavailable { reason } => Err(RetrievalError::CorpusUnavailable {
                reason: reason.clone(),
            }),
        }
    }

    async fn retrieve_semantic(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<RetrievalResult, RetrievalError> {
        match &self.semantic {
            Some(semantic) => semantic.search(query, &self.index, limit).await,
            None => Err(RetrievalError::IndexUnavailable {
                reason: "no query embedder configured".to_string(),
            }),
        }
    }

    /// Semantic hits first, then lexical. A side that is unavailable, or whose embedder
    /// cannot be reached, is skipped while the other still answers.
    async fn retrieve_hybrid(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<RetrievalResult, RetrievalError> {
        let semantic = match self.retrieve_semantic(query, limit).await {
            Ok(result) => Some(result),
            Err(e) if e.is_unavailable() || e.is_transport() => {
                warn!(error = %e, "hybrid retrieval without semantic backend");
                None
            }
            Err(e) => return Err(e),
        };

        let lexical = match self.retrieve_lexical(query, limit) {
            Ok(result) => Some(result),
            Err(e) if semantic.is_some() => {
                warn!(error = %e, "hybrid retrieval without lexical backend");
                None
            }
            Err(e) => return Err(e),
        };

        let mut seen = HashSet::new();
        let merged: Vec<Passage> = semantic
            .into_iter()
            .chain(lexical)
            .flat_map(RetrievalResult::into_passages)
            .filter(|p| seen.insert(p.text.clone()))
            .take(limit)
            .collect();

        Ok(RetrievalResult::from_passages(merged))
    }
}

/// Stub embedder matching the loaded index dimension, so stub queries stay comparable.
fn stub_for(index: &Availability<VectorIndex>) -> StubEmbedder {
    index
        .get()
        .filter(|index| index.dim() > 0)
        .and_then(|index| StubEmbedder::new(index.dim()).ok())
        .unwrap_or_default()
}
