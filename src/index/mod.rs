//! Pre-built vector index over corpus passages.
//!
//! Two on-disk formats are accepted by [`VectorIndex::load`]:
//! - binary: a header followed by an `rkyv` [`IndexArtifact`] (f16 embeddings), read
//!   through a memory map
//! - JSON: `[{"label", "content", "embedding"}]` or `{"model", "corpus_fingerprint", "entries"}`
//!
//! Lookup is exact cosine k-nearest-neighbour over all entries.

/// Binary artifact model and f16 conversion.
pub mod artifact;
mod error;


pub use artifact::{ArtifactEntry, IndexArtifact};
pub use error::{IndexError, IndexResult};

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use memmap2::Mmap;
use rkyv::rancor::Error as RkyvError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constants::{INDEX_FORMAT_VERSION, INDEX_MAGIC};
use crate::corpus::Corpus;
use crate::embedding::{EmbeddingError, QueryEmbedder};
use artifact::{embedding_bytes_to_f32, f32_to_embedding_bytes};

const BUILD_BATCH_SIZE: usize = 32;

/// One indexed passage with its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub label: String,
    pub content: String,
    pub embedding: Vec<f32>,
}

impl IndexEntry {
    pub fn new(label: impl Into<String>, content: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            label: label.into(),
            content: content.into(),
            embedding,
        }
    }
}

/// A search hit: the entry, its cosine similarity, and its position in the index.
#[derive(Debug, Clone, Copy)]
pub struct Neighbor<'a> {
    pub entry: &'a IndexEntry,
    pub score: f32,
    pub position: usize,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonIndex {
    Entries(Vec<IndexEntry>),
    Document(JsonDocument),
}

#[derive(Deserialize)]
struct JsonDocument {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    corpus_fingerprint: Option<String>,
    entries: Vec<IndexEntry>,
}

/// Immutable vector index. An index with no entries is valid and matches nothing.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    dim: usize,
    model: String,
    corpus_fingerprint: Option<String>,
    entries: Vec<IndexEntry>,
    norms: Vec<f32>,
}

impl VectorIndex {
    /// Validates that every embedding is non-empty and shares one dimension.
    pub fn new(
        model: impl Into<String>,
        corpus_fingerprint: Option<String>,
        entries: Vec<IndexEntry>,
    ) -> IndexResult<Self> {
        let dim = entries.first().map_or(0, |e| e.embedding.len());

        for entry in &entries {
            if entry.embedding.is_empty() {
                return Err(IndexError::EmptyEmbedding {
                    label: entry.label.clone(),
                });
            }
            if entry.embedding.len() != dim {
                return Err(IndexError::InconsistentDimension {
                    label: entry.label.clone(),
                    expected: dim,
                    actual: entry.embedding.len(),
                });
            }
        }

        let norms = entries.iter().map(|e| l2_norm(&e.embedding)).collect();

        Ok(Self {
            dim,
            model: model.into(),
            corpus_fingerprint: corpus_fingerprint.filter(|f| !f.is_empty()),
            entries,
            norms,
        })
    }

    /// Embedding dimension (0 for an empty index).
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn corpus_fingerprint(&self) -> Option<&str> {
        self.corpus_fingerprint.as_deref()
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns up to `k` entries ranked by cosine similarity, most similar first.
    ///
    /// Equal scores keep index order.
    pub fn nearest(&self, query: &[f32], k: usize) -> IndexResult<Vec<Neighbor<'_>>> {
        if k == 0 || self.entries.is_empty() {
            return Ok(Vec::new());
        }

        if query.len() != self.dim {
            return Err(IndexError::QueryDimensionMismatch {
                expected: self.dim,
                actual: query.len(),
            });
        }

        let query_norm = l2_norm(query);

        let mut scored: Vec<Neighbor<'_>> = self
            .entries
            .iter()
            .zip(&self.norms)
            .enumerate()
            .map(|(position, (entry, &norm))| Neighbor {
                entry,
                score: cosine(query, query_norm, &entry.embedding, norm),
                position,
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);

        Ok(scored)
    }

    /// Loads an index file.
    ///
    /// Files starting with [`INDEX_MAGIC`] are binary artifacts whatever their name. Anything
    /// else is read as JSON when it has a `.json` extension or starts with `[` or `{`.
    pub fn load(path: impl AsRef<Path>) -> IndexResult<Self> {
        let path = path.as_ref();
        let io_err = |source| IndexError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(io_err)?;
        let len = file.metadata().map_err(io_err)?.len();
        if len == 0 {
            return Err(IndexError::EmptyFile {
                path: path.to_path_buf(),
            });
        }

        // SAFETY: The file is opened read-only and the mapping is dropped before returning.
        // Index artifacts are not modified while the process loads them.
        let mmap = unsafe { Mmap::map(&file).map_err(io_err)? };

        let index = if let Some(archive) = mmap.strip_prefix(INDEX_MAGIC.as_slice()) {
            Self::from_binary(path, archive)?
        } else if looks_like_json(path, &mmap) {
            Self::from_json(path, &mmap)?
        } else {
            return Err(IndexError::Corrupt {
                path: path.to_path_buf(),
                reason: "missing binary index header and not JSON".to_string(),
            });
        };

        info!(
            path = %path.display(),
            entries = index.len(),
            dim = index.dim,
            model = %index.model,
            "vector index loaded"
        );

        Ok(index)
    }

    fn from_json(path: &Path, bytes: &[u8]) -> IndexResult<Self> {
        let parsed: JsonIndex = serde_json::from_slice(bytes).map_err(|source| IndexError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        match parsed {
            JsonIndex::Entries(entries) => Self::new("unknown", None, entries),
            JsonIndex::Document(doc) => Self::new(
                doc.model.unwrap_or_else(|| "unknown".to_string()),
                doc.corpus_fingerprint,
                doc.entries,
            ),
        }
    }

    fn from_binary(path: &Path, bytes: &[u8]) -> IndexResult<Self> {
        let artifact = rkyv::from_bytes::<IndexArtifact, RkyvError>(bytes).map_err(|e| {
            IndexError::Corrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        Self::from_artifact(path, artifact)
    }

    fn from_artifact(path: &Path, artifact: IndexArtifact) -> IndexResult<Self> {
        if artifact.version != INDEX_FORMAT_VERSION {
            return Err(IndexError::UnsupportedVersion {
                found: artifact.version,
                expected: INDEX_FORMAT_VERSION,
            });
        }

        let dim = artifact.dim as usize;
        let mut entries = Vec::with_capacity(artifact.entries.len());

        for entry in artifact.entries {
            let embedding =
                embedding_bytes_to_f32(&entry.embedding).ok_or_else(|| IndexError::Corrupt {
                    path: path.to_path_buf(),
                    reason: format!("entry {:?} has an odd embedding byte count", entry.label),
                })?;

            if embedding.len() != dim {
                return Err(IndexError::InconsistentDimension {
                    label: entry.label,
                    expected: dim,
                    actual: embedding.len(),
                });
            }

            entries.push(IndexEntry {
                label: entry.label,
                content: entry.content,
                embedding,
            });
        }

        Self::new(artifact.model, Some(artifact.corpus_fingerprint), entries)
    }

    /// Binary artifact for this index (embeddings narrowed to f16).
    pub fn to_artifact(&self) -> IndexArtifact {
        IndexArtifact {
            version: INDEX_FORMAT_VERSION,
            model: self.model.clone(),
            dim: self.dim as u32,
            corpus_fingerprint: self.corpus_fingerprint.clone().unwrap_or_default(),
            entries: self
                .entries
                .iter()
                .map(|e| ArtifactEntry {
                    label: e.label.clone(),
                    content: e.content.clone(),
                    embedding: f32_to_embedding_bytes(&e.embedding),
                })
                .collect(),
        }
    }

    /// Writes [`INDEX_MAGIC`] and the binary artifact to `path` (temp file, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> IndexResult<()> {
        let path = path.as_ref();
        let bytes = rkyv::to_bytes::<RkyvError>(&self.to_artifact())
            .map_err(|e| IndexError::Serialization(e.to_string()))?;

        let temp_path = path.with_extension("tmp");
        let io_err = |source| IndexError::Io {
            path: path.to_path_buf(),
            source,
        };

        {
            let mut file = File::create(&temp_path).map_err(io_err)?;
            file.write_all(INDEX_MAGIC).map_err(io_err)?;
            file.write_all(&bytes).map_err(io_err)?;
            file.sync_all().map_err(io_err)?;
        }

        fs::rename(&temp_path, path).map_err(io_err)?;

        info!(
            path = %path.display(),
            entries = self.len(),
            bytes = bytes.len(),
            "vector index saved"
        );

        Ok(())
    }

    /// Embeds every corpus record (label = reference, content = text).
    pub async fn build(corpus: &Corpus, embedder: &dyn QueryEmbedder) -> IndexResult<Self> {
        let mut entries = Vec::with_capacity(corpus.len());

        for chunk in corpus.records().chunks(BUILD_BATCH_SIZE) {
            let texts: Vec<&str> = chunk.iter().map(|r| r.text()).collect();
            let embeddings = embedder.embed_batch(&texts).await?;
            if embeddings.len() != chunk.len() {
                return Err(EmbeddingError::InvalidResponse {
                    reason: format!(
                        "embedder returned {} vectors for {} texts",
                        embeddings.len(),
                        chunk.len()
                    ),
                }
                .into());
            }

            for (record, embedding) in chunk.iter().zip(embeddings) {
                entries.push(IndexEntry::new(record.reference(), record.text(), embedding));
            }

            debug!(embedded = entries.len(), total = corpus.len(), "index build progress");
        }

        let index = Self::new(
            embedder.model_name(),
            Some(corpus.fingerprint().to_string()),
            entries,
        )?;

        info!(
            entries = index.len(),
            dim = index.dim,
            model = %index.model,
            "vector index built"
        );

        Ok(index)
    }
}

fn looks_like_json(path: &Path, bytes: &[u8]) -> bool {
    if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    {
        return true;
    }

    matches!(
        bytes.iter().find(|b| !b.is_ascii_whitespace()),
        Some(b'[' | b'{')
    )
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

fn cosine(a: &[f32], a_norm: f32, b: &[f32], b_norm: f32) -> f32 {
    if a_norm == 0.0 || b_norm == 0.0 {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    dot / (a_norm * b_norm)
}
