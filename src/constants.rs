//! Cross-cutting, shared constants.
//!
//! Retrieval defaults live here so the engine, the CLI and the config layer agree on them.

/// Default number of passages returned per query.
pub const DEFAULT_LIMIT: usize = 7;

/// Candidate cap for the disjunctive (any-term) lexical pass.
pub const DISJUNCTIVE_CAP: usize = 10;

/// Minimum trimmed length (in chars) of a line kept by the line-mode corpus fallback.
pub const LINE_FALLBACK_MIN_CHARS: usize = 20;

/// Minimum length (in chars) of a query term.
pub const MIN_TERM_CHARS: usize = 2;

/// Default capacity of the query-embedding cache.
pub const DEFAULT_EMBEDDING_CACHE_CAPACITY: u64 = 1024;

/// Embedding dimension produced by [`crate::embedding::StubEmbedder`] by default.
pub const DEFAULT_STUB_DIM: usize = 384;

/// Default embedding model requested from an Ollama-compatible endpoint.
pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

/// Default corpus location.
pub const DEFAULT_CORPUS_PATH: &str = "biblia.txt";

/// On-disk vector index format version.
pub const INDEX_FORMAT_VERSION: u32 = 1;

/// Header written before the `rkyv` bytes of a binary index. Eight bytes, so the archive
/// that follows keeps its alignment inside the memory map.
pub const INDEX_MAGIC: &[u8; 8] = b"LECTIDX\0";

/// Bytes per stored embedding component (little-endian f16).
pub const INDEX_BYTES_PER_COMPONENT: usize = 2;
