//! On-disk index model.

use half::f16;
use rkyv::{Archive, Deserialize, Serialize};

use crate::constants::INDEX_BYTES_PER_COMPONENT;

/// Binary index artifact, stored as `rkyv` bytes and read through a memory map.
#[derive(Archive, Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct IndexArtifact {
    /// Format version ([`crate::constants::INDEX_FORMAT_VERSION`]).
    pub version: u32,
    /// Embedder that produced the vectors.
    pub model: String,
    /// Embedding dimension shared by every entry.
    pub dim: u32,
    /// Fingerprint of the corpus the index was built from (may be empty).
    pub corpus_fingerprint: String,
    pub entries: Vec<ArtifactEntry>,
}

/// One indexed passage.
#[derive(Archive, Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct ArtifactEntry {
    /// Source label (verse reference).
    pub label: String,
    pub content: String,
    /// Embedding vector bytes (little-endian f16).
    pub embedding: Vec<u8>,
}

/// Converts little-endian f16 bytes to f32 values. Returns `None` on an odd byte count.
pub fn embedding_bytes_to_f32(bytes: &[u8]) -> Option<Vec<f32>> {
    if !bytes.len().is_multiple_of(INDEX_BYTES_PER_COMPONENT) {
        return None;
    }

    Some(
        bytes
            .chunks_exact(INDEX_BYTES_PER_COMPONENT)
            .map(|chunk| f16::from_bits(u16::from_le_bytes([chunk[0], chunk[1]])).to_f32())
            .collect(),
    )
}

/// Converts f32 values to little-endian f16 bytes.
pub fn f32_to_embedding_bytes(vector: &[f32]) -> Vec<u8> {
    vector
        .iter()
        .flat_map(|&v| f16::from_f32(v).to_le_bytes())
        .collect()
}
