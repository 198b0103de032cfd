//! Hash utilities for corpus fingerprints and deterministic seeds.
//!
//! Uses BLAKE3. Fingerprints are hex strings; seeds are 64-bit truncations.

use blake3::Hasher;

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
///
/// Not suitable for security.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}

/// Hashes a query or verse text to a 32-byte digest.
#[inline]
pub fn hash_text(text: &str) -> [u8; 32] {
    *blake3::hash(text.as_bytes()).as_bytes()
}

/// Incremental fingerprint over an ordered sequence of `(reference, text)` pairs.
///
/// Field and record separators are hashed so `("a b", "c")` and `("a", "b c")` differ.
#[derive(Default)]
pub struct FingerprintBuilder {
    hasher: Hasher,
    records: u64,
}

impl FingerprintBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, reference: &str, text: &str) {
        self.hasher.update(&(reference.len() as u64).to_le_bytes());
        self.hasher.update(reference.as_bytes());
        self.hasher.update(b"|");
        self.hasher.update(&(text.len() as u64).to_le_bytes());
        self.hasher.update(text.as_bytes());
        self.hasher.update(b"\n");
        self.records += 1;
    }

    /// Returns the lowercase hex digest.
    pub fn finish(mut self) -> String {
        self.hasher.update(&self.records.to_le_bytes());
        self.hasher.finalize().to_hex().to_string()
    }
}
