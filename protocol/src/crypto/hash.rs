//! # Hashing Utilities
//!
//! SHA-256 is the only hash in the proof protocol. A proof is a signature
//! over `SHA-256(did_text)`, where `did_text` is the literal 64-character
//! DID string, not its binary value and not its split form.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of the input data as a `Vec<u8>`.
///
/// # Example
///
/// ```
/// use pramaan_protocol::crypto::sha256;
///
/// let hash = sha256(b"pramaan");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Compute the SHA-256 hash and return a fixed-size array.
///
/// Same as [`sha256`] without the heap allocation. The signature layer
/// takes `&[u8; 32]` so a digest of the wrong width cannot reach it.
pub fn sha256_array(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}
