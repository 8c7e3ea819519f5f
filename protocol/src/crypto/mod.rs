//! # Cryptographic Primitives for Pramaan
//!
//! Everything security-related flows through here:
//!
//! - **SHA-256** for the DID digest. Fixed by the proof format; a different
//!   hash means every previously issued proof stops verifying.
//! - **RSA with PKCS#1 v1.5 padding** for proofs. Deterministic, boring,
//!   and supported by every crypto library a prover is likely to use.
//!
//! Everything here is a thin, type-safe wrapper around the RustCrypto `rsa`
//! and `sha2` crates.

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{sha256, sha256_array};
pub use keys::{KeyError, PramaanKeypair, PramaanPublicKey};
pub use signatures::{sign_digest, verify_digest, SignatureError};
