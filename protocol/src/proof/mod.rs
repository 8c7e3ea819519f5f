//! # Proofs
//!
//! A proof is an RSA PKCS#1 v1.5 signature over `SHA-256(did_text)`,
//! carried as hex text. There is no nonce and no timestamp: the same key
//! and DID always produce the same proof, and a proof is valid until the
//! stored identity changes.
//!
//! ```text
//! prover:   did ──SHA-256──► digest ──sign(priv)──► proof ──hex──► wire
//! verifier: wire ──hex──► bytes ─┐
//!           store ──► did ──SHA-256──► digest ──verify(pub)──► Valid | Invalid
//! ```
//!
//! - [`verifier`] — [`ProofVerifier`], the only thing a relying party needs.
//! - [`prover`] — the signing side, for the CLI, tests and benchmarks.
//! - [`error`] — the verification outcome taxonomy.

pub mod error;
pub mod prover;
pub mod verifier;

pub use error::VerificationError;
pub use prover::{prove, Proof};
pub use verifier::ProofVerifier;
