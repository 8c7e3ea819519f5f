// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Pramaan Protocol Core Library
//!
//! Pramaan proves that a person controls the identity they enrolled with,
//! without ever handing the private key to the verifier. Enrollment (outside
//! this crate) derives a 64-hex-character DID from a biometric hash and binds
//! it to an RSA keypair. Later, the person signs the SHA-256 of that DID and
//! presents the signature as a "proof"; this crate checks it.
//!
//! ## Architecture
//!
//! - **crypto** — SHA-256 and RSA PKCS#1 v1.5 wrappers. No home-grown math.
//! - **identity** — The `Did` type and its lossless split into two `u128`s.
//! - **storage** — The `IdentityStore` seam plus memory, JSON-file and sled
//!   backends. The verifier never writes through it.
//! - **proof** — Proof verification (and the signing counterpart used by
//!   provers and tests).
//! - **config** — Protocol constants.
//!
//! ## Design Philosophy
//!
//! 1. Verification fails closed. Every failure is a typed, recoverable
//!    outcome; nothing in the verification path panics.
//! 2. Encoding fails loudly. A malformed hash is a caller bug and is
//!    reported as such, never folded into "invalid proof".
//! 3. Error messages carry no key material and no signature bytes.

pub mod config;
pub mod crypto;
pub mod identity;
pub mod proof;
pub mod storage;

pub use identity::{encode, Did, SplitIdentifier};
pub use proof::{ProofVerifier, VerificationError};
pub use storage::IdentityStore;
