//! The signing side of the proof protocol.
//!
//! Pramaan does not hold private keys; provers do. This module exists so the
//! CLI, tests and benchmarks produce proofs exactly the way a prover must:
//! sign the SHA-256 of the DID text, then hex-encode.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::keys::PramaanKeypair;
use crate::crypto::signatures::{sign_digest, SignatureError};
use crate::identity::Did;

/// Raw proof bytes. Renders as lowercase hex.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    bytes: Vec<u8>,
}

impl Proof {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercase hex, the form a verifier accepts.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl fmt::Display for Proof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Proof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Proof({} bytes)", self.bytes.len())
    }
}

/// Produce the proof for `did` under `keypair`.
pub fn prove(keypair: &PramaanKeypair, did: &Did) -> Result<Proof, SignatureError> {
    sign_digest(keypair, &did.digest()).map(Proof::from_bytes)
}
