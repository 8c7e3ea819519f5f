//! # Proof Verification
//!
//! Given a user identifier and a hex proof, decide whether the proof was
//! produced by the private key matching the user's stored public key, over
//! the user's stored DID.
//!
//! ## Algorithm
//!
//! 1. Load the DID and the public key. Missing either: `UnknownUser`, and
//!    no cryptography runs.
//! 2. Hex-decode the proof (case-insensitive). Not hex: `MalformedProof`.
//! 3. Parse the stored key. Unparseable: `MalformedKey`.
//! 4. `digest = SHA-256(did_text)`.
//! 5. PKCS#1 v1.5 verify. Wrong length for the modulus: `MalformedProof`;
//!    otherwise any failure is `SignatureInvalid`.
//!
//! Calls are independent and stateless. The verifier holds no locks and
//! writes nothing, so one instance can serve any number of threads.

use super::error::VerificationError;
use crate::crypto::keys::PramaanPublicKey;
use crate::crypto::signatures::{verify_digest, SignatureError};
use crate::storage::{IdentityStore, PublicKeyPem, StoreError};

/// Verifies proofs against an [`IdentityStore`].
#[derive(Debug, Clone)]
pub struct ProofVerifier<S> {
    store: S,
}

impl<S: IdentityStore> ProofVerifier<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// `true` if and only if the proof is valid. Never panics, never errors.
    pub fn verify_proof(&self, user_id: &str, signature_hex: &str) -> bool {
        self.check(user_id, signature_hex).is_ok()
    }

    /// Verify and report why a proof was rejected.
    pub fn check(&self, user_id: &str, signature_hex: &str) -> Result<(), VerificationError> {
        let result = self.check_inner(user_id, signature_hex);
        match &result {
            Ok(()) => tracing::info!(user_id, "proof accepted"),
            Err(e) => tracing::warn!(user_id, reason = e.reason(), "proof rejected"),
        }
        result
    }

    fn check_inner(&self, user_id: &str, signature_hex: &str) -> Result<(), VerificationError> {
        let did = self.store.find_did(user_id).map_err(storage_unavailable)?;
        let pem = self
            .store
            .find_public_key(user_id)
            .map_err(storage_unavailable)?;

        tracing::debug!(
            user_id,
            has_did = did.is_some(),
            has_key = pem.is_some(),
            "identity lookup"
        );

        let (Some(did), Some(pem)) = (did, pem) else {
            return Err(VerificationError::UnknownUser);
        };

        let signature = decode_proof(signature_hex)?;
        let public_key = parse_key(user_id, &pem)?;

        match verify_digest(&public_key, &did.digest(), &signature) {
            Ok(()) => Ok(()),
            Err(SignatureError::InvalidSignatureLength { .. }) => {
                Err(VerificationError::MalformedProof)
            }
            Err(_) => Err(VerificationError::SignatureInvalid),
        }
    }
}

fn parse_key(user_id: &str, pem: &PublicKeyPem) -> Result<PramaanPublicKey, VerificationError> {
    pem.parse().map_err(|e| {
        tracing::warn!(user_id, error = %e, "stored public key rejected");
        VerificationError::MalformedKey
    })
}

fn storage_unavailable(err: StoreError) -> VerificationError {
    tracing::error!(error = %err, "identity store read failed");
    VerificationError::StorageUnavailable
}

/// Decode proof text. Surrounding whitespace is ignored; anything else that
/// is not an even run of hex digits is malformed.
fn decode_proof(signature_hex: &str) -> Result<Vec<u8>, VerificationError> {
    let trimmed = signature_hex.trim();
    if trimmed.is_empty() {
        return Err(VerificationError::MalformedProof);
    }
    hex::decode(trimmed).map_err(|_| VerificationError::MalformedProof)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
