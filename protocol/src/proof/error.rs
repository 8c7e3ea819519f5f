//! Verification failure taxonomy.
//!
//! Every variant is a normal, reportable outcome. None of them carry key
//! material or signature bytes, so they are safe to return to the party
//! that submitted the proof.

use thiserror::Error;

/// Why a proof was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum VerificationError {
    /// The identity store could not be read. Not the prover's fault.
    #[error("identity storage is unavailable")]
    StorageUnavailable,

    /// The user is missing from the DID table, the key table, or both.
    #[error("unknown user")]
    UnknownUser,

    /// The stored public key could not be parsed.
    #[error("stored public key is malformed")]
    MalformedKey,

    /// The proof is not hex, or has the wrong length for the key.
    #[error("proof is malformed")]
    MalformedProof,

    /// A well-formed proof that does not verify. The common case.
    #[error("signature is invalid")]
    SignatureInvalid,
}

impl VerificationError {
    /// Every variant, in declaration order.
    pub const ALL: [VerificationError; 5] = [
        VerificationError::StorageUnavailable,
        VerificationError::UnknownUser,
        VerificationError::MalformedKey,
        VerificationError::MalformedProof,
        VerificationError::SignatureInvalid,
    ];

    /// Stable snake_case reason code for CLIs, HTTP bodies and metric labels.
    pub fn reason(&self) -> &'static str {
        match self {
            VerificationError::StorageUnavailable => "storage_unavailable",
            VerificationError::UnknownUser => "unknown_user",
            VerificationError::MalformedKey => "malformed_key",
            VerificationError::MalformedProof => "malformed_proof",
            VerificationError::SignatureInvalid => "signature_invalid",
        }
    }

    /// Whether the failure is on the verifier's side rather than the proof's.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            VerificationError::StorageUnavailable | VerificationError::MalformedKey
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn reasons_are_unique_snake_case() {
        let reasons: HashSet<&str> = VerificationError::ALL.iter().map(|e| e.reason()).collect();
        assert_eq!(reasons.len(), VerificationError::ALL.len());
        for reason in reasons {
            assert!(reason
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }

    #[test]
    fn infrastructure_failures() {
        assert!(VerificationError::StorageUnavailable.is_infrastructure());
        assert!(VerificationError::MalformedKey.is_infrastructure());
        assert!(!VerificationError::SignatureInvalid.is_infrastructure());
        assert!(!VerificationError::UnknownUser.is_infrastructure());
    }
}
