//! # Digital Signatures
//!
//! RSA PKCS#1 v1.5 signing and verification over SHA-256 digests.
//!
//! Both directions take the *digest*, not the message. The proof protocol
//! fixes exactly what gets hashed (the DID text), and taking `&[u8; 32]`
//! keeps anyone from accidentally signing the raw DID or a digest of the
//! split form.
//!
//! The padding embeds the SHA-256 DigestInfo prefix, so proofs produced here
//! interoperate with any standard PKCS#1 v1.5 / SHA-256 implementation.

use rsa::Pkcs1v15Sign;
use sha2::Sha256;
use thiserror::Error;

use super::hash::sha256_array;
use super::keys::{PramaanKeypair, PramaanPublicKey};

/// Errors during signature operations.
///
/// Vague on purpose: callers learn *that* verification failed, not where.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("signature verification failed")]
    VerificationFailed,

    #[error("invalid signature length: expected {expected} bytes, got {actual}")]
    InvalidSignatureLength { expected: usize, actual: usize },

    #[error("signing failed")]
    SigningFailed,
}

/// Sign a SHA-256 digest with PKCS#1 v1.5 padding.
///
/// Deterministic: the same key and digest always produce the same bytes.
pub fn sign_digest(keypair: &PramaanKeypair, digest: &[u8; 32]) -> Result<Vec<u8>, SignatureError> {
    keypair
        .private_key()
        .sign(Pkcs1v15Sign::new::<Sha256>(), digest)
        .map_err(|_| SignatureError::SigningFailed)
}

/// Verify a PKCS#1 v1.5 signature over a SHA-256 digest.
///
/// A signature whose length differs from the modulus size is reported as
/// [`SignatureError::InvalidSignatureLength`] before any RSA arithmetic; it
/// cannot be valid for this key.
pub fn verify_digest(
    public_key: &PramaanPublicKey,
    digest: &[u8; 32],
    signature: &[u8],
) -> Result<(), SignatureError> {
    let expected = public_key.signature_len();
    if signature.len() != expected {
        return Err(SignatureError::InvalidSignatureLength {
            expected,
            actual: signature.len(),
        });
    }

    public_key
        .inner()
        .verify(Pkcs1v15Sign::new::<Sha256>(), digest, signature)
        .map_err(|_| SignatureError::VerificationFailed)
}

/// Hash `message` with SHA-256 and sign the digest.
pub fn sign(keypair: &PramaanKeypair, message: &[u8]) -> Result<Vec<u8>, SignatureError> {
    sign_digest(keypair, &sha256_array(message))
}

/// Hash `message` with SHA-256 and verify the signature. `true` only on a
/// valid signature.
pub fn verify(public_key: &PramaanPublicKey, message: &[u8], signature: &[u8]) -> bool {
    verify_digest(public_key, &sha256_array(message), signature).is_ok()
}
