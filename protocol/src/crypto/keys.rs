//! # Key Management
//!
//! RSA key handling for Pramaan identities.
//!
//! The verifier only ever sees public keys, and it sees them as PEM text
//! pulled from storage. Two encodings show up in the wild and both are
//! accepted:
//!
//! - SPKI (`-----BEGIN PUBLIC KEY-----`), what most libraries export by
//!   default.
//! - PKCS#1 (`-----BEGIN RSA PUBLIC KEY-----`), the bare RSA structure.
//!
//! The `rsa` decoders stop at 4096-bit moduli. Larger keys, up to
//! [`MAX_RSA_KEY_BITS`], are decoded field by field instead.
//!
//! Private keys exist here only for the prover side (CLI `prove`, tests,
//! benchmarks). They never touch storage through this crate.
//!
//! ## Security considerations
//!
//! - Key generation uses `OsRng`.
//! - Errors never echo PEM input back. A truncated private key in an error
//!   message is still a leaked private key.
//! - Private key material is never logged or printed by `Debug`.

use rand::rngs::OsRng;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPublicKey};
use rsa::pkcs8::der::{Decode, Document};
use rsa::pkcs8::spki::SubjectPublicKeyInfoRef;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use std::fmt;
use thiserror::Error;

use super::hash::sha256_array;
use crate::config::{MAX_RSA_KEY_BITS, MIN_RSA_KEY_BITS};

/// Errors that can occur during key operations.
///
/// Deliberately says nothing about the key bytes themselves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("invalid public key: not a PEM-encoded RSA public key")]
    InvalidPublicKey,

    #[error("invalid private key: not a PEM-encoded RSA private key")]
    InvalidPrivateKey,

    #[error("RSA modulus too small: {bits} bits (minimum {min})")]
    KeyTooSmall { bits: usize, min: usize },

    #[error("RSA key generation failed")]
    Generation,

    #[error("key encoding failed")]
    Encoding,
}

/// An RSA keypair held by a prover.
///
/// Intentionally not `Serialize`. Exporting a private key should be a
/// deliberate call to [`PramaanKeypair::to_pkcs8_pem`], not a side effect of
/// putting a struct in a JSON response.
#[derive(Clone)]
pub struct PramaanKeypair {
    private_key: RsaPrivateKey,
}

/// The public half of a Pramaan identity. Safe to store, share and log
/// (by fingerprint).
#[derive(Clone, PartialEq, Eq)]
pub struct PramaanPublicKey {
    inner: RsaPublicKey,
}

fn check_modulus(size_bytes: usize) -> Result<(), KeyError> {
    let bits = size_bytes * 8;
    if bits < MIN_RSA_KEY_BITS {
        return Err(KeyError::KeyTooSmall {
            bits,
            min: MIN_RSA_KEY_BITS,
        });
    }
    Ok(())
}

/// Decode `n` and `e` from SPKI or PKCS#1 PEM and build the key with the
/// larger size cap.
fn decode_large_public_key(pem: &str) -> Option<RsaPublicKey> {
    let (label, doc) = Document::from_pem(pem).ok()?;
    let pkcs1_der = match label {
        "PUBLIC KEY" => {
            let spki = SubjectPublicKeyInfoRef::from_der(doc.as_bytes()).ok()?;
            if spki.algorithm.oid != rsa::pkcs1::ALGORITHM_OID {
                return None;
            }
            spki.subject_public_key.as_bytes()?.to_vec()
        }
        "RSA PUBLIC KEY" => doc.as_bytes().to_vec(),
        _ => return None,
    };
    let fields = rsa::pkcs1::RsaPublicKey::from_der(&pkcs1_der).ok()?;
    RsaPublicKey::new_with_max_size(
        BigUint::from_bytes_be(fields.modulus.as_bytes()),
        BigUint::from_bytes_be(fields.public_exponent.as_bytes()),
        MAX_RSA_KEY_BITS,
    )
    .ok()
}

impl PramaanKeypair {
    /// Generate a fresh keypair with a `bits`-sized modulus.
    ///
    /// 2048 bits takes a noticeable fraction of a second; don't call this
    /// in a hot loop.
    pub fn generate(bits: usize) -> Result<Self, KeyError> {
        if bits < MIN_RSA_KEY_BITS {
            return Err(KeyError::KeyTooSmall {
                bits,
                min: MIN_RSA_KEY_BITS,
            });
        }
        let private_key = RsaPrivateKey::new(&mut OsRng, bits).map_err(|_| KeyError::Generation)?;
        Ok(Self { private_key })
    }

    /// Parse a PEM private key, PKCS#8 (`BEGIN PRIVATE KEY`) or PKCS#1
    /// (`BEGIN RSA PRIVATE KEY`).
    pub fn from_pem(pem: &str) -> Result<Self, KeyError> {
        let pem = pem.trim();
        let private_key = RsaPrivateKey::from_pkcs8_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
            .map_err(|_| KeyError::InvalidPrivateKey)?;
        check_modulus(private_key.size())?;
        Ok(Self { private_key })
    }

    /// Export the private key as PKCS#8 PEM.
    ///
    /// **Handle with care.** This is the one secret that lets someone prove
    /// an identity that isn't theirs.
    pub fn to_pkcs8_pem(&self) -> Result<String, KeyError> {
        self.private_key
            .to_pkcs8_pem(LineEnding::LF)
            .map(|pem| pem.as_str().to_owned())
            .map_err(|_| KeyError::Encoding)
    }

    /// Returns the public key associated with this keypair.
    pub fn public_key(&self) -> PramaanPublicKey {
        PramaanPublicKey {
            inner: self.private_key.to_public_key(),
        }
    }

    /// Modulus size in bits.
    pub fn modulus_bits(&self) -> usize {
        self.private_key.size() * 8
    }

    pub(crate) fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }
}

impl fmt::Debug for PramaanKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Public fingerprint only. Never any part of the private key.
        write!(f, "PramaanKeypair(pub={})", self.public_key().fingerprint())
    }
}

impl PramaanPublicKey {
    /// Parse a PEM public key in SPKI or PKCS#1 form.
    ///
    /// Surrounding whitespace is ignored; JSON-stored keys frequently carry
    /// a trailing newline.
    pub fn from_pem(pem: &str) -> Result<Self, KeyError> {
        let pem = pem.trim();
        let inner = RsaPublicKey::from_public_key_pem(pem)
            .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
            .ok()
            .or_else(|| decode_large_public_key(pem))
            .ok_or(KeyError::InvalidPublicKey)?;
        check_modulus(inner.size())?;
        Ok(Self { inner })
    }

    /// Encode as SPKI PEM (`BEGIN PUBLIC KEY`).
    pub fn to_pem(&self) -> Result<String, KeyError> {
        self.inner
            .to_public_key_pem(LineEnding::LF)
            .map_err(|_| KeyError::Encoding)
    }

    /// Encode as PKCS#1 PEM (`BEGIN RSA PUBLIC KEY`).
    pub fn to_pkcs1_pem(&self) -> Result<String, KeyError> {
        self.inner
            .to_pkcs1_pem(LineEnding::LF)
            .map_err(|_| KeyError::Encoding)
    }

    /// Length in bytes of every valid signature under this key.
    pub fn signature_len(&self) -> usize {
        self.inner.size()
    }

    /// Modulus size in bits.
    pub fn modulus_bits(&self) -> usize {
        self.inner.size() * 8
    }

    /// Short hex fingerprint: first 8 bytes of SHA-256 over the SPKI DER.
    /// Good enough to tell keys apart in logs.
    pub fn fingerprint(&self) -> String {
        match self.inner.to_public_key_der() {
            Ok(der) => hex::encode(&sha256_array(der.as_bytes())[..8]),
            Err(_) => "unencodable".to_string(),
        }
    }

    pub(crate) fn inner(&self) -> &RsaPublicKey {
        &self.inner
    }
}

impl fmt::Debug for PramaanPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PramaanPublicKey(rsa-{}, {})",
            self.modulus_bits(),
            self.fingerprint()
        )
    }
}

/// Keys shared across unit tests. Generating RSA keys is slow, so each one
/// is generated once per test binary.
#[cfg(test)]
pub(crate) mod test_keys {
    use super::PramaanKeypair;
    use std::sync::OnceLock;

    pub fn alice() -> &'static PramaanKeypair {
        static KEY: OnceLock<PramaanKeypair> = OnceLock::new();
        KEY.get_or_init(|| PramaanKeypair::generate(2048).unwrap())
    }

    pub fn bob() -> &'static PramaanKeypair {
        static KEY: OnceLock<PramaanKeypair> = OnceLock::new();
        KEY.get_or_init(|| PramaanKeypair::generate(2048).unwrap())
    }

    pub fn small() -> &'static PramaanKeypair {
        static KEY: OnceLock<PramaanKeypair> = OnceLock::new();
        KEY.get_or_init(|| PramaanKeypair::generate(1024).unwrap())
    }
}
