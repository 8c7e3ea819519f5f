//! # Storage Module
//!
//! The verifier needs two lookups and nothing else:
//!
//! ```text
//! user_id ──► DID table ──► Did
//! user_id ──► key table ──► PublicKeyPem
//! ```
//!
//! Those lookups sit behind the [`IdentityStore`] trait so verification
//! logic never touches files or databases directly. Backends:
//!
//! ```text
//! memory.rs — MemoryStore: in-process tables (tests, embedding)
//! json.rs   — JsonFileStore: did_storage.json + keys.json, read per lookup
//! db.rs     — IdentityDb: sled trees with bincode records
//! ```
//!
//! ## Design Decisions
//!
//! 1. **Read-only seam.** The trait has no write methods. Enrollment is
//!    someone else's job; backends expose their own write APIs for it.
//!
//! 2. **Typed per record.** A lookup validates only the requested user's
//!    DID. A malformed record reads as "not found" for that user and
//!    leaves every other user verifiable.
//!
//! 3. **Keys stay text.** Public keys are stored and returned as PEM and
//!    parsed by the verifier, so one bad key only affects its own user.
//!
//! 4. **No cross-table atomicity promised.** A user can exist in one table
//!    and not the other; callers see that as "not found".

pub mod db;
pub mod json;
pub mod memory;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::crypto::keys::{KeyError, PramaanPublicKey};
use crate::identity::Did;

pub use db::IdentityDb;
pub use json::JsonFileStore;
pub use memory::MemoryStore;

// ---------------------------------------------------------------------------
// Error Type
// ---------------------------------------------------------------------------

/// Errors that can occur while reading identity data.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing data could not be read at all (missing file, I/O error).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The backing data was read but does not have the expected shape.
    #[error("corrupt {table} table: {reason}")]
    Corrupt { table: &'static str, reason: String },

    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// PEM text of an RSA public key, as persisted at enrollment.
///
/// Not validated on read; call [`PublicKeyPem::parse`] to get a usable key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicKeyPem(String);

impl PublicKeyPem {
    pub fn new(pem: impl Into<String>) -> Self {
        Self(pem.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse into an RSA public key (SPKI or PKCS#1 PEM).
    pub fn parse(&self) -> Result<PramaanPublicKey, KeyError> {
        PramaanPublicKey::from_pem(&self.0)
    }
}

impl PublicKeyPem {
    /// Encode a key as SPKI PEM for storage.
    pub fn from_key(key: &PramaanPublicKey) -> Result<Self, KeyError> {
        key.to_pem().map(Self)
    }
}

impl fmt::Debug for PublicKeyPem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKeyPem({} bytes)", self.0.len())
    }
}

// ---------------------------------------------------------------------------
// IdentityStore
// ---------------------------------------------------------------------------

/// Read access to enrolled identities.
///
/// `Ok(None)` means the user is not in that table. `Err` means the table
/// itself could not be read. Implementations must be safe to call from
/// many threads at once; the verifier never takes a lock of its own.
pub trait IdentityStore: Send + Sync {
    /// Look up the DID enrolled for `user_id`.
    fn find_did(&self, user_id: &str) -> StoreResult<Option<Did>>;

    /// Look up the public key enrolled for `user_id`.
    fn find_public_key(&self, user_id: &str) -> StoreResult<Option<PublicKeyPem>>;
}

impl<S: IdentityStore + ?Sized> IdentityStore for Arc<S> {
    fn find_did(&self, user_id: &str) -> StoreResult<Option<Did>> {
        (**self).find_did(user_id)
    }

    fn find_public_key(&self, user_id: &str) -> StoreResult<Option<PublicKeyPem>> {
        (**self).find_public_key(user_id)
    }
}

impl<S: IdentityStore + ?Sized> IdentityStore for &S {
    fn find_did(&self, user_id: &str) -> StoreResult<Option<Did>> {
        (**self).find_did(user_id)
    }

    fn find_public_key(&self, user_id: &str) -> StoreResult<Option<PublicKeyPem>> {
        (**self).find_public_key(user_id)
    }
}

impl<S: IdentityStore + ?Sized> IdentityStore for Box<S> {
    fn find_did(&self, user_id: &str) -> StoreResult<Option<Did>> {
        (**self).find_did(user_id)
    }

    fn find_public_key(&self, user_id: &str) -> StoreResult<Option<PublicKeyPem>> {
        (**self).find_public_key(user_id)
    }
}
