//! # IdentityDb: Embedded Identity Store
//!
//! A sled-backed alternative to the JSON files, for deployments that want
//! a real embedded database under the verifier.
//!
//! ## Tree Layout
//!
//! | Tree          | Key                | Value                   |
//! |---------------|--------------------|-------------------------|
//! | `dids`        | `user_id` (UTF-8)  | `bincode(Did)`          |
//! | `public_keys` | `user_id` (UTF-8)  | `bincode(PublicKeyPem)` |
//!
//! ## Atomicity
//!
//! [`IdentityDb::put_identity`] writes both trees in one sled transaction.
//! Readers still do two independent gets, so the verifier never relies on
//! that; it only keeps freshly enrolled users from being half-written.

use sled::transaction::{TransactionError, TransactionResult, Transactional};
use sled::{Db, Tree};
use std::path::Path;

use super::json::JsonFileStore;
use super::{IdentityStore, PublicKeyPem, StoreError, StoreResult};
use crate::config::{DID_TREE, PUBLIC_KEY_TREE};
use crate::identity::Did;

/// Counts returned by [`IdentityDb::import_json`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub dids: usize,
    pub public_keys: usize,
}

/// Persistent identity storage.
///
/// sled trees are lock-free for concurrent reads, so an `IdentityDb` can be
/// shared across threads via `Arc` (or cloned; clones share the same trees).
#[derive(Debug, Clone)]
pub struct IdentityDb {
    db: Db,
    dids: Tree,
    public_keys: Tree,
}

impl IdentityDb {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    /// A database that lives in a temp directory and is removed on drop.
    pub fn open_temporary() -> StoreResult<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    fn from_db(db: Db) -> StoreResult<Self> {
        let dids = db.open_tree(DID_TREE)?;
        let public_keys = db.open_tree(PUBLIC_KEY_TREE)?;
        Ok(Self {
            db,
            dids,
            public_keys,
        })
    }

    // -- Writes (enrollment tooling) ----------------------------------------

    /// Write a user's DID and public key together.
    pub fn put_identity(&self, user_id: &str, did: &Did, key: &PublicKeyPem) -> StoreResult<()> {
        let did_bytes = encode_record(did)?;
        let key_bytes = encode_record(key)?;

        let result: TransactionResult<(), ()> =
            (&self.dids, &self.public_keys).transaction(|(dids, keys)| {
                dids.insert(user_id.as_bytes(), did_bytes.as_slice())?;
                keys.insert(user_id.as_bytes(), key_bytes.as_slice())?;
                Ok(())
            });

        result.map_err(|e| match e {
            TransactionError::Abort(()) => {
                StoreError::Unavailable("identity write aborted".to_string())
            }
            TransactionError::Storage(e) => StoreError::Sled(e),
        })?;

        self.db.flush()?;
        Ok(())
    }

    /// Delete a user from both trees. Returns whether anything was removed.
    pub fn remove_identity(&self, user_id: &str) -> StoreResult<bool> {
        let did = self.dids.remove(user_id.as_bytes())?.is_some();
        let key = self.public_keys.remove(user_id.as_bytes())?.is_some();
        Ok(did || key)
    }

    /// Copy both JSON tables into the database.
    ///
    /// Each table is imported as-is: a user present in only one file stays
    /// half-provisioned here too.
    pub fn import_json(&self, source: &JsonFileStore) -> StoreResult<ImportSummary> {
        let dids = source.load_did_table()?;
        let keys = source.load_key_table()?;

        for (user_id, did) in &dids {
            self.dids.insert(user_id.as_bytes(), encode_record(did)?)?;
        }
        for (user_id, key) in &keys {
            self.public_keys
                .insert(user_id.as_bytes(), encode_record(key)?)?;
        }
        self.db.flush()?;

        let summary = ImportSummary {
            dids: dids.len(),
            public_keys: keys.len(),
        };
        tracing::info!(
            dids = summary.dids,
            public_keys = summary.public_keys,
            "imported JSON identity tables"
        );
        Ok(summary)
    }

    // -- Utility ------------------------------------------------------------

    /// Number of users in the `dids` tree.
    pub fn identity_count(&self) -> usize {
        self.dids.len()
    }

    /// Flush pending writes to disk.
    pub fn flush(&self) -> StoreResult<()> {
        self.db.flush()?;
        Ok(())
    }
}

fn encode_record<T: serde::Serialize>(record: &T) -> StoreResult<Vec<u8>> {
    bincode::serialize(record).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn decode_record<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> StoreResult<T> {
    bincode::deserialize(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
}

impl IdentityStore for IdentityDb {
    fn find_did(&self, user_id: &str) -> StoreResult<Option<Did>> {
        match self.dids.get(user_id.as_bytes())? {
            Some(bytes) => Ok(Some(decode_record(&bytes)?)),
            None => Ok(None),
        }
    }

    fn find_public_key(&self, user_id: &str) -> StoreResult<Option<PublicKeyPem>> {
        match self.public_keys.get(user_id.as_bytes())? {
            Some(bytes) => Ok(Some(decode_record(&bytes)?)),
            None => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_DID_STORE_FILE, DEFAULT_KEY_STORE_FILE};

    fn did(c: char) -> Did {
        Did::parse(&c.to_string().repeat(64)).unwrap()
    }

    #[test]
    fn open_temporary_database() {
        let db = IdentityDb::open_temporary().expect("should create temp db");
        assert_eq!(db.identity_count(), 0);
        assert!(db.find_did("alice").unwrap().is_none());
    }

    #[test]
    fn put_and_find_identity() {
        let db = IdentityDb::open_temporary().unwrap();
        db.put_identity("alice", &did('a'), &PublicKeyPem::new("pem-a"))
            .unwrap();

        assert_eq!(db.identity_count(), 1);
        assert_eq!(db.find_did("alice").unwrap(), Some(did('a')));
        assert_eq!(
            db.find_public_key("alice").unwrap(),
            Some(PublicKeyPem::new("pem-a"))
        );
    }

    #[test]
    fn identities_survive_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        {
            let db = IdentityDb::open(dir.path()).unwrap();
            db.put_identity("alice", &did('a'), &PublicKeyPem::new("pem-a"))
                .unwrap();
        }
        let db = IdentityDb::open(dir.path()).expect("should reopen db");
        assert_eq!(db.find_did("alice").unwrap(), Some(did('a')));
    }

    #[test]
    fn remove_identity() {
        let db = IdentityDb::open_temporary().unwrap();
        db.put_identity("alice", &did('a'), &PublicKeyPem::new("pem-a"))
            .unwrap();
        assert!(db.remove_identity("alice").unwrap());
        assert!(!db.remove_identity("alice").unwrap());
        assert!(db.find_public_key("alice").unwrap().is_none());
    }

    #[test]
    fn corrupt_record_is_a_serialization_error() {
        let db = IdentityDb::open_temporary().unwrap();
        // A bincode string whose body is not a valid DID.
        let bytes = bincode::serialize("short").unwrap();
        db.dids.insert("mallory", bytes).unwrap();
        assert!(matches!(
            db.find_did("mallory"),
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn import_from_json_tables() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_DID_STORE_FILE),
            serde_json::json!({ "alice": "a".repeat(64), "bob": "b".repeat(64) }).to_string(),
        )
        .unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_KEY_STORE_FILE),
            serde_json::json!({ "alice": "pem-a" }).to_string(),
        )
        .unwrap();

        let db = IdentityDb::open_temporary().unwrap();
        let summary = db.import_json(&JsonFileStore::in_dir(dir.path())).unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                dids: 2,
                public_keys: 1
            }
        );
        assert_eq!(db.find_did("bob").unwrap(), Some(did('b')));
        assert!(db.find_public_key("bob").unwrap().is_none());
    }

    #[test]
    fn import_propagates_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let db = IdentityDb::open_temporary().unwrap();
        assert!(matches!(
            db.import_json(&JsonFileStore::in_dir(dir.path())),
            Err(StoreError::Unavailable(_))
        ));
    }
}
