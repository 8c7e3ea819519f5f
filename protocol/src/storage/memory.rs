//! In-memory identity tables.
//!
//! Used by tests and by embedders that already hold identities in memory.
//! Writes are allowed so a test can play the enrollment side.

use parking_lot::RwLock;
use std::collections::HashMap;

use super::{IdentityStore, PublicKeyPem, StoreResult};
use crate::identity::Did;

/// Two hash maps behind `parking_lot` read-write locks.
#[derive(Debug, Default)]
pub struct MemoryStore {
    dids: RwLock<HashMap<String, Did>>,
    public_keys: RwLock<HashMap<String, PublicKeyPem>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enroll a complete identity.
    pub fn insert_identity(&self, user_id: impl Into<String>, did: Did, key: PublicKeyPem) {
        let user_id = user_id.into();
        self.dids.write().insert(user_id.clone(), did);
        self.public_keys.write().insert(user_id, key);
    }

    /// Write only the DID table. Leaves the user half-provisioned unless a
    /// key is inserted too.
    pub fn insert_did(&self, user_id: impl Into<String>, did: Did) {
        self.dids.write().insert(user_id.into(), did);
    }

    /// Write only the key table.
    pub fn insert_public_key(&self, user_id: impl Into<String>, key: PublicKeyPem) {
        self.public_keys.write().insert(user_id.into(), key);
    }

    /// Remove a user from both tables. Returns whether anything was removed.
    pub fn remove(&self, user_id: &str) -> bool {
        let did = self.dids.write().remove(user_id).is_some();
        let key = self.public_keys.write().remove(user_id).is_some();
        did || key
    }

    /// Number of users in the DID table.
    pub fn len(&self) -> usize {
        self.dids.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.dids.read().is_empty()
    }
}

impl IdentityStore for MemoryStore {
    fn find_did(&self, user_id: &str) -> StoreResult<Option<Did>> {
        Ok(self.dids.read().get(user_id).cloned())
    }

    fn find_public_key(&self, user_id: &str) -> StoreResult<Option<PublicKeyPem>> {
        Ok(self.public_keys.read().get(user_id).cloned())
    }
}
