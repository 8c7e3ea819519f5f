//! # JSON File Store
//!
//! Reads the two tables enrollment writes to disk:
//!
//! | File               | Shape                          |
//! |--------------------|--------------------------------|
//! | `did_storage.json` | `{ "<user_id>": "<64 hex>" }`  |
//! | `keys.json`        | `{ "<user_id>": "<PEM text>" }` |
//!
//! Files are read on every lookup. They are small, and it means a lookup
//! racing an enrollment write sees either the old table or the new one,
//! with no cache to invalidate. Opening and closing the files is all this
//! module does with their lifecycle; creating and rewriting them belongs to
//! enrollment.
//!
//! Lookups only type-check the requested user's entry. A bad record hides
//! that one user (bad DID) or fails to parse as a key (bad PEM); it never
//! takes the table down for everyone else. The whole-table loaders used by
//! `convert` and `import` stay strict.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{IdentityStore, PublicKeyPem, StoreError, StoreResult};
use crate::config::{DEFAULT_DID_STORE_FILE, DEFAULT_KEY_STORE_FILE};
use crate::identity::Did;

/// Identity store backed by two JSON files.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    did_path: PathBuf,
    key_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(did_path: impl Into<PathBuf>, key_path: impl Into<PathBuf>) -> Self {
        Self {
            did_path: did_path.into(),
            key_path: key_path.into(),
        }
    }

    /// Both tables under `dir` with their default file names.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(
            dir.join(DEFAULT_DID_STORE_FILE),
            dir.join(DEFAULT_KEY_STORE_FILE),
        )
    }

    pub fn did_path(&self) -> &Path {
        &self.did_path
    }

    pub fn key_path(&self) -> &Path {
        &self.key_path
    }

    /// Load the whole DID table. Every entry must be a valid DID or the
    /// load fails.
    pub fn load_did_table(&self) -> StoreResult<BTreeMap<String, Did>> {
        load_did_file(&self.did_path)
    }

    /// Load the whole key table. Keys are returned as unparsed PEM.
    pub fn load_key_table(&self) -> StoreResult<BTreeMap<String, PublicKeyPem>> {
        read_table(&self.key_path, "key")
    }
}

/// Load a DID table on its own, for tools that have no use for keys.
pub fn load_did_file(path: &Path) -> StoreResult<BTreeMap<String, Did>> {
    read_table(path, "DID")
}

fn read_table<T: DeserializeOwned>(
    path: &Path,
    table: &'static str,
) -> StoreResult<BTreeMap<String, T>> {
    let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => {
            StoreError::Unavailable(format!("{} table not found at {}", table, path.display()))
        }
        _ => StoreError::Unavailable(format!(
            "failed to read {} table at {}: {}",
            table,
            path.display(),
            e
        )),
    })?;

    let parsed: BTreeMap<String, T> =
        serde_json::from_str(&contents).map_err(|e| StoreError::Corrupt {
            table,
            reason: e.to_string(),
        })?;

    tracing::debug!(table, path = %path.display(), entries = parsed.len(), "table loaded");
    Ok(parsed)
}

/// Read a table with untyped values, leaving per-entry checks to the caller.
fn read_entry(path: &Path, table: &'static str, user_id: &str) -> StoreResult<Option<Value>> {
    Ok(read_table::<Value>(path, table)?.remove(user_id))
}

impl IdentityStore for JsonFileStore {
    fn find_did(&self, user_id: &str) -> StoreResult<Option<Did>> {
        let value = match read_entry(&self.did_path, "DID", user_id)? {
            Some(value) => value,
            None => return Ok(None),
        };
        match serde_json::from_value::<Did>(value) {
            Ok(did) => Ok(Some(did)),
            Err(e) => {
                tracing::warn!(user_id, error = %e, "skipping malformed DID record");
                Ok(None)
            }
        }
    }

    fn find_public_key(&self, user_id: &str) -> StoreResult<Option<PublicKeyPem>> {
        // Non-string values are kept as their JSON text and fail PEM parsing.
        Ok(read_entry(&self.key_path, "key", user_id)?.map(|value| match value {
            Value::String(pem) => PublicKeyPem::new(pem),
            other => PublicKeyPem::new(other.to_string()),
        }))
    }
}
