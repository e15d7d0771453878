//! Snapshot store: embedded key-value persistence
//!
//! Each collection is serialized as one JSON array (settings: one JSON
//! object) under a stable key. The engine writes a snapshot after every
//! in-memory commit; writes are fire-and-forget from the caller's point
//! of view and load errors degrade to "no data" so a corrupt value falls
//! back to the seed dataset instead of failing startup.

use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::AppResult;

pub const USERS_KEY: &str = "users";
pub const EQUIPMENT_KEY: &str = "equipment";
pub const APPROVALS_KEY: &str = "approvals";
pub const EVENTS_KEY: &str = "events";
pub const SETTINGS_KEY: &str = "settings";

/// Handle to the embedded store
#[derive(Clone)]
pub struct SnapshotStore {
    db: sled::Db,
}

impl SnapshotStore {
    /// Open (or create) the store at `path`
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Open a store backed by a temporary in-memory tree (tests)
    pub fn ephemeral() -> AppResult<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }

    /// Persist `value` under `key`, replacing any previous snapshot
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> AppResult<()> {
        let bytes = serde_json::to_vec(value)?;
        self.db.insert(key, bytes)?;
        self.db.flush()?;
        Ok(())
    }

    /// Load the snapshot under `key`.
    ///
    /// Returns `None` when the key is absent *or* the stored bytes do not
    /// deserialize; callers treat both as "seed me".
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = match self.db.get(key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("snapshot read failed for key {key}: {e}");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("corrupt snapshot under key {key}, falling back to seed: {e}");
                None
            }
        }
    }
}
