//! File-backed session store.
//!
//! The slot is a single JSON file `<dir>/<slot>.json`. Writes go to a temp
//! file in the same directory and are renamed over the slot, so a reader
//! never observes a partially written record.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use access_gate_sdk::{AuthRecord, SessionStore, SessionStoreError};
use async_trait::async_trait;
use tracing::debug;

use crate::config::StorageConfig;

/// Session slot persisted on disk; survives restarts.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
    slot: String,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, slot: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            slot: slot.into(),
        }
    }

    #[must_use]
    pub fn from_config(cfg: &StorageConfig) -> Self {
        Self::new(cfg.resolve_dir(), cfg.slot.clone())
    }

    /// Path of the slot file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.slot))
    }

    /// A slot holding `null` is treated as empty.
    fn decode(&self, bytes: &[u8]) -> Result<Option<AuthRecord>, SessionStoreError> {
        serde_json::from_slice(bytes).map_err(|e| SessionStoreError::Corrupt {
            slot: self.slot.clone(),
            reason: e.to_string(),
        })
    }
}

fn persist(dir: &Path, path: &Path, bytes: &[u8]) -> io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn read(&self) -> Result<Option<AuthRecord>, SessionStoreError> {
        match tokio::fs::read(self.path()).await {
            Ok(bytes) => self.decode(&bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, record: &AuthRecord) -> Result<(), SessionStoreError> {
        let bytes = serde_json::to_vec(record)
            .map_err(|e| SessionStoreError::Serialization(e.to_string()))?;
        let dir = self.dir.clone();
        let path = self.path();
        tokio::task::spawn_blocking(move || persist(&dir, &path, &bytes))
            .await
            .map_err(io::Error::other)??;
        debug!(slot = %self.slot, "Session record written");
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionStoreError> {
        match tokio::fs::remove_file(self.path()).await {
            Ok(()) => {
                debug!(slot = %self.slot, "Session record cleared");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn empty_slot_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path(), "adminUser");
        assert_eq!(store.read().await.unwrap(), None);
    }

    #[tokio::test]
    async fn record_survives_a_new_store_instance() {
        let dir = tempfile::tempdir().unwrap();
        let record = AuthRecord::new(json!({ "name": "Alice", "role": "editor" }));

        FileSessionStore::new(dir.path(), "adminUser")
            .write(&record)
            .await
            .unwrap();

        let reopened = FileSessionStore::new(dir.path(), "adminUser");
        assert_eq!(reopened.read().await.unwrap(), Some(record));
        assert!(reopened.path().ends_with("adminUser.json"));
    }

    #[tokio::test]
    async fn write_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested/state"), "adminUser");
        store
            .write(&AuthRecord::new(json!({ "name": "Alice" })))
            .await
            .unwrap();
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path(), "adminUser");
        store.clear().await.unwrap();

        store
            .write(&AuthRecord::new(json!({ "name": "Alice" })))
            .await
            .unwrap();
        store.clear().await.unwrap();
        store.clear().await.unwrap();
        assert_eq!(store.read().await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_slot_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path(), "adminUser");
        std::fs::write(store.path(), b"{not json").unwrap();

        match store.read().await {
            Err(SessionStoreError::Corrupt { slot, .. }) => assert_eq!(slot, "adminUser"),
            other => panic!("Expected Corrupt, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn null_slot_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path(), "adminUser");
        std::fs::write(store.path(), b"null").unwrap();

        assert_eq!(store.read().await.unwrap(), None);
    }

    #[tokio::test]
    async fn slots_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let admin = FileSessionStore::new(dir.path(), "adminUser");
        let other = FileSessionStore::new(dir.path(), "editorUser");

        admin
            .write(&AuthRecord::new(json!({ "name": "Alice" })))
            .await
            .unwrap();
        assert_eq!(other.read().await.unwrap(), None);
    }
}
