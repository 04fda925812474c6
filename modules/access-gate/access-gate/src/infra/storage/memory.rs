//! In-process session store.

use access_gate_sdk::{AuthRecord, SessionStore, SessionStoreError};
use async_trait::async_trait;
use parking_lot::Mutex;

/// Session slot kept in memory. Never fails.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<AuthRecord>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `record`.
    #[must_use]
    pub fn with_record(record: AuthRecord) -> Self {
        Self {
            slot: Mutex::new(Some(record)),
        }
    }

    /// Snapshot of the slot without going through the async trait.
    #[must_use]
    pub fn snapshot(&self) -> Option<AuthRecord> {
        self.slot.lock().clone()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn read(&self) -> Result<Option<AuthRecord>, SessionStoreError> {
        Ok(self.slot.lock().clone())
    }

    async fn write(&self, record: &AuthRecord) -> Result<(), SessionStoreError> {
        *self.slot.lock() = Some(record.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionStoreError> {
        *self.slot.lock() = None;
        Ok(())
    }
}
