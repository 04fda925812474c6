//! Session cache trait.

use async_trait::async_trait;

use crate::error::SessionStoreError;
use crate::models::AuthRecord;

/// Single named slot holding the last known [`AuthRecord`].
///
/// The slot is read, written and cleared as a unit. Only the access gate
/// mutates it.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Return the stored record, or `None` when the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStoreError`] if the backing storage cannot be read
    /// or holds an undecodable record. Absence is never an error.
    async fn read(&self) -> Result<Option<AuthRecord>, SessionStoreError>;

    /// Replace any stored record with `record`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStoreError`] if the record cannot be persisted.
    async fn write(&self, record: &AuthRecord) -> Result<(), SessionStoreError>;

    /// Remove the stored record. Succeeds when the slot is already empty.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStoreError`] if the backing storage cannot be modified.
    async fn clear(&self) -> Result<(), SessionStoreError>;
}
