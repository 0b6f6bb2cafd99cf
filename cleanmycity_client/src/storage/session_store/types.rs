use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::storage::errors::StorageError;

/// Durable key/value store holding the persisted session credentials.
///
/// Implementations only need independent string keys with last-write-wins
/// updates. Consistency of the session key pair is enforced by the session
/// layer, which performs both writes while holding the store lock.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Initialize the store. This is called when the store is created.
    async fn init(&self) -> Result<(), StorageError>;

    /// Put a value into the store.
    async fn put(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Get a value from the store.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Remove a value from the store. Removing an absent key is not an error.
    async fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Process-local store. Sessions do not survive a restart.
pub struct InMemorySessionStore {
    pub(super) entry: HashMap<String, String>,
}

/// Store backed by a single JSON file, so sessions survive restarts the way
/// browser local storage does.
pub struct FileSessionStore {
    pub(super) path: PathBuf,
}
