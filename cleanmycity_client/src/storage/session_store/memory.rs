use async_trait::async_trait;
use std::collections::HashMap;

use crate::storage::errors::StorageError;

use super::types::{InMemorySessionStore, SessionStore};

impl InMemorySessionStore {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory session store");
        Self {
            entry: HashMap::new(),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn init(&self) -> Result<(), StorageError> {
        Ok(()) // Nothing to initialize for in-memory store
    }

    async fn put(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entry.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entry.get(key).cloned())
    }

    async fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entry.remove(key);
        Ok(())
    }
}
