use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::storage::errors::StorageError;

use super::types::{FileSessionStore, SessionStore};

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        tracing::info!("Creating file session store at {}", path.display());
        Self { path }
    }

    async fn read_map(&self) -> Result<HashMap<String, String>, StorageError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(map) => Ok(map),
                Err(e) => {
                    // An unreadable store behaves like an empty one; the next
                    // write replaces it.
                    tracing::warn!("Discarding unreadable session file: {}", e);
                    Ok(HashMap::new())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(StorageError::from(e)),
        }
    }

    async fn write_map(&self, map: &HashMap<String, String>) -> Result<(), StorageError> {
        let contents = serde_json::to_string_pretty(map)?;
        // Write-then-rename keeps the file whole if the process dies mid-write.
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, contents).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn init(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    async fn put(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.read_map().await?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self.read_map().await?;
        Ok(map.get(key).cloned())
    }

    async fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut map = self.read_map().await?;
        if map.remove(key).is_some() {
            self.write_map(&map).await?;
        }
        Ok(())
    }
}
