//! In-memory key-value store

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::storage::KeyValueStore;
use crate::domain::DomainError;

/// Thread-safe in-memory key-value store
///
/// Useful for testing and for the server, which keeps no client state.
/// Data is lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        let entries = self.entries.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(entries.get(key).cloned())
    }

    async fn set_raw(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let mut entries = self.entries.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, DomainError> {
        let mut entries = self.entries.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(entries.remove(key).is_some())
    }
}
