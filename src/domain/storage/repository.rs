//! Key-value store trait definition

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::domain::DomainError;

/// Durable client-local key-value storage
///
/// Values are JSON strings so the trait stays dyn-compatible.
/// Use [`KeyValueStoreExt`] for typed access.
#[async_trait]
pub trait KeyValueStore: Send + Sync + Debug {
    /// Reads the raw JSON value stored under `key`
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Stores a raw JSON value under `key`, replacing any previous value
    async fn set_raw(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Removes `key`, returning whether it existed
    async fn remove(&self, key: &str) -> Result<bool, DomainError>;
}

/// Extension trait providing typed get/set operations
pub trait KeyValueStoreExt: KeyValueStore {
    /// Reads and deserializes the value stored under `key`
    fn get<'a, V>(
        &'a self,
        key: &'a str,
    ) -> impl std::future::Future<Output = Result<Option<V>, DomainError>> + Send
    where
        V: DeserializeOwned + Send,
    {
        async move {
            match self.get_raw(key).await? {
                Some(data) => {
                    let value: V = serde_json::from_str(&data).map_err(|e| {
                        DomainError::storage(format!(
                            "Failed to deserialize value for '{}': {}",
                            key, e
                        ))
                    })?;
                    Ok(Some(value))
                }
                None => Ok(None),
            }
        }
    }

    /// Serializes and stores `value` under `key`
    fn set<'a, V>(
        &'a self,
        key: &'a str,
        value: &'a V,
    ) -> impl std::future::Future<Output = Result<(), DomainError>> + Send
    where
        V: Serialize + Send + Sync,
    {
        async move {
            let data = serde_json::to_string(value).map_err(|e| {
                DomainError::storage(format!("Failed to serialize value for '{}': {}", key, e))
            })?;
            self.set_raw(key, &data).await
        }
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStoreExt for T {}
