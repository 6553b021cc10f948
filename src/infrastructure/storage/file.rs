//! File-backed key-value store
//!
//! Each key is stored as `<dir>/<key>.json`. Writes go to a temporary file
//! first and are renamed into place so a crash never leaves a torn value.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::storage::KeyValueStore;
use crate::domain::DomainError;

#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, DomainError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if !valid {
            return Err(DomainError::validation(format!("Invalid storage key '{}'", key)));
        }

        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        let path = self.path_for(key)?;

        match tokio::fs::read_to_string(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DomainError::storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn set_raw(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let path = self.path_for(key)?;

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to create {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await.map_err(|e| {
            DomainError::storage(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, &path).await.map_err(|e| {
            DomainError::storage(format!("Failed to replace {}: {}", path.display(), e))
        })?;

        debug!(key = %key, bytes = value.len(), "Persisted value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, DomainError> {
        let path = self.path_for(key)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(DomainError::storage(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
