//! Categorization response cache
//!
//! Entries expire a fixed time after they are stored. Expiry is checked
//! against the injected clock on lookup; stale entries stay in the cache
//! until overwritten or pushed out by the capacity bound.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::{CategorizedItem, Clock};

/// Default lifetime of a cached categorization
pub const DEFAULT_CACHE_TTL_SECS: u64 = 30 * 60;

/// Entry count above which the cache is reported as oversized
pub const MAX_RECOMMENDED_ENTRIES: usize = 100;

/// Hard bound on stored entries
pub const DEFAULT_MAX_CAPACITY: u64 = 10_000;

#[derive(Debug, Clone)]
struct CacheEntry {
    result: Vec<CategorizedItem>,
    stored_at: DateTime<Utc>,
}

/// Process-local memo of categorization results keyed by normalized names
#[derive(Debug)]
pub struct ResponseCache {
    cache: MokaCache<String, CacheEntry>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    max_recommended: usize,
}

impl ResponseCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(clock, std::time::Duration::from_secs(DEFAULT_CACHE_TTL_SECS))
    }

    pub fn with_ttl(clock: Arc<dyn Clock>, ttl: std::time::Duration) -> Self {
        Self::with_capacity(clock, ttl, DEFAULT_MAX_CAPACITY)
    }

    pub fn with_capacity(clock: Arc<dyn Clock>, ttl: std::time::Duration, max_capacity: u64) -> Self {
        Self {
            cache: MokaCache::builder().max_capacity(max_capacity).build(),
            clock,
            ttl: Duration::from_std(ttl).unwrap_or_else(|_| Duration::days(36_500)),
            max_recommended: MAX_RECOMMENDED_ENTRIES,
        }
    }

    pub fn with_max_recommended(mut self, max_recommended: usize) -> Self {
        self.max_recommended = max_recommended;
        self
    }

    /// Advisory size reported in the system status; not enforced
    pub fn max_recommended(&self) -> usize {
        self.max_recommended
    }

    /// Cached result for `key`, if stored less than the TTL ago
    pub async fn get(&self, key: &str) -> Option<Vec<CategorizedItem>> {
        let entry = self.cache.get(key).await?;

        let age = self.clock.now().signed_duration_since(entry.stored_at);
        if age < self.ttl {
            debug!(key = %key, age_secs = age.num_seconds(), "Response cache hit");
            Some(entry.result)
        } else {
            debug!(key = %key, "Response cache entry expired");
            None
        }
    }

    /// Store `result` under `key`, replacing any previous entry
    pub async fn put(&self, key: impl Into<String>, result: Vec<CategorizedItem>) {
        let entry = CacheEntry {
            result,
            stored_at: self.clock.now(),
        };
        self.cache.insert(key.into(), entry).await;
    }

    /// Number of stored entries, expired ones included
    pub async fn len(&self) -> usize {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count() as usize
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
