//! Persisted daily categorization quota
//!
//! The count belongs to a calendar day and resets when the stored day
//! differs from today. Storage failures read as zero usage so a broken
//! store never locks the user out.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::storage::{KeyValueStoreExt, DAILY_USAGE_KEY};
use crate::domain::{
    CategorizationError, Clock, DailyLimitStatus, DomainError, KeyValueStore, QuotaGate,
    UsageRecord, DAILY_LIMIT,
};

#[derive(Debug)]
pub struct QuotaTracker {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    limit: u32,
}

impl QuotaTracker {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_limit(store, clock, DAILY_LIMIT)
    }

    pub fn with_limit(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, limit: u32) -> Self {
        Self {
            store,
            clock,
            limit,
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    async fn read_usage(&self) -> Result<UsageRecord, DomainError> {
        let today = self.clock.today();
        let stored: Option<UsageRecord> = self.store.get(DAILY_USAGE_KEY).await?;

        Ok(stored
            .map(|record| record.as_of(today))
            .unwrap_or_else(|| UsageRecord::fresh(today)))
    }

    /// Today's usage, treating unreadable storage as no usage
    pub async fn current_usage(&self) -> UsageRecord {
        match self.read_usage().await {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Failed to read daily usage, assuming none");
                UsageRecord::fresh(self.clock.today())
            }
        }
    }

    /// Whether another categorization may run today. Never writes.
    pub async fn check_daily_limit(&self) -> DailyLimitStatus {
        let usage = self.current_usage().await;
        DailyLimitStatus::from_usage(usage.count, self.limit)
    }

    /// Count one successful categorization and persist the result
    pub async fn increment(&self) -> Result<UsageRecord, DomainError> {
        let record = self.current_usage().await.incremented();
        self.store.set(DAILY_USAGE_KEY, &record).await?;

        debug!(count = record.count, date = %record.date, "Daily usage incremented");
        Ok(record)
    }
}

#[async_trait]
impl QuotaGate for QuotaTracker {
    async fn check(&self) -> Result<(), CategorizationError> {
        let status = self.check_daily_limit().await;
        if status.allowed {
            Ok(())
        } else {
            Err(CategorizationError::DailyLimitReached { limit: status.limit })
        }
    }

    async fn record_success(&self) {
        if let Err(e) = self.increment().await {
            warn!(error = %e, "Failed to persist daily usage");
        }
    }
}
