//! Per-IP rate limiter for the categorization endpoint
//!
//! Each source IP gets a minimum interval between successful requests and a
//! daily cap counted over a rolling 24 hour window that starts with the
//! first request after the previous window ended.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::{CategorizationError, Clock, QuotaGate, DAILY_LIMIT};

use super::QuotaTracker;

/// Default minimum gap between requests from one IP
pub const DEFAULT_MIN_INTERVAL_SECS: u64 = 10;

#[derive(Debug, Clone)]
struct IpRecord {
    last_request: DateTime<Utc>,
    daily_count: u32,
    window_start: DateTime<Utc>,
}

impl IpRecord {
    fn window_expired(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.window_start) > Duration::hours(24)
    }
}

#[derive(Debug)]
pub struct IpRateLimiter {
    records: RwLock<HashMap<String, IpRecord>>,
    clock: Arc<dyn Clock>,
    min_interval: Duration,
    daily_limit: u32,
    cleanup_interval: Duration,
    last_cleanup: RwLock<DateTime<Utc>>,
}

impl IpRateLimiter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_limits(
            clock,
            std::time::Duration::from_secs(DEFAULT_MIN_INTERVAL_SECS),
            DAILY_LIMIT,
        )
    }

    pub fn with_limits(
        clock: Arc<dyn Clock>,
        min_interval: std::time::Duration,
        daily_limit: u32,
    ) -> Self {
        let now = clock.now();
        Self {
            records: RwLock::new(HashMap::new()),
            clock,
            min_interval: Duration::from_std(min_interval).unwrap_or_else(|_| Duration::seconds(10)),
            daily_limit,
            cleanup_interval: Duration::minutes(5),
            last_cleanup: RwLock::new(now),
        }
    }

    /// Whether `ip` may make a request now. Does not record anything.
    pub async fn check(&self, ip: &str) -> Result<(), CategorizationError> {
        self.maybe_cleanup().await;

        let now = self.clock.now();
        let records = self.records.read().await;
        let Some(record) = records.get(ip) else {
            return Ok(());
        };

        if !record.window_expired(now) && record.daily_count >= self.daily_limit {
            return Err(CategorizationError::DailyLimitReached {
                limit: self.daily_limit,
            });
        }

        let since_last = now.signed_duration_since(record.last_request);
        if since_last < self.min_interval {
            let remaining = self.min_interval - since_last;
            // Round up so a client waiting the advertised time is admitted
            let retry_after_secs = (remaining.num_milliseconds() + 999) / 1000;
            return Err(CategorizationError::TooManyRequests {
                window_secs: self.min_interval.num_seconds() as u64,
                retry_after_secs: retry_after_secs.max(1) as u64,
            });
        }

        Ok(())
    }

    /// Record a successful request from `ip`
    pub async fn record(&self, ip: &str) {
        let now = self.clock.now();
        let mut records = self.records.write().await;

        let record = records.entry(ip.to_string()).or_insert_with(|| IpRecord {
            last_request: now,
            daily_count: 0,
            window_start: now,
        });

        if record.window_expired(now) {
            record.daily_count = 0;
            record.window_start = now;
        }

        record.last_request = now;
        record.daily_count = record.daily_count.saturating_add(1);

        debug!(ip = %ip, daily_count = record.daily_count, "Recorded categorization");
    }

    /// Requests counted for `ip` in its current window
    pub async fn daily_count(&self, ip: &str) -> u32 {
        let now = self.clock.now();
        self.records
            .read()
            .await
            .get(ip)
            .filter(|r| !r.window_expired(now))
            .map(|r| r.daily_count)
            .unwrap_or(0)
    }

    pub async fn tracked_ips(&self) -> usize {
        self.records.read().await.len()
    }

    async fn maybe_cleanup(&self) {
        let now = self.clock.now();
        let should_cleanup = {
            let last = self.last_cleanup.read().await;
            now.signed_duration_since(*last) >= self.cleanup_interval
        };

        if should_cleanup {
            *self.last_cleanup.write().await = now;

            let mut records = self.records.write().await;
            let before = records.len();
            records.retain(|_, r| {
                now.signed_duration_since(r.last_request) <= Duration::hours(24)
            });

            if records.len() != before {
                debug!(removed = before - records.len(), "Swept idle rate limit entries");
            }
        }
    }
}

/// [`QuotaGate`] view of the limiter for a single caller
///
/// Only the IP limits gate a request. An attached usage tracker is counted on
/// success so aggregate usage stays visible.
#[derive(Debug, Clone)]
pub struct IpQuota {
    limiter: Arc<IpRateLimiter>,
    ip: String,
    usage: Option<Arc<QuotaTracker>>,
}

impl IpQuota {
    pub fn new(limiter: Arc<IpRateLimiter>, ip: impl Into<String>) -> Self {
        Self {
            limiter,
            ip: ip.into(),
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: Arc<QuotaTracker>) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn ip(&self) -> &str {
        &self.ip
    }
}

#[async_trait]
impl QuotaGate for IpQuota {
    async fn check(&self) -> Result<(), CategorizationError> {
        self.limiter.check(&self.ip).await
    }

    async fn record_success(&self) {
        self.limiter.record(&self.ip).await;
        if let Some(usage) = &self.usage {
            usage.record_success().await;
        }
    }
}
