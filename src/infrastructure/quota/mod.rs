//! Quota infrastructure - daily usage tracker and per-IP rate limiter

mod ip_limiter;
mod tracker;

pub use ip_limiter::{IpQuota, IpRateLimiter, DEFAULT_MIN_INTERVAL_SECS};
pub use tracker::QuotaTracker;
