//! Usage domain - daily categorization quota bookkeeping

mod record;

pub use record::{DailyLimitStatus, UsageRecord};

/// Successful categorizations allowed per calendar day
pub const DAILY_LIMIT: u32 = 15;
