//! Daily usage entities

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Categorizations performed on a given calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub count: u32,
    /// Calendar day the count belongs to, stored as `YYYY-MM-DD`
    pub date: NaiveDate,
}

impl UsageRecord {
    /// An empty record for `date`
    pub fn fresh(date: NaiveDate) -> Self {
        Self { count: 0, date }
    }

    /// The record as seen on `today`: counts from another day do not carry over
    pub fn as_of(self, today: NaiveDate) -> Self {
        if self.date == today {
            self
        } else {
            Self::fresh(today)
        }
    }

    /// The record after one more categorization
    pub fn incremented(self) -> Self {
        Self {
            count: self.count.saturating_add(1),
            date: self.date,
        }
    }
}

/// Answer to "may a categorization request proceed today"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyLimitStatus {
    pub allowed: bool,
    pub remaining: u32,
    pub used: u32,
    pub limit: u32,
}

impl DailyLimitStatus {
    pub fn from_usage(used: u32, limit: u32) -> Self {
        Self {
            allowed: used < limit,
            remaining: limit.saturating_sub(used),
            used,
            limit,
        }
    }
}
