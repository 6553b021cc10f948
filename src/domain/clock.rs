//! Time source abstraction
//!
//! Cache expiry, daily quota boundaries and product ids all read the time
//! through [`Clock`] so that tests can drive them with a manual clock.

use std::fmt::Debug;

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Source of the current time
pub trait Clock: Send + Sync + Debug {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date in the user's local time zone
    fn today(&self) -> NaiveDate {
        self.now().with_timezone(&Local).date_naive()
    }
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
