//! Storage domain - durable client-local key-value state

mod repository;

pub use repository::{KeyValueStore, KeyValueStoreExt};

#[cfg(test)]
pub use repository::mock;

/// Key of the persisted product collection
pub const PRODUCT_STORE_KEY: &str = "product-store";

/// Key of the persisted daily categorization usage
pub const DAILY_USAGE_KEY: &str = "gemini_daily_usage";

/// Key of the persisted time of the last categorization attempt
pub const LAST_ATTEMPT_KEY: &str = "last_categorization_attempt";
