//! Cache infrastructure - Categorization response cache

mod response_cache;

pub use response_cache::{
    ResponseCache, DEFAULT_CACHE_TTL_SECS, DEFAULT_MAX_CAPACITY, MAX_RECOMMENDED_ENTRIES,
};
