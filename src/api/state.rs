//! Application state for shared services

use std::sync::Arc;

use crate::domain::Clock;
use crate::infrastructure::quota::IpRateLimiter;
use crate::infrastructure::services::CategorizationService;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub categorization: Arc<CategorizationService>,
    pub ip_limiter: Arc<IpRateLimiter>,
    pub clock: Arc<dyn Clock>,
    api_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(
        categorization: Arc<CategorizationService>,
        ip_limiter: Arc<IpRateLimiter>,
        clock: Arc<dyn Clock>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            categorization,
            ip_limiter,
            clock,
            api_key: api_key.filter(|k| !k.is_empty()).map(Arc::from),
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("categorization", &self.categorization)
            .field("has_api_key", &self.api_key.is_some())
            .finish()
    }
}
