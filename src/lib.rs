//! EasyTotal
//!
//! Shopping list calculator core with LLM-backed supermarket categorization:
//! - Persisted product list with a running total
//! - Gemini categorization behind request limits, a daily quota and a cache
//! - Shareable summary messages, grouped by category or plain
//! - An HTTP variant of the categorizer with per-IP rate limiting

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::state::AppState;
use domain::{Clock, DomainError, KeyValueStore, LlmProvider, SystemClock};
use infrastructure::cache::ResponseCache;
use infrastructure::llm::{GeminiProvider, HttpClient};
use infrastructure::quota::{IpRateLimiter, QuotaTracker};
use infrastructure::services::{CategorizationService, ShareService};
use infrastructure::storage::InMemoryKeyValueStore;

/// Gemini provider for the configured key, if any
pub fn create_llm_provider(config: &AppConfig) -> Result<Option<Arc<dyn LlmProvider>>, DomainError> {
    let Some(api_key) = config.gemini.api_key() else {
        info!("No Gemini API key configured; categorization will fall back");
        return Ok(None);
    };

    // Transport backstop a little past the categorization deadline
    let client = HttpClient::with_timeout(
        config.gemini.request_timeout() + std::time::Duration::from_secs(5),
    )?;
    let provider = GeminiProvider::with_base_url(client, api_key, &config.gemini.base_url);

    Ok(Some(Arc::new(provider)))
}

/// Categorization service with its quota tracker on `store`
pub fn create_categorization_service(
    config: &AppConfig,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
) -> Result<Arc<CategorizationService>, DomainError> {
    let provider = create_llm_provider(config)?;

    let quota = Arc::new(QuotaTracker::with_limit(
        store,
        clock.clone(),
        config.limits.daily_limit,
    ));
    let cache = Arc::new(
        ResponseCache::with_ttl(clock, config.limits.cache_ttl())
            .with_max_recommended(config.limits.cache_max_recommended),
    );

    let service = CategorizationService::new(provider, quota, cache)
        .with_model(config.gemini.model.clone())
        .with_limits(config.limits.categorization_limits())
        .with_timeout(config.gemini.request_timeout());

    Ok(Arc::new(service))
}

/// Share coordinator over a categorization service; attempts are recorded in `store`
pub fn create_share_service(
    config: &AppConfig,
    categorization: Arc<CategorizationService>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
) -> ShareService {
    ShareService::with_interval(
        categorization,
        store,
        clock,
        config.limits.attempt_interval(),
    )
}

/// Application state for the HTTP server
///
/// The server tracks callers by IP; its local daily usage lives in memory
/// and only feeds the status endpoint.
pub fn create_app_state_with_config(config: &AppConfig) -> Result<AppState, DomainError> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());

    let categorization = create_categorization_service(config, store, clock.clone())?;
    let ip_limiter = Arc::new(IpRateLimiter::with_limits(
        clock.clone(),
        config.limits.attempt_interval(),
        config.limits.daily_limit,
    ));

    info!(
        model = %config.gemini.model,
        has_api_key = categorization.is_available(),
        "Application state initialized"
    );

    Ok(AppState::new(
        categorization,
        ip_limiter,
        clock,
        config.gemini.api_key().map(str::to_string),
    ))
}
