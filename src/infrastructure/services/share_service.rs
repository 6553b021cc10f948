//! Share coordinator - turns the list into a shareable message
//!
//! Guards the categorized path with a minimum interval between attempts and
//! refuses overlapping attempts, so a double submission neither spends quota
//! twice nor races the quota read-then-increment. The last attempt time is
//! persisted so the interval holds across processes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::storage::{KeyValueStoreExt, LAST_ATTEMPT_KEY};
use crate::domain::summary::{format_categorized_message, format_plain_message};
use crate::domain::{Clock, ErrorKind, KeyValueStore, Product};

use super::categorization_service::CategorizationService;

/// Default minimum gap between categorization attempts
pub const DEFAULT_ATTEMPT_INTERVAL_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareError {
    #[error("Espera {retry_after_secs} segundos antes de volver a categorizar")]
    Throttled { retry_after_secs: u64 },

    #[error("Ya hay una categorización en curso")]
    InFlight,
}

/// A rendered message and an optional note for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedMessage {
    pub message: String,
    pub notice: Option<String>,
}

/// Held while a categorization attempt runs; releases the flag on drop
struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    fn try_acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag: flag.clone() })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[derive(Debug)]
pub struct ShareService {
    categorization: Arc<CategorizationService>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    min_interval: Duration,
    in_flight: Arc<AtomicBool>,
}

impl ShareService {
    pub fn new(
        categorization: Arc<CategorizationService>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_interval(
            categorization,
            store,
            clock,
            std::time::Duration::from_secs(DEFAULT_ATTEMPT_INTERVAL_SECS),
        )
    }

    pub fn with_interval(
        categorization: Arc<CategorizationService>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        min_interval: std::time::Duration,
    ) -> Self {
        Self {
            categorization,
            store,
            clock,
            min_interval: Duration::from_std(min_interval)
                .unwrap_or_else(|_| Duration::seconds(DEFAULT_ATTEMPT_INTERVAL_SECS as i64)),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Unreadable state counts as no previous attempt
    async fn last_attempt(&self) -> Option<DateTime<Utc>> {
        let stored: Result<Option<DateTime<Utc>>, _> = self.store.get(LAST_ATTEMPT_KEY).await;
        match stored {
            Ok(last) => last,
            Err(e) => {
                warn!(error = %e, "Failed to read last categorization attempt");
                None
            }
        }
    }

    /// Callers hold the in-flight guard, so the read and write below do not
    /// interleave with another attempt in this process
    async fn start_attempt(&self) -> Result<(), ShareError> {
        let now = self.clock.now();

        if let Some(previous) = self.last_attempt().await {
            let elapsed = now.signed_duration_since(previous);
            if elapsed < self.min_interval {
                let remaining = self.min_interval - elapsed;
                let retry_after_secs = ((remaining.num_milliseconds() + 999) / 1000).max(1) as u64;
                return Err(ShareError::Throttled { retry_after_secs });
            }
        }

        if let Err(e) = self.store.set(LAST_ATTEMPT_KEY, &now).await {
            warn!(error = %e, "Failed to persist categorization attempt");
        }
        Ok(())
    }

    /// Categorize `products` and render the grouped message
    ///
    /// Quota, validation and timeout refusals still produce a message
    /// (everything in the fallback category) and carry the reason in
    /// `notice`.
    pub async fn share_categorized(
        &self,
        products: &[Product],
        date: NaiveDate,
    ) -> Result<SharedMessage, ShareError> {
        let _guard = InFlightGuard::try_acquire(&self.in_flight).ok_or(ShareError::InFlight)?;
        self.start_attempt().await?;

        let outcome = self.categorization.categorize(products).await;
        debug!(source = ?outcome.source, "Categorization finished for sharing");

        let notice = outcome
            .error()
            .filter(|e| e.is_user_facing() || e.kind() == ErrorKind::UpstreamTimeout)
            .map(|e| e.to_string());

        Ok(SharedMessage {
            message: format_categorized_message(products, &outcome.items, date),
            notice,
        })
    }

    /// Render the ungrouped message; never throttled
    pub fn share_plain(&self, products: &[Product], date: NaiveDate) -> String {
        format_plain_message(products, date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::mock::ManualClock;
    use crate::domain::llm::mock::MockLlmProvider;
    use crate::domain::storage::mock::MockKeyValueStore;
    use crate::domain::storage::DAILY_USAGE_KEY;
    use crate::domain::{LlmProvider, ProductDraft, ProductId};
    use crate::infrastructure::cache::ResponseCache;
    use crate::infrastructure::quota::QuotaTracker;

    const RESPONSE: &str = r#"{"categorizedProducts":[{"name":"leche","category":"Lácteos"},{"name":"pan","category":"Panadería"}]}"#;

    fn service_with(provider: MockLlmProvider, store: MockKeyValueStore) -> (Arc<ManualClock>, ShareService) {
        let clock = Arc::new(ManualClock::at(2026, 10, 18, 12, 0));
        let store: Arc<dyn KeyValueStore> = Arc::new(store);
        let quota = Arc::new(QuotaTracker::new(store.clone(), clock.clone()));
        let cache = Arc::new(ResponseCache::new(clock.clone()));
        let categorization = Arc::new(CategorizationService::new(
            Some(Arc::new(provider) as Arc<dyn LlmProvider>),
            quota,
            cache,
        ));
        (clock.clone(), ShareService::new(categorization, store, clock))
    }

    fn service(provider: MockLlmProvider) -> (Arc<ManualClock>, ShareService) {
        service_with(provider, MockKeyValueStore::new())
    }

    fn list() -> Vec<Product> {
        vec![
            Product::from_draft(ProductId::new(1), ProductDraft::new("Leche", 100.0, 2).unwrap()),
            Product::from_draft(ProductId::new(2), ProductDraft::new("Pan", 50.0, 1).unwrap()),
        ]
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[tokio::test]
    async fn test_share_categorized() {
        let (_, share) = service(MockLlmProvider::new("mock").with_text(RESPONSE));

        let shared = share.share_categorized(&list(), date()).await.unwrap();

        assert!(shared.message.contains("📁 Lácteos - $200\n"));
        assert!(shared.message.contains("📁 Panadería - $50\n"));
        assert!(shared.message.ends_with("💰 Total General: $250"));
        assert!(shared.notice.is_none());
        assert!(!share.is_in_flight());
    }

    #[tokio::test]
    async fn test_attempts_are_throttled() {
        let (clock, share) = service(MockLlmProvider::new("mock").with_text(RESPONSE));

        share.share_categorized(&list(), date()).await.unwrap();

        clock.advance(Duration::seconds(3));
        assert_eq!(
            share.share_categorized(&list(), date()).await,
            Err(ShareError::Throttled { retry_after_secs: 7 })
        );

        clock.advance(Duration::seconds(7));
        assert!(share.share_categorized(&list(), date()).await.is_ok());
    }

    #[tokio::test]
    async fn test_throttle_survives_new_service() {
        let clock = Arc::new(ManualClock::at(2026, 10, 18, 12, 0));
        let store: Arc<dyn KeyValueStore> = Arc::new(MockKeyValueStore::new());

        let open = || {
            let quota = Arc::new(QuotaTracker::new(store.clone(), clock.clone()));
            let cache = Arc::new(ResponseCache::new(clock.clone()));
            let provider = MockLlmProvider::new("mock").with_text(RESPONSE);
            let categorization = Arc::new(CategorizationService::new(
                Some(Arc::new(provider) as Arc<dyn LlmProvider>),
                quota,
                cache,
            ));
            ShareService::new(categorization, store.clone(), clock.clone())
        };

        open().share_categorized(&list(), date()).await.unwrap();

        clock.advance(Duration::seconds(4));
        assert_eq!(
            open().share_categorized(&list(), date()).await,
            Err(ShareError::Throttled { retry_after_secs: 6 })
        );
    }

    #[tokio::test]
    async fn test_unreadable_attempt_state_does_not_block() {
        let store = MockKeyValueStore::new().with_read_error("disk gone");
        let (_, share) = service_with(MockLlmProvider::new("mock").with_text(RESPONSE), store);

        assert!(share.share_categorized(&list(), date()).await.is_ok());
    }

    #[tokio::test]
    async fn test_failed_attempt_still_counts_for_throttle() {
        let (clock, share) = service(MockLlmProvider::new("mock").with_error("boom"));

        let shared = share.share_categorized(&list(), date()).await.unwrap();
        assert!(shared.message.contains("📁 Otros - $250"));
        // Upstream failures stay out of the user notice
        assert!(shared.notice.is_none());

        clock.advance(Duration::seconds(1));
        assert!(matches!(
            share.share_categorized(&list(), date()).await,
            Err(ShareError::Throttled { .. })
        ));
    }

    #[tokio::test]
    async fn test_quota_notice() {
        let store = MockKeyValueStore::new()
            .with_raw(DAILY_USAGE_KEY, r#"{"count":15,"date":"2026-10-18"}"#);
        let (_, share) = service_with(MockLlmProvider::new("mock").with_text(RESPONSE), store);

        let shared = share.share_categorized(&list(), date()).await.unwrap();

        assert_eq!(
            shared.notice.as_deref(),
            Some("Límite diario alcanzado (15 categorizaciones)")
        );
        assert!(shared.message.contains("📁 Otros"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_notice() {
        let provider = MockLlmProvider::new("mock")
            .with_text(RESPONSE)
            .with_delay(std::time::Duration::from_secs(31));
        let (_, share) = service(provider);

        let shared = share.share_categorized(&list(), date()).await.unwrap();

        assert_eq!(
            shared.notice.as_deref(),
            Some("Timeout: La categorización tardó demasiado")
        );
        assert!(shared.message.contains("📁 Otros - $250"));
    }

    #[tokio::test]
    async fn test_overlapping_attempt_refused() {
        let (_, share) = service(MockLlmProvider::new("mock").with_text(RESPONSE));

        let guard = InFlightGuard::try_acquire(&share.in_flight).unwrap();
        assert_eq!(
            share.share_categorized(&list(), date()).await,
            Err(ShareError::InFlight)
        );

        drop(guard);
        assert!(share.share_categorized(&list(), date()).await.is_ok());
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let flag = Arc::new(AtomicBool::new(false));

        let guard = InFlightGuard::try_acquire(&flag).unwrap();
        assert!(InFlightGuard::try_acquire(&flag).is_none());

        drop(guard);
        assert!(InFlightGuard::try_acquire(&flag).is_some());
    }

    #[tokio::test]
    async fn test_share_plain_not_throttled() {
        let (_, share) = service(MockLlmProvider::new("mock").with_text(RESPONSE));
        share.share_categorized(&list(), date()).await.unwrap();

        let message = share.share_plain(&list(), date());
        assert!(message.starts_with("Lista de productos - 18/10/2026\n\n• Leche x 2 - $200.00\n"));
    }
}
