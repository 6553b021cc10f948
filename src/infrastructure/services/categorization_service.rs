//! Categorization service - the request pipeline in front of the model
//!
//! Stages run in a fixed order: credential, quota gate, request limits,
//! cache, prompt, deadline-bounded call, parse. Each stage reports a
//! [`CategorizationError`]; [`CategorizationService::categorize`] maps every
//! error to the fallback result.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::domain::categorization::{
    build_categorization_prompt, cache_key, parse_categorization_response, CacheSummary,
    DailyLimitSummary, ErrorKind, LimitsSummary,
};
use crate::domain::{
    generate_with_deadline, CallOutcome, CategorizationError, CategorizationLimits,
    CategorizationOutcome, LlmProvider, LlmRequest, Product, QuotaGate, SystemStatus,
};
use crate::infrastructure::cache::ResponseCache;
use crate::infrastructure::quota::QuotaTracker;

/// Default model used for categorization
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default deadline for a model call
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug)]
pub struct CategorizationService {
    provider: Option<Arc<dyn LlmProvider>>,
    model: String,
    quota: Arc<QuotaTracker>,
    cache: Arc<ResponseCache>,
    limits: CategorizationLimits,
    timeout: Duration,
}

impl CategorizationService {
    /// A service without a provider always falls back
    pub fn new(
        provider: Option<Arc<dyn LlmProvider>>,
        quota: Arc<QuotaTracker>,
        cache: Arc<ResponseCache>,
    ) -> Self {
        Self {
            provider,
            model: DEFAULT_MODEL.to_string(),
            quota,
            cache,
            limits: CategorizationLimits::default(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_limits(mut self, limits: CategorizationLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    pub fn quota(&self) -> &Arc<QuotaTracker> {
        &self.quota
    }

    pub fn limits(&self) -> &CategorizationLimits {
        &self.limits
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Run the pipeline for `names`, admitting the request through `gate`
    ///
    /// Cache hits skip the model and are not recorded against the gate.
    /// An empty list returns an empty result without any side effects.
    pub async fn try_categorize<S>(
        &self,
        names: &[S],
        gate: &dyn QuotaGate,
    ) -> Result<CategorizationOutcome, CategorizationError>
    where
        S: AsRef<str> + Sync,
    {
        if names.is_empty() {
            return Ok(CategorizationOutcome::empty());
        }

        let provider = self
            .provider
            .as_ref()
            .ok_or(CategorizationError::MissingCredential)?;

        gate.check().await?;
        self.limits.validate(names)?;

        let key = cache_key(names);
        if let Some(items) = self.cache.get(&key).await {
            debug!(products = names.len(), "Using cached categorization");
            return Ok(CategorizationOutcome::cached(items));
        }

        let request = LlmRequest::new(build_categorization_prompt(names));

        let response =
            match generate_with_deadline(provider.as_ref(), &self.model, request, self.timeout)
                .await
            {
                CallOutcome::Success(response) => response,
                CallOutcome::Timeout => return Err(CategorizationError::Timeout),
                CallOutcome::Failure(e) => return Err(CategorizationError::Upstream(e.to_string())),
            };

        let items = parse_categorization_response(&response.text)?;

        self.cache.put(key, items.clone()).await;
        gate.record_success().await;

        info!(
            products = names.len(),
            categorized = items.len(),
            model = %response.model,
            "Products categorized"
        );

        Ok(CategorizationOutcome::model(items))
    }

    /// Categorize `products` against the local daily quota
    ///
    /// Never fails: any error yields every product in the fallback category,
    /// with the cause kept in the outcome source.
    pub async fn categorize(&self, products: &[Product]) -> CategorizationOutcome {
        let names: Vec<&str> = products.iter().map(Product::name).collect();

        match self.try_categorize(&names, self.quota.as_ref()).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log_fallback(&e, names.len());
                CategorizationOutcome::fallback(&names, e)
            }
        }
    }

    /// Read-only snapshot for health reporting
    pub async fn system_status(&self) -> SystemStatus {
        let daily = self.quota.check_daily_limit().await;

        SystemStatus {
            api_key_configured: self.is_available(),
            daily_limit: DailyLimitSummary {
                used: daily.used,
                remaining: daily.remaining,
                total: daily.limit,
            },
            cache: CacheSummary {
                entries: self.cache.len().await,
                max_recommended: self.cache.max_recommended(),
            },
            limits: LimitsSummary {
                max_products_per_request: self.limits.max_products,
                max_tokens_per_request: self.limits.max_tokens,
                request_timeout_seconds: self.timeout.as_secs(),
            },
        }
    }
}

fn log_fallback(e: &CategorizationError, products: usize) {
    match e {
        CategorizationError::MissingCredential => {
            error!("Categorization unavailable: no API key configured")
        }
        _ => match e.kind() {
            ErrorKind::Validation | ErrorKind::QuotaExceeded => {
                info!(error = %e, products, "Categorization refused, using fallback")
            }
            ErrorKind::UpstreamTimeout | ErrorKind::UpstreamFailure => {
                warn!(error = ?e, products, "Categorization failed, using fallback")
            }
        },
    }
}
