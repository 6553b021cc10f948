use async_trait::async_trait;

use super::error::CategorizationError;

/// Admission check applied before a model call
///
/// The local client gates on the persisted daily count; the server gates
/// per caller IP. `record_success` runs only after a model call succeeded,
/// so cache hits and failures are never counted.
#[async_trait]
pub trait QuotaGate: Send + Sync {
    async fn check(&self) -> Result<(), CategorizationError>;

    async fn record_success(&self);
}
