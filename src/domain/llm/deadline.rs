//! Deadline-bounded provider calls

use std::time::Duration;

use super::{LlmProvider, LlmRequest, LlmResponse};
use crate::domain::DomainError;

/// Result of a provider call raced against a deadline
#[derive(Debug)]
pub enum CallOutcome {
    Success(LlmResponse),
    Timeout,
    Failure(DomainError),
}

/// Call `provider` and give up once `deadline` has elapsed.
///
/// On timeout the in-flight request future is dropped; whatever it would
/// have produced is never observed.
pub async fn generate_with_deadline(
    provider: &dyn LlmProvider,
    model: &str,
    request: LlmRequest,
    deadline: Duration,
) -> CallOutcome {
    match tokio::time::timeout(deadline, provider.generate(model, request)).await {
        Ok(Ok(response)) => CallOutcome::Success(response),
        Ok(Err(e)) => CallOutcome::Failure(e),
        Err(_) => CallOutcome::Timeout,
    }
}
