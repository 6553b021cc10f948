use async_trait::async_trait;
use std::fmt::Debug;

use super::{LlmRequest, LlmResponse};
use crate::domain::DomainError;

/// Trait for text-generation providers (Gemini, ...)
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Generate text for a single prompt
    async fn generate(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
