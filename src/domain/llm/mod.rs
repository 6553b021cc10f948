//! LLM provider domain models and traits

mod deadline;
mod provider;
mod request;
mod response;

pub use deadline::{generate_with_deadline, CallOutcome};
pub use provider::LlmProvider;
pub use request::{LlmRequest, LlmRequestBuilder};
pub use response::{FinishReason, LlmResponse, Usage};

#[cfg(test)]
pub use provider::mock;
