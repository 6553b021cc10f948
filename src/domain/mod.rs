//! Domain layer - Core business logic and entities

pub mod categorization;
pub mod clock;
pub mod error;
pub mod llm;
pub mod product;
pub mod storage;
pub mod summary;
pub mod usage;

pub use categorization::{
    CategorizationError, CategorizationLimits, CategorizationOutcome, CategorizedItem, ErrorKind,
    OutcomeSource, QuotaGate, RequestValidationError, SystemStatus, FALLBACK_CATEGORY,
};
pub use clock::{Clock, SystemClock};
pub use error::DomainError;
pub use llm::{
    generate_with_deadline, CallOutcome, FinishReason, LlmProvider, LlmRequest, LlmRequestBuilder,
    LlmResponse, Usage,
};
pub use product::{Product, ProductDraft, ProductId, ProductUpdate, ProductValidationError};
pub use storage::{KeyValueStore, KeyValueStoreExt};
pub use usage::{DailyLimitStatus, UsageRecord, DAILY_LIMIT};
