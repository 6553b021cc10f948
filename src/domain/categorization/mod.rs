//! Categorization domain - taxonomy, request limits, prompt and response parsing

mod entity;
mod error;
mod gate;
mod limits;
mod parser;
mod prompt;
mod status;

pub use entity::{
    cache_key, fallback_items, normalize_name, CategorizationOutcome, CategorizedItem,
    OutcomeSource, CATEGORY_TAXONOMY, FALLBACK_CATEGORY,
};
pub use error::{CategorizationError, ErrorKind, RequestValidationError};
pub use gate::QuotaGate;
pub use limits::{
    CategorizationLimits, BASE_PROMPT_TOKENS, ESTIMATED_TOKENS_PER_PRODUCT,
    MAX_PRODUCTS_PER_REQUEST, MAX_TOKENS_PER_REQUEST,
};
pub use parser::{parse_categorization_response, strip_code_fences};
pub use prompt::build_categorization_prompt;
pub use status::{CacheSummary, DailyLimitSummary, LimitsSummary, SystemStatus};

#[cfg(test)]
pub use gate::mock;
