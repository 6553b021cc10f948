//! HTTP request and response types

pub mod categorize;
pub mod error;
pub mod json;

pub use categorize::{CategorizeRequest, CategorizeResponse, RequestedProduct};
pub use error::{ApiError, ApiErrorResponse, INTERNAL_ERROR_MESSAGE, INVALID_PRODUCTS_MESSAGE};
pub use json::Json;
