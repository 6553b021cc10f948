//! Infrastructure services

mod categorization_service;
mod list_service;
mod share_service;

pub use categorization_service::{CategorizationService, DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT};
pub use list_service::ListStore;
pub use share_service::{ShareError, ShareService, SharedMessage, DEFAULT_ATTEMPT_INTERVAL_SECS};
