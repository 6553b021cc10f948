//! API error responses
//!
//! Every failure is reported as `{"error": "<message>"}` with the message in
//! the language shown to end users.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::{CategorizationError, ErrorKind};

/// Message returned when the request body is not a product list
pub const INVALID_PRODUCTS_MESSAGE: &str = "Productos inválidos";

/// Message returned for failures the caller cannot fix
pub const INTERNAL_ERROR_MESSAGE: &str = "Error interno del servidor";

/// Error body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
    pub retry_after_secs: Option<u64>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: message.into(),
            },
            retry_after_secs: None,
        }
    }

    /// Advertise when the caller may retry
    pub fn with_retry_after(mut self, secs: u64) -> Self {
        self.retry_after_secs = Some(secs);
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn invalid_products() -> Self {
        Self::bad_request(INVALID_PRODUCTS_MESSAGE)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(StatusCode::REQUEST_TIMEOUT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn message(&self) -> &str {
        &self.response.error
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.response)).into_response();

        if let Some(secs) = self.retry_after_secs {
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }

        response
    }
}

impl From<CategorizationError> for ApiError {
    fn from(err: CategorizationError) -> Self {
        match err.kind() {
            ErrorKind::Validation => Self::bad_request(err.to_string()),
            ErrorKind::QuotaExceeded => {
                let api_err = Self::rate_limited(err.to_string());
                if let CategorizationError::TooManyRequests {
                    retry_after_secs, ..
                } = err
                {
                    api_err.with_retry_after(retry_after_secs)
                } else {
                    api_err
                }
            }
            ErrorKind::UpstreamTimeout => Self::timeout(err.to_string()),
            ErrorKind::UpstreamFailure => {
                if matches!(err, CategorizationError::MissingCredential) {
                    Self::internal(err.to_string())
                } else {
                    error!(error = %err, "Categorization failed");
                    Self::internal(INTERNAL_ERROR_MESSAGE)
                }
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.response.error)
    }
}

impl std::error::Error for ApiError {}
