//! Categorization error taxonomy

use thiserror::Error;

/// Malformed categorization input, correctable by the user
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestValidationError {
    #[error("Máximo {max} productos por categorización")]
    TooManyProducts { max: usize, actual: usize },

    #[error("Algunos productos tienen nombres inválidos")]
    InvalidNames { invalid: usize },

    #[error("Demasiados productos. Máximo {max_products} por categorización.")]
    TokenBudgetExceeded {
        estimated_tokens: usize,
        max_products: usize,
    },
}

/// Why a categorization did not produce model output
///
/// Display strings are user-facing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategorizationError {
    #[error(transparent)]
    Validation(#[from] RequestValidationError),

    #[error("Límite diario alcanzado ({limit} categorizaciones)")]
    DailyLimitReached { limit: u32 },

    #[error("Demasiadas solicitudes. Espera {window_secs} segundos.")]
    TooManyRequests {
        window_secs: u64,
        retry_after_secs: u64,
    },

    #[error("API key no configurada")]
    MissingCredential,

    #[error("Timeout: La categorización tardó demasiado")]
    Timeout,

    #[error("Error al categorizar productos: {0}")]
    Upstream(String),

    #[error("Respuesta del modelo inválida: {0}")]
    MalformedResponse(String),
}

/// Coarse classification used for status mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    QuotaExceeded,
    UpstreamTimeout,
    UpstreamFailure,
}

impl CategorizationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::DailyLimitReached { .. } | Self::TooManyRequests { .. } => {
                ErrorKind::QuotaExceeded
            }
            Self::Timeout => ErrorKind::UpstreamTimeout,
            Self::MissingCredential | Self::Upstream(_) | Self::MalformedResponse(_) => {
                ErrorKind::UpstreamFailure
            }
        }
    }

    /// Whether the user should be told about this error
    ///
    /// Upstream failures are operator concerns and stay in the logs.
    pub fn is_user_facing(&self) -> bool {
        matches!(self.kind(), ErrorKind::Validation | ErrorKind::QuotaExceeded)
    }
}
