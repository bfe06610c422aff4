//! Geogate error types

use serde::Serialize;

use crate::types::RateLimitStatus;

/// Geogate error types
#[derive(Debug, thiserror::Error)]
pub enum GeogateError {
    // Admission control
    /// The client exhausted its per-second budget.
    ///
    /// `remaining` is always 0 when denied; `reset_at` is a Unix timestamp
    /// (seconds) one second in the future, matching per-second refill.
    #[error("rate limit exceeded ({limit} requests per second)")]
    RateLimited {
        limit: u32,
        remaining: u32,
        reset_at: u64,
    },

    // Request validation
    #[error("{message}")]
    InvalidInput {
        code: &'static str,
        message: String,
    },

    // Provider errors
    #[error("{0} provider not configured")]
    ProviderNotConfigured(&'static str),

    #[error("{provider} error: {message}")]
    Provider { provider: String, message: String },

    #[error("no results found for {0}")]
    NoResults(String),

    // Cache write path
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cache store error: {0}")]
    Storage(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl GeogateError {
    /// Invalid or missing free-text/structured address.
    pub fn invalid_address(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            code: "INVALID_ADDRESS",
            message: message.into(),
        }
    }

    /// Invalid or missing IP literal.
    pub fn invalid_ip(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            code: "INVALID_IP",
            message: message.into(),
        }
    }

    /// Non-finite or out-of-range coordinates.
    pub fn invalid_coordinates(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            code: "INVALID_COORDINATES",
            message: message.into(),
        }
    }

    /// Machine-readable error code for client-facing responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::RateLimited { .. } => "RATE_LIMIT_EXCEEDED",
            Self::InvalidInput { code, .. } => *code,
            Self::ProviderNotConfigured(_) | Self::Provider { .. } | Self::NoResults(_) => {
                "EXTERNAL_API_ERROR"
            }
            Self::Json(_) | Self::Storage(_) => "CACHE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    /// HTTP status a host application should answer with.
    pub fn status(&self) -> u16 {
        match self {
            Self::RateLimited { .. } => 429,
            Self::InvalidInput { .. } => 400,
            Self::ProviderNotConfigured(_) => 503,
            Self::Provider { .. } | Self::NoResults(_) => 502,
            Self::Json(_) | Self::Storage(_) | Self::Configuration(_) => 500,
        }
    }

    /// Whether this error came from the admission check.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Budget facts of a denial, for `X-RateLimit-*` headers on a 429.
    pub fn rate_limit_status(&self) -> Option<RateLimitStatus> {
        match self {
            Self::RateLimited {
                limit,
                remaining,
                reset_at,
            } => Some(RateLimitStatus {
                limit: *limit,
                remaining: *remaining,
                reset_at: *reset_at,
            }),
            _ => None,
        }
    }
}

/// Serializable error envelope: `{"error": {"code": ..., "message": ...}}`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

impl From<&GeogateError> for ErrorBody {
    fn from(err: &GeogateError) -> Self {
        Self {
            error: ErrorDetail {
                code: err.code(),
                message: err.to_string(),
            },
        }
    }
}

/// Result type alias for Geogate operations
pub type Result<T> = std::result::Result<T, GeogateError>;
