//! Error types with HTTP status code mapping.
//!
//! [`GempaError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.
//! Most page-load failures never reach a response: the render pipeline and
//! the mirror store log them and carry on.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 3101,
///     "message": "network error: connection refused",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                |
/// |-----------|-----------------|----------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request            |
/// | 2000–2999 | State/Not Found | 404 Not Found / 409 Conflict |
/// | 3000–3099 | Server          | 500 Internal Server Error  |
/// | 3100–3199 | Upstream        | 502 Bad Gateway            |
/// | 3200–3299 | Worker          | 503 Service Unavailable    |
#[derive(Debug, thiserror::Error)]
pub enum GempaError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Requested record or resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// No deferred install prompt is currently retained.
    #[error("no install prompt pending")]
    NoPendingPrompt,

    /// Outbound HTTP request failed before a response was received.
    #[error("network error: {0}")]
    Network(String),

    /// Upstream payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Install-time precache could not add every asset.
    #[error("precache failed for {path}: {reason}")]
    Precache {
        /// Asset path that failed.
        path: String,
        /// Why it failed.
        reason: String,
    },

    /// The cache worker actor is gone or never started.
    #[error("cache worker unavailable: {0}")]
    WorkerUnavailable(String),

    /// Local mirror store failure.
    #[error("mirror store error: {0}")]
    Mirror(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GempaError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::NotFound(_) => 2001,
            Self::NoPendingPrompt => 2002,
            Self::Internal(_) => 3000,
            Self::Mirror(_) => 3001,
            Self::Network(_) => 3101,
            Self::Decode(_) => 3102,
            Self::Precache { .. } => 3201,
            Self::WorkerUnavailable(_) => 3202,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::NoPendingPrompt => StatusCode::CONFLICT,
            Self::Mirror(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Network(_) | Self::Decode(_) => StatusCode::BAD_GATEWAY,
            Self::Precache { .. } | Self::WorkerUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<reqwest::Error> for GempaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GempaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<sqlx::Error> for GempaError {
    fn from(err: sqlx::Error) -> Self {
        Self::Mirror(err.to_string())
    }
}

impl IntoResponse for GempaError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
