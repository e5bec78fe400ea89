/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>`; service errors convert with
/// `?` and pick up their status code here.
///
/// # Status mapping
///
/// | Service error      | Status |
/// |--------------------|--------|
/// | `Validation`       | 400 (422 on user create/update and team update) |
/// | `Conflict`         | 400    |
/// | `InvalidState`     | 400    |
/// | `NotFound`         | 404    |
/// | `LimitExceeded`    | 404    |
/// | `Export`           | 404    |
/// | `Database`         | 400 for statement errors, 500 otherwise |
///
/// # Example
///
/// ```
/// use taskboard_api::error::{ApiError, ApiResult};
/// use axum::Json;
///
/// async fn handler() -> ApiResult<Json<u32>> {
///     Err(ApiError::NotFound("Board not found".to_string()))
/// }
/// ```

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use taskboard_shared::error::{FieldViolation, ServiceError};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400) - malformed body or rejected statement
    BadRequest(String),

    /// Conflict (400) - duplicate name or immutable field changed
    Conflict(String),

    /// Invalid state (400) - e.g., adding a task to a closed board
    InvalidState(String),

    /// Validation failed (400)
    ValidationError(Vec<FieldViolation>),

    /// Validation failed (422) on endpoints that report it that way
    UnprocessableEntity(Vec<FieldViolation>),

    /// Not found (404)
    NotFound(String),

    /// Batch size cap exceeded (404)
    LimitExceeded(String),

    /// Internal server error (500)
    InternalError(String),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,

    /// Error code (e.g., "conflict", "not_found")
    pub code: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldViolation>>,
}

impl ApiError {
    /// Like `From<ServiceError>`, but reports validation failures as 422
    pub fn unprocessable(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(violations) => ApiError::UnprocessableEntity(violations),
            other => ApiError::from(other),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            ApiError::ValidationError(errors) | ApiError::UnprocessableEntity(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::LimitExceeded(msg) => write!(f, "Limit exceeded: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, "conflict", msg, None),
            ApiError::InvalidState(msg) => (StatusCode::BAD_REQUEST, "invalid_state", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::UnprocessableEntity(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::LimitExceeded(msg) => (StatusCode::NOT_FOUND, "limit_exceeded", msg, None),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        });

        (status, body).into_response()
    }
}

/// Convert service errors to API errors
impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        tracing::debug!(kind = err.kind(), "Request rejected: {}", err);

        match err {
            ServiceError::Validation(violations) => ApiError::ValidationError(violations),
            ServiceError::Conflict(msg) => ApiError::Conflict(msg),
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::InvalidState(msg) => ApiError::InvalidState(msg),
            ServiceError::LimitExceeded(msg) => ApiError::LimitExceeded(msg),
            ServiceError::Export(io_err) => {
                tracing::error!(error = %io_err, "Board export failed");
                ApiError::NotFound("File not found".to_string())
            }
            ServiceError::Database(db_err) => ApiError::from(db_err),
        }
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            // Statement or constraint failures are reported back as-is
            sqlx::Error::Database(db_err) => ApiError::BadRequest(db_err.message().to_string()),
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert JSON body rejections to API errors
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
