//! API error type and helpers.
//!
//! # Purpose
//! Keeps every failure response in the `{"error": message}` shape and maps
//! store failures onto HTTP statuses in one place.
//!
//! # Security considerations
//! - Internal errors are logged server-side; clients only see a generic message.
use crate::api::types::ErrorResponse;
use crate::store::StoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Structured API error returned by handlers.
///
/// # Example
/// ```rust
/// use axum::http::StatusCode;
/// use blueprints::api::error::ApiError;
/// use blueprints::api::types::ErrorResponse;
///
/// let err = ApiError {
///     status: StatusCode::NOT_FOUND,
///     body: ErrorResponse {
///         error: "blueprint john/house not found".to_string(),
///     },
/// };
/// assert_eq!(err.status, StatusCode::NOT_FOUND);
/// ```
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: message.into(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

pub fn api_not_found(message: &str) -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, message)
}

/// 403 returned when a create collides with an existing blueprint.
pub fn api_already_exists(message: &str) -> ApiError {
    ApiError::new(StatusCode::FORBIDDEN, message)
}

/// Build a 500 from a store error.
///
/// Logs the store error and returns the caller's generic message.
pub fn api_internal(message: &str, err: &StoreError) -> ApiError {
    tracing::error!(error = ?err, "blueprint storage error");
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, message)
}

pub fn api_internal_message(message: &str) -> ApiError {
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, message)
}

pub fn api_unauthorized(message: &str) -> ApiError {
    ApiError::new(StatusCode::UNAUTHORIZED, message)
}

pub fn api_forbidden(message: &str) -> ApiError {
    ApiError::new(StatusCode::FORBIDDEN, message)
}

pub fn api_validation_error(message: &str) -> ApiError {
    ApiError::new(StatusCode::BAD_REQUEST, message)
}

/// Translate a store failure into the matching HTTP error.
///
/// `NotFound` maps to 404, `AlreadyExists` to 403 and anything else to a
/// logged 500 carrying `context` as its message.
pub fn from_store_error(err: StoreError, context: &str) -> ApiError {
    match &err {
        StoreError::NotFound(_) => api_not_found(&err.to_string()),
        StoreError::AlreadyExists(_) => api_already_exists(&err.to_string()),
        StoreError::Unexpected(_) => api_internal(context, &err),
    }
}
