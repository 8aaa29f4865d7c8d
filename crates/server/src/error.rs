//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`; the response body always carries the
//! `{success: false, ...}` envelope.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// A single field-level validation failure.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    /// The offending request field, in wire (camelCase) form.
    pub field: &'static str,
    /// Human-readable description of the violation.
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub const fn new(field: &'static str, message: String) -> Self {
        Self { field, message }
    }
}

/// Application-level error type for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// One or more request fields failed validation.
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Caller is authenticated but not permitted (policy or quota).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found (or outside the caller's tenant).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate resource.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => Self::NotFound("Resource not found".to_owned()),
            RepositoryError::Conflict(message) => Self::Conflict(message),
            other => Self::Database(other),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        Self::Database(RepositoryError::Database(e))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials
                | AuthError::TokenExpired
                | AuthError::TokenInvalid(_) => StatusCode::UNAUTHORIZED,
                AuthError::TenantNotAccessible => StatusCode::FORBIDDEN,
                AuthError::Crypto(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Field errors keep their structure; everything else is a message.
        // Internal details are never exposed to clients.
        let body = match &self {
            Self::Validation(errors) => json!({ "success": false, "errors": errors }),
            Self::Database(_) | Self::Internal(_) | Self::Auth(AuthError::Crypto(_)) => {
                json!({ "success": false, "message": "Server error" })
            }
            Self::Auth(err) => json!({ "success": false, "message": err.client_message() }),
            Self::BadRequest(message)
            | Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::Conflict(message) => json!({ "success": false, "message": message }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
