//! JSON response envelope.
//!
//! Every endpoint responds with `{success, data?}` or
//! `{success, message?}`; error bodies are produced by
//! [`crate::error::AppError`] in the same shape.

use serde::Serialize;

/// Successful response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Envelope carrying a payload.
    #[must_use]
    pub const fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// Envelope carrying only a confirmation message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }

    /// Envelope carrying both a payload and a confirmation message.
    #[must_use]
    pub fn data_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }
}
