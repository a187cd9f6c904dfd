//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use parley_core::llm::LlmError;
use parley_core::store::StoreError;
use thiserror::Error;

use crate::models::ErrorResponse;

/// Message returned when the provider rate-limits us.
pub const RATE_LIMITED_MESSAGE: &str =
    "Too Many Requests: Groq API Limit Exceeded. Please try again later.";

/// Message returned for any other provider failure.
pub const UPSTREAM_FAILED_MESSAGE: &str = "Failed to generate response from AI";

/// Message returned when a chat is missing or owned by someone else.
pub const CHAT_NOT_FOUND_MESSAGE: &str = "Chat not found or unauthorized";

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited by model provider")]
    RateLimited,

    #[error("Model provider failed: {0}")]
    Upstream(String),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Ownership mismatch and missing chat are indistinguishable to callers.
    pub fn chat_not_found() -> Self {
        AppError::NotFound(CHAT_NOT_FOUND_MESSAGE.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.as_str()),
            AppError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                RATE_LIMITED_MESSAGE,
            ),
            AppError::Upstream(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "upstream_error",
                UPSTREAM_FAILED_MESSAGE,
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error",
            ),
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::ChatNotFound(_) => AppError::chat_not_found(),
            StoreError::Db(sqlx::Error::RowNotFound) => AppError::chat_not_found(),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::RateLimited => AppError::RateLimited,
            other => AppError::Upstream(other.to_string()),
        }
    }
}
