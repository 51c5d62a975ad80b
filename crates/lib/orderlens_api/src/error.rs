//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use orderlens_core::tabular::TabularError;
use thiserror::Error;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Conversion failed: {0}")]
    Conversion(String),

    #[error("Chat pipeline failed: {0}")]
    Pipeline(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::InvalidFileFormat(m) => {
                (StatusCode::BAD_REQUEST, "invalid_file_format", m.as_str())
            }
            AppError::FileNotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.as_str()),
            AppError::Conversion(m) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "conversion_error", m.as_str())
            }
            AppError::Pipeline(m) => (StatusCode::INTERNAL_SERVER_ERROR, "chat_error", m.as_str()),
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

impl From<TabularError> for AppError {
    fn from(e: TabularError) -> Self {
        match e {
            TabularError::NotFound(_) => AppError::FileNotFound("File not found".into()),
            other => AppError::Conversion(format!("An error occurred: {other}")),
        }
    }
}
