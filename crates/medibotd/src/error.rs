//! Request-level errors and their HTTP rendering.

use crate::prompts::APOLOGY;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use medibot_common::{ChatResponse, ErrorResponse, LlmError, ResponseStatus};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or unusable input; no downstream call was made
    #[error("{0}")]
    Validation(String),

    /// The request body could not be read (e.g. over the size limit)
    #[error("{message}")]
    Body { status: StatusCode, message: String },

    /// The generation endpoint did not produce an answer
    #[error("Generation unavailable: {0}")]
    GenerationUnavailable(#[from] LlmError),

    /// The exchange store failed
    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Body { status, .. } => *status,
            ApiError::GenerationUnavailable(_) | ApiError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ApiError::Validation(message) | ApiError::Body { message, .. } => (
                status,
                Json(ErrorResponse {
                    error: message,
                    status: None,
                }),
            )
                .into_response(),
            ApiError::GenerationUnavailable(e) => {
                (status, Json(ChatResponse::failure(APOLOGY, e.to_string()))).into_response()
            }
            ApiError::Storage(e) => (
                status,
                Json(ErrorResponse {
                    error: format!("{:#}", e),
                    status: Some(ResponseStatus::Error),
                }),
            )
                .into_response(),
        }
    }
}
