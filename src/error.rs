//! Error types for the annotation server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::epub::SourceError;
use crate::html::AnnotateError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Book error: {0}")]
    Source(#[from] SourceError),

    #[error("Annotation error: {0}")]
    Annotate(#[from] AnnotateError),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Source(e) => {
                tracing::error!("Book error: {}", e);
                match e {
                    SourceError::ChapterNotFound(index) => (
                        StatusCode::NOT_FOUND,
                        "not_found",
                        format!("Chapter not found: {}", index),
                    ),
                    _ => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "book_error",
                        "Failed to read book".to_string(),
                    ),
                }
            }
            AppError::Annotate(e) => {
                tracing::error!("Annotation error: {}", e);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "annotation_error",
                    e.to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        });

        (status, body).into_response()
    }
}
