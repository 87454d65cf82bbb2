//! Server-level error type for handlers outside a feature slice

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::response::ErrorResponse;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, "NOT_FOUND", message),
            AppError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message),
            AppError::Unavailable(message) => {
                tracing::warn!("Service unavailable: {}", message);
                (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE", message)
            },
        };

        ErrorResponse::new(code, message).into_response_with(status)
    }
}

pub type AppResult<T> = Result<T, AppError>;
