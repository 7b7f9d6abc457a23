//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::service::ServiceError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Service errors
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = match &self {
            AppError::Service(service_err) => match service_err {
                // 400 Bad Request
                ServiceError::InvalidOperation(msg) => {
                    (StatusCode::BAD_REQUEST, "invalid_operation", Some(msg.clone()))
                }

                // 404 Not Found
                ServiceError::AccountNotFound(id) => {
                    (StatusCode::NOT_FOUND, "account_not_found", Some(id.clone()))
                }

                // 422 Unprocessable Entity (business rule, not retryable)
                ServiceError::InsufficientFunds => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "insufficient_funds", None)
                }

                // 503 Service Unavailable (transient, caller may retry)
                ServiceError::Unavailable(cause) => {
                    tracing::error!("Storage unavailable: {:?}", cause);
                    (StatusCode::SERVICE_UNAVAILABLE, "unavailable", None)
                }
            },

            // 500 Internal Server Error
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
            AppError::Config(e) => {
                tracing::error!("Config error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "config_error", None)
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
