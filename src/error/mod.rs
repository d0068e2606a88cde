use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::post::PostError;
use crate::subscriber::SubscriberError;
use crate::template::TemplateError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<TemplateError> for AppError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::NotFound(_) => AppError::NotFound(err.to_string()),
            TemplateError::AlreadyExists(_) => AppError::Conflict(err.to_string()),
            TemplateError::InvalidId(_) | TemplateError::InvalidTemplate(_) => {
                AppError::Validation(err.to_string())
            }
        }
    }
}

impl From<PostError> for AppError {
    fn from(err: PostError) -> Self {
        match err {
            PostError::NotFound(_) | PostError::VersionNotFound { .. } => {
                AppError::NotFound(err.to_string())
            }
            PostError::SlugTaken(_) => AppError::Conflict(err.to_string()),
            PostError::Validation(msg) => AppError::Validation(msg),
            PostError::Postgres(e) => AppError::Database(e),
            PostError::Serialization(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<SubscriberError> for AppError {
    fn from(err: SubscriberError) -> Self {
        match err {
            SubscriberError::NotFound(_) => AppError::NotFound(err.to_string()),
            SubscriberError::Validation(msg) => AppError::Validation(msg),
            SubscriberError::Postgres(e) => AppError::Database(e),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Check if running in production mode (based on RUN_MODE env var)
fn is_production() -> bool {
    std::env::var("RUN_MODE")
        .map(|m| m == "production" || m == "prod")
        .unwrap_or(false)
}

/// Client-facing text for an internal failure; the detail only leaves the
/// process outside production.
fn redact(detail: &str, generic: &str) -> String {
    if is_production() {
        generic.to_string()
    } else {
        detail.to_string()
    }
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            AppError::Auth(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            AppError::Database(_) => (StatusCode::SERVICE_UNAVAILABLE, "DATABASE_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let (client_message, log_message) = match &self {
            AppError::Config(e) => {
                let detail = e.to_string();
                (redact(&detail, "Configuration error"), detail)
            }
            AppError::Internal(e) => (redact(e, "Internal server error"), e.clone()),
            AppError::Database(e) => {
                let detail = e.to_string();
                (redact(&detail, "Storage temporarily unavailable"), detail)
            }
            AppError::Auth(msg)
            | AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => (msg.clone(), msg.clone()),
        };

        // Client errors are routine; only server faults are logged at error level
        if status.is_server_error() {
            tracing::error!(code = %code, status = %status.as_u16(), message = %log_message, "API error");
        } else {
            tracing::debug!(code = %code, status = %status.as_u16(), message = %log_message, "API error");
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: client_message,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
