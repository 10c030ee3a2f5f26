use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Unavailable(String),
}

/// Body shared by every failed request: `{"success": false, "error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Check if running in production mode (based on RUN_MODE env var)
pub fn is_production() -> bool {
    std::env::var("RUN_MODE")
        .map(|m| m == "production" || m == "prod")
        .unwrap_or(false)
}

/// Message returned to clients for a storage failure.
///
/// Outside production the driver message is passed through untouched.
pub fn client_database_message(err: &sqlx::Error) -> String {
    if is_production() {
        "Database error".to_string()
    } else {
        database_error_message(err)
    }
}

/// Driver error text without sqlx's wrapping prefixes.
pub fn database_error_message(err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db) => db.message().to_string(),
        sqlx::Error::Io(io) => io.to_string(),
        other => other.to_string(),
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let client_message = match &self {
            AppError::Validation(msg) => {
                tracing::debug!(message = %msg, "Rejected request");
                msg.clone()
            }
            AppError::Unavailable(msg) => {
                tracing::debug!(message = %msg, "Service not ready");
                msg.clone()
            }
            AppError::Database(e) => {
                tracing::error!(
                    status = %status.as_u16(),
                    error = %e,
                    "Database error"
                );
                client_database_message(e)
            }
        };

        (status, Json(ErrorResponse::new(client_message))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
