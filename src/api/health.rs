//! Storage liveness endpoint.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::error::client_database_message;
use crate::server::AppState;

use super::timestamp_now;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.messages.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                success: true,
                database: "connected".to_string(),
                timestamp: Some(timestamp_now()),
                error: None,
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    success: false,
                    database: "disconnected".to_string(),
                    timestamp: None,
                    error: Some(client_database_message(&e)),
                }),
            )
        }
    }
}
