use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::AppState;
use crate::error::AppError;
use crate::postgres::SchemaStatus;

/// Readiness gate for routes that need the `messages` table.
///
/// Answers 503 until the schema initializer reports `Ready`, unless
/// `server.gate_until_ready` is disabled.
pub async fn require_schema_ready(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !state.settings.server.gate_until_ready {
        return next.run(req).await;
    }

    let status = state.schema_status();
    let message = match status {
        SchemaStatus::Ready => return next.run(req).await,
        SchemaStatus::Pending => "Database is initializing",
        SchemaStatus::Failed => "Database initialization failed",
    };

    tracing::debug!(
        schema_status = status.as_str(),
        path = %req.uri().path(),
        "Request held back by readiness gate"
    );
    AppError::Unavailable(message.to_string()).into_response()
}
