//! Message list and create endpoints.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::domain::message::{CreateMessageRequest, Message};
use crate::error::{AppError, Result};
use crate::server::AppState;

/// Successful response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

pub async fn list_messages(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<Message>>>> {
    let messages = state.messages.list().await?;
    Ok(Json(DataResponse::new(messages)))
}

/// Whether the request declares a JSON body (`application/json` or `*+json`).
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// Parse the create body; a non-JSON or empty body reads as `{}`.
fn parse_create_body(headers: &HeaderMap, body: &[u8]) -> Result<CreateMessageRequest> {
    if !is_json_content_type(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(CreateMessageRequest::default());
    }

    let value: Value = serde_json::from_slice(body).map_err(|e| {
        AppError::Validation(format!("Failed to parse the request body as JSON: {}", e))
    })?;
    Ok(CreateMessageRequest::from_body(value))
}

pub async fn create_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<DataResponse<Message>>> {
    let request = parse_create_body(&headers, &body)?;

    let Some(content) = request.content() else {
        return Err(AppError::Validation("Content is required".to_string()));
    };

    let message = state.messages.create(&content).await?;

    tracing::info!(id = message.id, "Message added");

    Ok(Json(
        DataResponse::new(message).with_message("Message added successfully"),
    ))
}
