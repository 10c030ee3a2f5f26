use axum::{
    http::{header, HeaderMap},
    Json,
};
use serde::Serialize;

use super::timestamp_now;

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub message: String,
    pub timestamp: String,
    pub client: String,
    pub success: bool,
}

/// Static greeting echoing the caller's declared origin.
pub async fn info(headers: HeaderMap) -> Json<InfoResponse> {
    let client = headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or("unknown");

    Json(InfoResponse {
        message: "Hello from Backend with PostgreSQL!".to_string(),
        timestamp: timestamp_now(),
        client: client.to_string(),
        success: true,
    })
}
