//! API layer - HTTP endpoint handlers organized by resource.

mod health;
mod info;
mod messages;
mod routes;

pub use health::{health, HealthResponse};
pub use info::{info, InfoResponse};
pub use messages::{create_message, list_messages, DataResponse};
pub use routes::api_routes;

/// Current time as an RFC 3339 UTC string with millisecond precision.
pub(crate) fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
