use axum::{middleware, routing::get, Router};

use crate::server::{require_schema_ready, AppState};

use super::{create_message, health, info, list_messages};

pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        // Liveness & storage health
        .route("/api", get(info))
        .route("/api/health", get(health))
        // Message endpoints, held back until the schema exists
        .merge(
            Router::new()
                .route("/api/messages", get(list_messages).post(create_message))
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_schema_ready,
                )),
        )
}
