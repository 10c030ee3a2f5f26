mod app;
mod middleware;
mod state;

pub use app::{cors_layer, create_app};
pub use middleware::require_schema_ready;
pub use state::AppState;
