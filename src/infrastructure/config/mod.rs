mod settings;

pub use settings::{
    CorsConfig, DatabaseConfig, OtelConfig, SchemaConfig, ServerConfig, Settings,
};
