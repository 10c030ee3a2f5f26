use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub schema: SchemaConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub otel: OtelConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Answer 503 on message routes until the schema is initialized
    #[serde(default = "default_gate_until_ready")]
    pub gate_until_ready: bool,
}

/// Connection settings for PostgreSQL.
///
/// When `url` is set it wins over the discrete fields and the connection
/// is encrypted without certificate verification.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    #[serde(default = "default_db_user")]
    pub user: String,
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_name")]
    pub name: String,
    #[serde(default = "default_db_password")]
    pub password: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchemaConfig {
    /// Total initialization attempts before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Fixed delay between attempts in seconds
    #[serde(default = "default_retry_delay")]
    pub retry_delay_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtelConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_otel_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_gate_until_ready() -> bool {
    true
}

fn default_db_user() -> String {
    "postgres".to_string()
}

fn default_db_host() -> String {
    "db".to_string()
}

fn default_db_name() -> String {
    "mydb".to_string()
}

fn default_db_password() -> String {
    "password".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_pool_size() -> u32 {
    10
}

fn default_acquire_timeout() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    5
}

fn default_retry_delay() -> u64 {
    5
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:8080".to_string(),
        "http://127.0.0.1:8080".to_string(),
        "https://anisbaa.github.io".to_string(),
    ]
}

fn default_otel_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "message-board-service".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

/// Flat variables understood by deployments that predate the `APP_` namespace.
/// They take precedence over every other source. The flag marks port values.
const LEGACY_ENV_OVERRIDES: &[(&str, &str, bool)] = &[
    ("PORT", "server.port", true),
    ("DATABASE_URL", "database.url", false),
    ("DB_USER", "database.user", false),
    ("DB_HOST", "database.host", false),
    ("DB_NAME", "database.name", false),
    ("DB_PASSWORD", "database.password", false),
    ("DB_PORT", "database.port", true),
];

/// Value of a legacy variable, or `None` to fall through to lower layers.
///
/// Empty values count as unset, and so do port values that are not a valid
/// port number.
fn legacy_value(raw: Option<String>, is_port: bool) -> Option<String> {
    raw.filter(|v| !v.is_empty())
        .filter(|v| !is_port || v.trim().parse::<u16>().is_ok())
        .map(|v| if is_port { v.trim().to_string() } else { v })
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // APP_SERVER__HOST, APP_DATABASE__POOL_SIZE, APP_CORS__ALLOWED_ORIGINS, ...
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins"),
            );

        for (var, key, is_port) in LEGACY_ENV_OVERRIDES {
            builder = builder.set_override_option(*key, legacy_value(env::var(var).ok(), *is_port))?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            gate_until_ready: default_gate_until_ready(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            user: default_db_user(),
            host: default_db_host(),
            name: default_db_name(),
            password: default_db_password(),
            port: default_db_port(),
            pool_size: default_pool_size(),
            acquire_timeout_seconds: default_acquire_timeout(),
        }
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_delay_seconds: default_retry_delay(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl Default for OtelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_otel_endpoint(),
            service_name: default_service_name(),
            sampling_ratio: default_sampling_ratio(),
        }
    }
}
