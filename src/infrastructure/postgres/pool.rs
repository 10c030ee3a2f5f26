//! PostgreSQL connection pool built from environment-derived settings.

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use thiserror::Error;

use crate::config::DatabaseConfig;

/// Errors that can occur while building the PostgreSQL pool.
#[derive(Debug, Error)]
pub enum PostgresPoolError {
    #[error("Invalid database URL: {0}")]
    InvalidUrl(#[source] sqlx::Error),
}

/// PostgreSQL connection pool.
///
/// Connections are opened on demand, so construction never touches the
/// network; unreachable hosts or bad credentials show up on first use.
#[derive(Clone)]
pub struct PostgresPool {
    /// The underlying connection pool
    pool: PgPool,

    /// Where the pool points (for logging purposes, password masked)
    target: String,
}

impl PostgresPool {
    /// Create a new PostgreSQL pool from configuration.
    pub fn new(config: &DatabaseConfig) -> Result<Self, PostgresPoolError> {
        let (options, target) = connect_options(config)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.pool_size)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect_lazy_with(options);

        tracing::info!(
            pool_size = config.pool_size,
            target = %target,
            "PostgreSQL connection pool created"
        );

        Ok(Self { pool, target })
    }

    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Connection target with the password masked.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Close the pool gracefully.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("PostgreSQL connection pool closed");
    }
}

/// Resolve connection options from either the URL or the discrete fields.
fn connect_options(
    config: &DatabaseConfig,
) -> Result<(PgConnectOptions, String), PostgresPoolError> {
    match &config.url {
        Some(url) => {
            // Managed hosts hand out self-signed certificates: encrypt, but
            // skip chain verification.
            let options = PgConnectOptions::from_str(url)
                .map_err(PostgresPoolError::InvalidUrl)?
                .ssl_mode(PgSslMode::Require);
            Ok((options, mask_url(url)))
        }
        None => {
            let options = PgConnectOptions::new()
                .host(&config.host)
                .port(config.port)
                .username(&config.user)
                .password(&config.password)
                .database(&config.name);
            let target = format!(
                "postgres://{}:***@{}:{}/{}",
                config.user, config.host, config.port, config.name
            );
            Ok((options, target))
        }
    }
}

/// Mask the password in a connection URL for safe logging.
pub fn mask_url(url: &str) -> String {
    if let Some(at_pos) = url.rfind('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            // Skip the scheme separator in "postgres://host@..."
            if !url[colon_pos..].starts_with("://") {
                let prefix = &url[..colon_pos + 1];
                let suffix = &url[at_pos..];
                return format!("{}***{}", prefix, suffix);
            }
        }
    }
    url.to_string()
}
