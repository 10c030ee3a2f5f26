//! Background schema initialization with bounded retries.
//!
//! The initializer moves through `Pending -> Ready | Failed`, publishing each
//! transition on a watch channel so request handlers can tell whether the
//! `messages` table is usable yet.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

use crate::error::database_error_message;

use super::RetryPolicy;

/// One full attempt at preparing storage: create the table, then seed it.
#[async_trait]
pub trait SchemaBootstrap: Send + Sync {
    async fn bootstrap(&self) -> Result<(), sqlx::Error>;
}

/// Lifecycle of the schema as observed by the rest of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStatus {
    Pending,
    Ready,
    Failed,
}

impl SchemaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaStatus::Pending => "pending",
            SchemaStatus::Ready => "ready",
            SchemaStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Failed to initialize database after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: String },
}

pub struct SchemaInitializer {
    bootstrap: Arc<dyn SchemaBootstrap>,
    policy: RetryPolicy,
    status: watch::Sender<SchemaStatus>,
}

impl SchemaInitializer {
    pub fn new(bootstrap: Arc<dyn SchemaBootstrap>, policy: RetryPolicy) -> Self {
        let (status, _) = watch::channel(SchemaStatus::Pending);
        Self {
            bootstrap,
            policy,
            status,
        }
    }

    /// Receiver that observes status transitions.
    pub fn subscribe(&self) -> watch::Receiver<SchemaStatus> {
        self.status.subscribe()
    }

    /// Run the bootstrap until it succeeds or the policy is exhausted.
    ///
    /// Every failure is followed by the policy delay, including the last one.
    #[tracing::instrument(name = "schema_init", skip(self), fields(max_attempts = self.policy.max_attempts))]
    pub async fn run(&self) -> Result<(), SchemaError> {
        let mut countdown = self.policy.countdown();
        let mut last_error = String::from("no attempt was made");

        while countdown.has_attempts() {
            match self.bootstrap.bootstrap().await {
                Ok(()) => {
                    self.status.send_replace(SchemaStatus::Ready);
                    tracing::info!("Database initialized successfully");
                    return Ok(());
                }
                Err(e) => {
                    last_error = database_error_message(&e);
                    tracing::warn!(
                        retries_left = countdown.remaining(),
                        error = %last_error,
                        "Database initialization error"
                    );
                    let delay = countdown.record_failure();
                    tokio::time::sleep(delay).await;
                }
            }
        }

        self.status.send_replace(SchemaStatus::Failed);
        Err(SchemaError::Exhausted {
            attempts: self.policy.max_attempts,
            last_error,
        })
    }
}
