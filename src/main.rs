use std::sync::Arc;

use anyhow::{bail, Result};
use tokio::net::TcpListener;
use tokio::sync::watch;

use message_board_service::config::Settings;
use message_board_service::domain::message::MessageStore;
use message_board_service::postgres::{
    PostgresPool, RetryPolicy, SchemaInitializer, SchemaStatus,
};
use message_board_service::server::{create_app, AppState};
use message_board_service::shutdown::shutdown_signal;
use message_board_service::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::new()?;

    // Initialize tracing
    let _telemetry = init_telemetry(&settings.otel)?;
    tracing::info!("Configuration loaded");

    // Connections are opened lazily; nothing touches the network yet
    let pool = PostgresPool::new(&settings.database)?;

    tracing::info!(target_db = %pool.target(), "Database pool ready");

    let messages = MessageStore::new(pool.pool().clone());

    let initializer = SchemaInitializer::new(
        Arc::new(messages.clone()),
        RetryPolicy::from(&settings.schema),
    );
    let schema_status = initializer.subscribe();

    // Create application state
    let state = AppState::new(settings.clone(), messages, initializer.subscribe());

    // Create Axum app
    let app = create_app(state);

    // Bind first so the port is open while the schema is prepared
    let addr = settings.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Backend starting on port {}...", settings.server.port);

    // Initialize schema in background
    tokio::spawn(async move {
        match initializer.run().await {
            Ok(()) => {
                tracing::info!("Backend running successfully!");
                tracing::info!("PostgreSQL database connected and initialized");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to start backend");
            }
        }
    });

    // Run server until a signal arrives or initialization gives up
    axum::serve(listener, app)
        .with_graceful_shutdown(stop_signal(schema_status.clone()))
        .await?;

    pool.close().await;

    if *schema_status.borrow() == SchemaStatus::Failed {
        bail!("Database initialization failed");
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn stop_signal(status: watch::Receiver<SchemaStatus>) {
    tokio::select! {
        _ = shutdown_signal() => {}
        _ = schema_failed(status) => {
            tracing::error!("Stopping server after failed database initialization");
        }
    }
}

/// Resolve only if the schema initializer reports `Failed`.
async fn schema_failed(mut status: watch::Receiver<SchemaStatus>) {
    let failed = status
        .wait_for(|s| *s == SchemaStatus::Failed)
        .await
        .is_ok();
    if !failed {
        // Initializer finished without failing
        std::future::pending::<()>().await;
    }
}
