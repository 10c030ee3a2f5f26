//! PostgreSQL persistence module.
//!
//! Provides the connection pool, the fixed-delay retry policy and the
//! schema initializer that runs in the background at startup.

pub mod pool;
pub mod retry;
pub mod schema;

pub use pool::{PostgresPool, PostgresPoolError};
pub use retry::RetryPolicy;
pub use schema::{SchemaBootstrap, SchemaError, SchemaInitializer, SchemaStatus};
