//! Infrastructure layer modules
//!
//! This module contains shared infrastructure components:
//! - `config`: Application configuration and settings
//! - `error`: Unified error types
//! - `postgres`: PostgreSQL connection pool and schema initialization

pub mod config;
pub mod error;
pub mod postgres;
