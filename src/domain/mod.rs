//! Domain layer - business entities and their persistence.

pub mod message;
