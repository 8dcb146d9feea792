//! PostgreSQL connector and utilities
//!
//! Provides pool configuration, connection management, schema bootstrap and
//! a `SELECT 1` health probe.

mod config;
mod connector;
mod health;
mod schema;

pub use config::PostgresConfig;
pub use connector::{close, connect, connect_from_config, connect_with_options};
pub use health::check_health;
pub use schema::apply_schema;

// Re-export SeaORM types for convenience
pub use sea_orm::{ConnectOptions, DatabaseConnection, DbErr};
