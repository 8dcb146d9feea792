//! Database connectivity for the workspace.
//!
//! Wraps SeaORM's PostgreSQL pool with environment-driven configuration,
//! an idempotent schema bootstrap and a readiness probe.
//!
//! ```ignore
//! use database::postgres::{self, PostgresConfig};
//! use core_config::FromEnv;
//!
//! let config = PostgresConfig::from_env()?;
//! let db = postgres::connect_from_config(config).await?;
//! postgres::apply_schema(&db, "users", &[CREATE_USERS_TABLE]).await?;
//! postgres::check_health(&db).await?;
//! ```

pub mod common;
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
