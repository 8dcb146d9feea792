//! Shared application state, built once in `main` and handed to the routers.

use crate::config::Config;
use database::postgres::DatabaseConnection;

/// Process-wide dependencies. Cloning is cheap: the connection is a pool handle.
#[derive(Clone)]
pub struct AppState {
    /// Configuration loaded from environment variables
    pub config: Config,
    /// PostgreSQL connection pool
    pub db: DatabaseConnection,
}
