use core_config::{ConfigError, FromEnv, server::ServerConfig};
use database::postgres::PostgresConfig;

pub use core_config::Environment;

/// Application configuration composed from the shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
}

impl FromEnv for Config {
    fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // DB_* / DATABASE_URL, all defaulted
        let server = ServerConfig::from_env()?; // HOST=0.0.0.0, PORT=8080

        Ok(Self {
            database,
            server,
            environment,
        })
    }
}
