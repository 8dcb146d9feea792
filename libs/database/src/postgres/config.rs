use sea_orm::ConnectOptions;
use std::time::Duration;
use tracing::log::LevelFilter;

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_or_default, env_parse_or_default};

/// PostgreSQL connection and pool configuration
///
/// The connection target is described either by the discrete `host`/`port`/
/// `user`/`password`/`database`/`ssl_mode` fields or by a full `url`, which wins
/// when present.
///
/// ```ignore
/// use database::postgres::PostgresConfig;
///
/// let config = PostgresConfig::from_env()?;
/// let options = config.into_connect_options();
/// ```
#[derive(Clone, Debug)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Value of the `sslmode` query parameter
    pub ssl_mode: String,

    /// Full connection URL overriding the discrete fields
    pub url: Option<String>,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// How long a caller waits for a free pooled connection, in seconds
    pub acquire_timeout_secs: u64,

    /// Connection idle timeout in seconds
    pub idle_timeout_secs: u64,

    /// Connection max lifetime in seconds
    pub max_lifetime_secs: u64,

    /// Enable SQL statement logging
    pub sqlx_logging: bool,

    /// SQL logging level
    pub sqlx_logging_level: LevelFilter,
}

impl PostgresConfig {
    /// Config pointing at a full connection URL, default pool settings
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Same as [`PostgresConfig::new`] with explicit pool bounds
    pub fn with_pool_size(url: impl Into<String>, max_connections: u32, min_connections: u32) -> Self {
        Self {
            max_connections,
            min_connections,
            ..Self::new(url)
        }
    }

    /// Connection URL used to open the pool.
    ///
    /// Credentials are percent-encoded when assembled from the discrete fields.
    pub fn url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!(
                "postgres://{}:{}@{}:{}/{}?sslmode={}",
                urlencoding::encode(&self.user),
                urlencoding::encode(&self.password),
                self.host,
                self.port,
                self.database,
                self.ssl_mode
            ),
        }
    }

    /// Connection URL with the password masked, safe for logs
    pub fn redacted_url(&self) -> String {
        let url = self.url();
        let Some((scheme, rest)) = url.split_once("://") else {
            return url;
        };
        let Some((credentials, host)) = rest.rsplit_once('@') else {
            return url;
        };
        match credentials.split_once(':') {
            Some((user, _)) => format!("{scheme}://{user}:***@{host}"),
            None => url,
        }
    }

    /// Convert this config into SeaORM ConnectOptions
    pub fn into_connect_options(self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(self.url());
        opt.max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(self.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(self.max_lifetime_secs))
            .sqlx_logging(self.sqlx_logging)
            .sqlx_logging_level(self.sqlx_logging_level);
        opt
    }
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            database: "userdb".to_string(),
            ssl_mode: "disable".to_string(),
            url: None,
            max_connections: 25,
            min_connections: 5,
            connect_timeout_secs: 8,
            acquire_timeout_secs: 8,
            idle_timeout_secs: 300,
            max_lifetime_secs: 300,
            sqlx_logging: true,
            sqlx_logging_level: LevelFilter::Debug,
        }
    }
}

/// Load PostgresConfig from environment variables
///
/// - `DB_HOST` (default: localhost), `DB_PORT` (5432), `DB_USER` (postgres),
///   `DB_PASSWORD` (postgres), `DB_NAME` (userdb), `DB_SSLMODE` (disable)
/// - `DATABASE_URL` (optional) - full connection string, overrides the above
/// - `DB_MAX_CONNECTIONS` (25), `DB_MIN_CONNECTIONS` (5)
/// - `DB_CONNECT_TIMEOUT_SECS` (8), `DB_ACQUIRE_TIMEOUT_SECS` (8)
/// - `DB_IDLE_TIMEOUT_SECS` (300), `DB_MAX_LIFETIME_SECS` (300)
/// - `DB_SQLX_LOGGING` (true)
#[cfg(feature = "config")]
impl FromEnv for PostgresConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let url = match env_or_default("DATABASE_URL", "") {
            url if url.is_empty() => None,
            url => Some(url),
        };

        Ok(Self {
            host: env_or_default("DB_HOST", &defaults.host),
            port: env_parse_or_default("DB_PORT", defaults.port)?,
            user: env_or_default("DB_USER", &defaults.user),
            password: env_or_default("DB_PASSWORD", &defaults.password),
            database: env_or_default("DB_NAME", &defaults.database),
            ssl_mode: env_or_default("DB_SSLMODE", &defaults.ssl_mode),
            url,
            max_connections: env_parse_or_default("DB_MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: env_parse_or_default("DB_MIN_CONNECTIONS", defaults.min_connections)?,
            connect_timeout_secs: env_parse_or_default(
                "DB_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            )?,
            acquire_timeout_secs: env_parse_or_default(
                "DB_ACQUIRE_TIMEOUT_SECS",
                defaults.acquire_timeout_secs,
            )?,
            idle_timeout_secs: env_parse_or_default("DB_IDLE_TIMEOUT_SECS", defaults.idle_timeout_secs)?,
            max_lifetime_secs: env_parse_or_default("DB_MAX_LIFETIME_SECS", defaults.max_lifetime_secs)?,
            sqlx_logging: env_parse_or_default("DB_SQLX_LOGGING", defaults.sqlx_logging)?,
            sqlx_logging_level: defaults.sqlx_logging_level,
        })
    }
}
