/// Errors raised while connecting to, bootstrapping or probing the database
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sea_orm::DbErr),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    /// Schema bootstrap failed; carries the schema name and the cause
    #[error("Schema '{name}' could not be applied: {details}")]
    SchemaFailed { name: String, details: String },
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
