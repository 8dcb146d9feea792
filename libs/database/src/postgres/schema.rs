use sea_orm::{ConnectionTrait, DatabaseConnection};
use tracing::info;

use crate::common::DatabaseError;

/// Apply idempotent DDL statements in order.
///
/// Statements are expected to be re-runnable (`CREATE ... IF NOT EXISTS`), so
/// this is safe to call on every startup. The first failing statement aborts.
pub async fn apply_schema(
    db: &DatabaseConnection,
    name: &str,
    statements: &[&str],
) -> Result<(), DatabaseError> {
    for statement in statements {
        db.execute_unprepared(statement)
            .await
            .map_err(|e| DatabaseError::SchemaFailed {
                name: name.to_string(),
                details: e.to_string(),
            })?;
    }

    info!(schema = name, statements = statements.len(), "Schema applied");
    Ok(())
}
