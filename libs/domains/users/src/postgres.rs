use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, FromQueryResult, Statement};

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User};
use crate::repository::UserRepository;

/// Idempotent DDL for the users table, applied at startup.
pub const SCHEMA: [&str; 2] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        email VARCHAR(255) UNIQUE NOT NULL,
        age INTEGER NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)",
];

const COLUMNS: &str = "id, name, email, age, created_at, updated_at";

/// PostgreSQL implementation of UserRepository over raw parameterized SQL
#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn fetch_one(&self, stmt: Statement) -> UserResult<User> {
        UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(UserError::from_db)?
            .map(User::from)
            .ok_or(UserError::NotFound)
    }
}

#[derive(Debug, FromQueryResult)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    age: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            age: row.age,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct CountRow {
    count: i64,
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, input: CreateUser) -> UserResult<User> {
        let sql = format!(
            "INSERT INTO users (name, email, age) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [input.name.into(), input.email.into(), input.age.into()],
        );

        let user = self.fetch_one(stmt).await.map_err(|e| match e {
            UserError::NotFound => UserError::Storage("insert returned no row".to_string()),
            other => other,
        })?;

        tracing::info!(user_id = user.id, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: i64) -> UserResult<User> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [id.into()]);
        self.fetch_one(stmt).await
    }

    async fn get_by_email(&self, email: &str) -> UserResult<User> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [email.into()]);
        self.fetch_one(stmt).await
    }

    async fn get_all(&self, limit: u64, offset: u64) -> UserResult<Vec<User>> {
        let sql = format!("SELECT {COLUMNS} FROM users ORDER BY id ASC LIMIT $1 OFFSET $2");
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [to_i64(limit).into(), to_i64(offset).into()],
        );

        let rows = UserRow::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(UserError::from_db)?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn update(&self, id: i64, input: UpdateUser) -> UserResult<User> {
        let sql = format!(
            "UPDATE users SET \
                name = COALESCE($1, name), \
                email = COALESCE($2, email), \
                age = COALESCE($3, age), \
                updated_at = NOW() \
             WHERE id = $4 RETURNING {COLUMNS}"
        );
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [
                input.name.into(),
                input.email.into(),
                input.age.into(),
                id.into(),
            ],
        );

        let user = self.fetch_one(stmt).await?;
        tracing::info!(user_id = user.id, "Updated user");
        Ok(user)
    }

    async fn delete(&self, id: i64) -> UserResult<()> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "DELETE FROM users WHERE id = $1",
            [id.into()],
        );

        let result = self.db.execute_raw(stmt).await.map_err(UserError::from_db)?;
        if result.rows_affected() == 0 {
            return Err(UserError::NotFound);
        }

        tracing::info!(user_id = id, "Deleted user");
        Ok(())
    }

    async fn count(&self) -> UserResult<u64> {
        let stmt = Statement::from_string(
            DbBackend::Postgres,
            "SELECT COUNT(*) AS count FROM users".to_owned(),
        );

        let row = CountRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(UserError::from_db)?
            .ok_or_else(|| UserError::Storage("count returned no row".to_string()))?;

        Ok(u64::try_from(row.count).unwrap_or_default())
    }
}
