use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("user not found")]
    NotFound,

    #[error("email already exists")]
    DuplicateEmail,

    #[error("{0}")]
    Validation(String),

    #[error("invalid user ID")]
    InvalidId,

    #[error("storage error: {0}")]
    Storage(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    /// Maps a database error, recognising unique-constraint violations on email.
    pub fn from_db(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => UserError::DuplicateEmail,
            _ => UserError::Storage(err.to_string()),
        }
    }
}

/// Convert UserError to AppError for standardized error responses
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => AppError::NotFound(err.to_string()),
            UserError::DuplicateEmail | UserError::InvalidId => AppError::BadRequest(err.to_string()),
            UserError::Validation(msg) => AppError::BadRequest(msg),
            UserError::Storage(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
