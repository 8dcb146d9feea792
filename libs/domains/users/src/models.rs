use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidateEmail, ValidationError};

pub const NAME_MAX_CHARS: usize = 100;
pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// User entity as stored and as returned over HTTP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Storage-assigned identifier, never reused
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new user; every field is required
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(custom(function = "validate_name"))]
    pub name: String,

    #[validate(custom(function = "validate_email"))]
    pub email: String,

    #[validate(range(min = 0, max = 130, message = "age must be between 0 and 130"))]
    pub age: i32,
}

impl CreateUser {
    /// Copy with surrounding whitespace removed from name and email
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            age: self.age,
        }
    }
}

/// DTO for a partial update. Absent or `null` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(custom(function = "validate_name"))]
    pub name: Option<String>,

    #[validate(custom(function = "validate_email"))]
    pub email: Option<String>,

    #[validate(range(min = 0, max = 130, message = "age must be between 0 and 130"))]
    pub age: Option<i32>,
}

impl UpdateUser {
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.map(|n| n.trim().to_string()),
            email: self.email.map(|e| e.trim().to_string()),
            age: self.age,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.age.is_none()
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    let chars = name.trim().chars().count();
    if (1..=NAME_MAX_CHARS).contains(&chars) {
        Ok(())
    } else {
        Err(ValidationError::new("name_length").with_message(Cow::Borrowed(
            "name must be between 1 and 100 characters",
        )))
    }
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().validate_email() {
        Ok(())
    } else {
        Err(ValidationError::new("email").with_message(Cow::Borrowed("invalid email format")))
    }
}

/// Raw pagination query parameters.
///
/// Values are kept as strings so that garbage falls back to the defaults
/// instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// 1-based page number (default 1)
    pub page: Option<String>,
    /// Records per page, clamped to 1..=100 (default 10)
    pub page_size: Option<String>,
}

impl ListUsersQuery {
    pub fn page(&self) -> u64 {
        match self.page.as_deref().map(|p| p.trim().parse::<i64>()) {
            Some(Ok(page)) => page.max(1) as u64,
            _ => DEFAULT_PAGE,
        }
    }

    pub fn page_size(&self) -> u64 {
        match self.page_size.as_deref().map(|s| s.trim().parse::<i64>()) {
            Some(Ok(size)) => size.clamp(1, MAX_PAGE_SIZE as i64) as u64,
            _ => DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of users plus pagination bookkeeping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ListUsersResponse {
    pub data: Vec<User>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

impl ListUsersResponse {
    pub fn new(data: Vec<User>, total: u64, page: u64, page_size: u64) -> Self {
        Self {
            data,
            total,
            page,
            page_size,
            total_pages: total.div_ceil(page_size.max(1)),
        }
    }
}
