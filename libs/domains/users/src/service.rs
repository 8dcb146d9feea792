use std::sync::Arc;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User};
use crate::repository::UserRepository;

/// Minimum age accepted when creating a user
pub const MIN_AGE: i32 = 18;

/// Service layer for User business logic
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a user after the uniqueness pre-check and the age rule.
    ///
    /// A concurrent insert of the same email that slips past the pre-check is
    /// still reported as `DuplicateEmail` by the repository.
    pub async fn create_user(&self, input: CreateUser) -> UserResult<User> {
        let input = input.trimmed();

        self.ensure_email_free(&input.email, None).await?;

        if input.age < MIN_AGE {
            return Err(UserError::Validation(format!(
                "age must be at least {}",
                MIN_AGE
            )));
        }

        self.repository.create(input).await
    }

    pub async fn get_user(&self, id: i64) -> UserResult<User> {
        self.repository.get_by_id(id).await
    }

    /// One page of users plus the total count. `page` is 1-based.
    pub async fn list_users(&self, page: u64, page_size: u64) -> UserResult<(Vec<User>, u64)> {
        let offset = page.saturating_sub(1).saturating_mul(page_size);
        let users = self.repository.get_all(page_size, offset).await?;
        let total = self.repository.count().await?;
        Ok((users, total))
    }

    pub async fn update_user(&self, id: i64, input: UpdateUser) -> UserResult<User> {
        self.repository.get_by_id(id).await?;

        let input = input.trimmed();
        if let Some(email) = &input.email {
            self.ensure_email_free(email, Some(id)).await?;
        }

        self.repository.update(id, input).await
    }

    pub async fn delete_user(&self, id: i64) -> UserResult<()> {
        self.repository.get_by_id(id).await?;
        self.repository.delete(id).await
    }

    /// `DuplicateEmail` if `email` belongs to a user other than `owner`
    async fn ensure_email_free(&self, email: &str, owner: Option<i64>) -> UserResult<()> {
        match self.repository.get_by_email(email).await {
            Ok(existing) if Some(existing.id) != owner => Err(UserError::DuplicateEmail),
            Ok(_) | Err(UserError::NotFound) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn user(id: i64, email: &str) -> User {
        let now = Utc::now();
        User {
            id,
            name: "Ada".to_string(),
            email: email.to_string(),
            age: 36,
            created_at: now,
            updated_at: now,
        }
    }

    fn create_input(email: &str, age: i32) -> CreateUser {
        CreateUser {
            name: "Ada".to_string(),
            email: email.to_string(),
            age,
        }
    }

    #[tokio::test]
    async fn test_create_user_success() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_get_by_email()
            .withf(|email: &str| email == "ada@example.com")
            .returning(|_| Err(UserError::NotFound));
        mock_repo
            .expect_create()
            .withf(|input: &CreateUser| input.name == "Ada" && input.email == "ada@example.com")
            .times(1)
            .returning(|input| Ok(user(1, &input.email)));

        let service = UserService::new(mock_repo);
        let created = service
            .create_user(CreateUser {
                name: "  Ada ".to_string(),
                email: " ada@example.com".to_string(),
                age: 36,
            })
            .await
            .unwrap();

        assert_eq!(created.id, 1);
    }

    #[tokio::test]
    async fn test_create_user_rejects_minor() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_get_by_email()
            .returning(|_| Err(UserError::NotFound));
        mock_repo.expect_create().never();

        let service = UserService::new(mock_repo);
        let result = service.create_user(create_input("kid@example.com", 17)).await;

        assert!(matches!(result, Err(UserError::Validation(msg)) if msg == "age must be at least 18"));
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email_checked_before_age() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_get_by_email()
            .returning(|email| Ok(user(4, email)));
        mock_repo.expect_create().never();

        let service = UserService::new(mock_repo);
        let result = service.create_user(create_input("taken@example.com", 12)).await;

        assert!(matches!(result, Err(UserError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn test_create_user_constraint_race_is_duplicate() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_get_by_email()
            .returning(|_| Err(UserError::NotFound));
        mock_repo
            .expect_create()
            .returning(|_| Err(UserError::DuplicateEmail));

        let service = UserService::new(mock_repo);
        let result = service.create_user(create_input("race@example.com", 30)).await;

        assert!(matches!(result, Err(UserError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn test_create_user_propagates_lookup_failure() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_get_by_email()
            .returning(|_| Err(UserError::Storage("pool timed out".to_string())));
        mock_repo.expect_create().never();

        let service = UserService::new(mock_repo);
        let result = service.create_user(create_input("ada@example.com", 30)).await;

        assert!(matches!(result, Err(UserError::Storage(_))));
    }

    #[tokio::test]
    async fn test_list_users_computes_offset() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_get_all()
            .with(eq(10), eq(20))
            .times(1)
            .returning(|_, _| Ok(vec![user(21, "u21@example.com")]));
        mock_repo.expect_count().returning(|| Ok(25));

        let service = UserService::new(mock_repo);
        let (users, total) = service.list_users(3, 10).await.unwrap();

        assert_eq!(users.len(), 1);
        assert_eq!(total, 25);
    }

    #[tokio::test]
    async fn test_update_user_not_found() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_get_by_id()
            .with(eq(9))
            .returning(|_| Err(UserError::NotFound));
        mock_repo.expect_update().never();

        let service = UserService::new(mock_repo);
        let result = service.update_user(9, UpdateUser::default()).await;

        assert!(matches!(result, Err(UserError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_user_email_owned_by_other() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_get_by_id()
            .returning(|id| Ok(user(id, "me@example.com")));
        mock_repo
            .expect_get_by_email()
            .returning(|email| Ok(user(2, email)));
        mock_repo.expect_update().never();

        let service = UserService::new(mock_repo);
        let result = service
            .update_user(
                1,
                UpdateUser {
                    email: Some("other@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(UserError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn test_update_user_keeping_own_email() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_get_by_id()
            .returning(|id| Ok(user(id, "me@example.com")));
        mock_repo
            .expect_get_by_email()
            .returning(|email| Ok(user(1, email)));
        mock_repo
            .expect_update()
            .times(1)
            .returning(|id, input| {
                let mut updated = user(id, "me@example.com");
                updated.age = input.age.unwrap_or(updated.age);
                Ok(updated)
            });

        let service = UserService::new(mock_repo);
        let updated = service
            .update_user(
                1,
                UpdateUser {
                    email: Some("me@example.com".to_string()),
                    age: Some(40),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.age, 40);
    }

    #[tokio::test]
    async fn test_update_user_without_email_skips_lookup() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_get_by_id()
            .returning(|id| Ok(user(id, "me@example.com")));
        mock_repo.expect_get_by_email().never();
        mock_repo
            .expect_update()
            .returning(|id, _| Ok(user(id, "me@example.com")));

        let service = UserService::new(mock_repo);
        assert!(service.update_user(1, UpdateUser::default()).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_user_checks_existence() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_get_by_id()
            .returning(|_| Err(UserError::NotFound));
        mock_repo.expect_delete().never();

        let service = UserService::new(mock_repo);
        assert!(matches!(service.delete_user(5).await, Err(UserError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_user_success() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_get_by_id()
            .returning(|id| Ok(user(id, "gone@example.com")));
        mock_repo
            .expect_delete()
            .with(eq(5))
            .times(1)
            .returning(|_| Ok(()));

        let service = UserService::new(mock_repo);
        assert!(service.delete_user(5).await.is_ok());
    }
}
