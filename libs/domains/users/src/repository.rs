use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User};

/// Repository trait for User persistence
///
/// Lookups return [`UserError::NotFound`] instead of `Option`; every other
/// backend failure is [`UserError::Storage`]. Implementations enforce email
/// uniqueness and report violations as [`UserError::DuplicateEmail`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user, returning the stored record with id and timestamps
    async fn create(&self, input: CreateUser) -> UserResult<User>;

    async fn get_by_id(&self, id: i64) -> UserResult<User>;

    async fn get_by_email(&self, email: &str) -> UserResult<User>;

    /// Page of users ordered by id ascending
    async fn get_all(&self, limit: u64, offset: u64) -> UserResult<Vec<User>>;

    /// Merge `input` into the stored user and refresh `updated_at`
    async fn update(&self, id: i64, input: UpdateUser) -> UserResult<User>;

    async fn delete(&self, id: i64) -> UserResult<()>;

    async fn count(&self) -> UserResult<u64>;
}

#[derive(Debug, Default)]
struct Store {
    users: BTreeMap<i64, User>,
    last_id: i64,
}

impl Store {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

/// In-memory implementation of UserRepository (for development/testing)
///
/// Ids come from a counter that only grows, so deleted ids are never handed
/// out again.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, input: CreateUser) -> UserResult<User> {
        let mut store = self.store.write().await;

        if store.email_taken(&input.email, None) {
            return Err(UserError::DuplicateEmail);
        }

        store.last_id += 1;
        let now = Utc::now();
        let user = User {
            id: store.last_id,
            name: input.name,
            email: input.email,
            age: input.age,
            created_at: now,
            updated_at: now,
        };
        store.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn get_by_id(&self, id: i64) -> UserResult<User> {
        let store = self.store.read().await;
        store.users.get(&id).cloned().ok_or(UserError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> UserResult<User> {
        let store = self.store.read().await;
        store
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(UserError::NotFound)
    }

    async fn get_all(&self, limit: u64, offset: u64) -> UserResult<Vec<User>> {
        let store = self.store.read().await;
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(store.users.values().skip(offset).take(limit).cloned().collect())
    }

    async fn update(&self, id: i64, input: UpdateUser) -> UserResult<User> {
        let mut store = self.store.write().await;

        if !store.users.contains_key(&id) {
            return Err(UserError::NotFound);
        }
        if let Some(email) = &input.email {
            if store.email_taken(email, Some(id)) {
                return Err(UserError::DuplicateEmail);
            }
        }

        let user = store.users.get_mut(&id).ok_or(UserError::NotFound)?;
        if let Some(name) = input.name {
            user.name = name;
        }
        if let Some(email) = input.email {
            user.email = email;
        }
        if let Some(age) = input.age {
            user.age = age;
        }
        user.updated_at = Utc::now().max(user.updated_at);

        Ok(user.clone())
    }

    async fn delete(&self, id: i64) -> UserResult<()> {
        let mut store = self.store.write().await;
        store.users.remove(&id).map(|_| ()).ok_or(UserError::NotFound)
    }

    async fn count(&self) -> UserResult<u64> {
        let store = self.store.read().await;
        Ok(store.users.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, email: &str, age: i32) -> CreateUser {
        CreateUser {
            name: name.to_string(),
            email: email.to_string(),
            age,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let repo = InMemoryUserRepository::new();

        let created = repo
            .create(input("Test User", "test@example.com", 30))
            .await
            .unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.created_at, created.updated_at);

        let fetched = repo.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched, created);

        let by_email = repo.get_by_email("test@example.com").await.unwrap();
        assert_eq!(by_email, created);
    }

    #[tokio::test]
    async fn test_missing_user_is_not_found() {
        let repo = InMemoryUserRepository::new();

        assert!(matches!(repo.get_by_id(7).await, Err(UserError::NotFound)));
        assert!(matches!(
            repo.get_by_email("nobody@example.com").await,
            Err(UserError::NotFound)
        ));
        assert!(matches!(
            repo.update(7, UpdateUser::default()).await,
            Err(UserError::NotFound)
        ));
        assert!(matches!(repo.delete(7).await, Err(UserError::NotFound)));
    }

    #[tokio::test]
    async fn test_duplicate_email_error() {
        let repo = InMemoryUserRepository::new();

        repo.create(input("User 1", "test@example.com", 30))
            .await
            .unwrap();
        let result = repo.create(input("User 2", "test@example.com", 40)).await;

        assert!(matches!(result, Err(UserError::DuplicateEmail)));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused() {
        let repo = InMemoryUserRepository::new();

        let first = repo.create(input("A", "a@example.com", 20)).await.unwrap();
        repo.delete(first.id).await.unwrap();
        let second = repo.create(input("B", "b@example.com", 20)).await.unwrap();

        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_get_all_orders_by_id_and_pages() {
        let repo = InMemoryUserRepository::new();
        for i in 0..5 {
            repo.create(input("U", &format!("u{i}@example.com"), 20))
                .await
                .unwrap();
        }

        let page = repo.get_all(2, 2).await.unwrap();
        let ids: Vec<i64> = page.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![3, 4]);

        assert!(repo.get_all(10, 50).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let repo = InMemoryUserRepository::new();
        let created = repo
            .create(input("Ada", "ada@example.com", 36))
            .await
            .unwrap();

        let updated = repo
            .update(
                created.id,
                UpdateUser {
                    age: Some(40),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Ada");
        assert_eq!(updated.email, "ada@example.com");
        assert_eq!(updated.age, 40);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_to_taken_email_fails() {
        let repo = InMemoryUserRepository::new();
        repo.create(input("A", "a@example.com", 20)).await.unwrap();
        let b = repo.create(input("B", "b@example.com", 20)).await.unwrap();

        let result = repo
            .update(
                b.id,
                UpdateUser {
                    email: Some("a@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(UserError::DuplicateEmail)));

        // Keeping one's own email is fine
        let same = repo
            .update(
                b.id,
                UpdateUser {
                    email: Some("b@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(same.is_ok());
    }
}
