use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{NewUser, User};

/// Repository trait for User persistence
///
/// Implementations enforce email uniqueness themselves and report a
/// violation as [`UserError::Conflict`], so a race past the service's
/// pre-check still surfaces as a conflict. Any other failure is
/// [`UserError::Infrastructure`]; existence is the service's concern.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user and return it with its assigned id
    async fn create(&self, user: NewUser) -> UserResult<User>;

    /// Get a user by ID
    async fn get_by_id(&self, id: i32) -> UserResult<Option<User>>;

    /// All users, ordered by id
    async fn get_all(&self) -> UserResult<Vec<User>>;

    /// Replace every field of the user with `user.id`. An absent id is a no-op.
    async fn update(&self, user: User) -> UserResult<()>;

    /// Delete a user by ID. Deleting an absent id is not an error.
    async fn delete(&self, id: i32) -> UserResult<()>;

    /// Exact, case-sensitive match on the stored email
    async fn email_exists(&self, email: &str) -> UserResult<bool>;
}

#[derive(Debug)]
struct Store {
    next_id: i32,
    users: BTreeMap<i32, User>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            next_id: 1,
            users: BTreeMap::new(),
        }
    }
}

/// In-memory implementation of UserRepository (for development/testing)
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
    async fn create(&self, user: NewUser) -> UserResult<User> {
        let mut store = self.store.write().await;

        if store.users.values().any(|u| u.email == user.email) {
            return Err(UserError::email_exists());
        }

        let id = store.next_id;
        store.next_id += 1;

        let user = user.with_id(id);
        store.users.insert(id, user.clone());

        tracing::debug!(user_id = id, "Stored user in memory");
        Ok(user)
    }

    async fn get_by_id(&self, id: i32) -> UserResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store.users.get(&id).cloned())
    }

    async fn get_all(&self) -> UserResult<Vec<User>> {
        let store = self.store.read().await;
        Ok(store.users.values().cloned().collect())
    }

    async fn update(&self, user: User) -> UserResult<()> {
        let mut store = self.store.write().await;

        let taken = store
            .users
            .values()
            .any(|u| u.id != user.id && u.email == user.email);
        if taken {
            return Err(UserError::email_exists());
        }

        match store.users.get_mut(&user.id) {
            Some(slot) => *slot = user,
            None => tracing::debug!(user_id = user.id, "Update of absent user ignored"),
        }
        Ok(())
    }

    async fn delete(&self, id: i32) -> UserResult<()> {
        let mut store = self.store.write().await;
        store.users.remove(&id);
        Ok(())
    }

    async fn email_exists(&self, email: &str) -> UserResult<bool> {
        let store = self.store.read().await;
        Ok(store.users.values().any(|u| u.email == email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            first_name: "Ada".to_string(),
            last_name: None,
            email: email.to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            phone_number: "5551234567".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = InMemoryUserRepository::new();

        let first = repo.create(new_user("a@example.com")).await.unwrap();
        let second = repo.create(new_user("b@example.com")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(repo.get_by_id(2).await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("a@example.com")).await.unwrap();

        let result = repo.create(new_user("a@example.com")).await;

        assert!(matches!(result, Err(UserError::Conflict(_))));
        assert_eq!(repo.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_email_match_is_case_sensitive() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("a@example.com")).await.unwrap();

        assert!(repo.email_exists("a@example.com").await.unwrap());
        assert!(!repo.email_exists("A@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_update_rejects_email_of_other_user() {
        let repo = InMemoryUserRepository::new();
        let a = repo.create(new_user("a@example.com")).await.unwrap();
        repo.create(new_user("b@example.com")).await.unwrap();

        let result = repo
            .update(User {
                email: "b@example.com".to_string(),
                ..a.clone()
            })
            .await;

        assert!(matches!(result, Err(UserError::Conflict(_))));
        assert_eq!(repo.get_by_id(a.id).await.unwrap(), Some(a));
    }

    #[tokio::test]
    async fn test_update_missing_user_is_a_no_op() {
        let repo = InMemoryUserRepository::new();
        let ghost = new_user("ghost@example.com").with_id(42);

        repo.update(ghost).await.unwrap();

        assert_eq!(repo.get_by_id(42).await.unwrap(), None);
        assert!(repo.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent_and_ids_are_not_reused() {
        let repo = InMemoryUserRepository::new();
        let a = repo.create(new_user("a@example.com")).await.unwrap();

        repo.delete(a.id).await.unwrap();
        repo.delete(a.id).await.unwrap();

        let b = repo.create(new_user("a@example.com")).await.unwrap();
        assert_eq!(b.id, 2);
        assert_eq!(repo.get_all().await.unwrap(), vec![b]);
    }
}
