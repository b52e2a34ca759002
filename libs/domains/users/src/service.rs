use chrono::NaiveDate;
use mockable::{Clock, DefaultClock};
use std::sync::Arc;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUserRequest, NewUser, UpdateUserRequest, UserResponse};
use crate::repository::UserRepository;
use crate::validation::{validate_create, validate_update};

/// Service layer for User business logic
///
/// Every operation validates before touching the repository, checks
/// existence and uniqueness before mutating, and mutates at most once.
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl<R: UserRepository> UserService<R> {
    /// Service on the system clock.
    pub fn new(repository: R) -> Self {
        Self::with_clock(repository, Arc::new(DefaultClock))
    }

    pub fn with_clock(repository: R, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            repository: Arc::new(repository),
            clock,
        }
    }

    fn today(&self) -> NaiveDate {
        self.clock.utc().date_naive()
    }

    /// Create a new user
    pub async fn create_user(&self, input: CreateUserRequest) -> UserResult<UserResponse> {
        tracing::info!(email = %input.email, "Creating user");

        let today = self.today();
        let errors = validate_create(&input, today);
        if !errors.is_empty() {
            return Err(UserError::Validation(errors));
        }

        if self.repository.email_exists(&input.email).await? {
            return Err(UserError::email_exists());
        }

        let created = self.repository.create(NewUser::from(input)).await?;

        tracing::info!(user_id = created.id, "Created user");
        Ok(UserResponse::from_user(created, today))
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: i32) -> UserResult<UserResponse> {
        tracing::info!(user_id = id, "Fetching user");

        let user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or_else(UserError::not_found)?;

        Ok(UserResponse::from_user(user, self.today()))
    }

    /// List all users
    pub async fn list_users(&self) -> UserResult<Vec<UserResponse>> {
        tracing::info!("Listing users");

        let today = self.today();
        let users = self.repository.get_all().await?;

        Ok(users
            .into_iter()
            .map(|u| UserResponse::from_user(u, today))
            .collect())
    }

    /// Replace every field of an existing user
    pub async fn update_user(&self, id: i32, input: UpdateUserRequest) -> UserResult<()> {
        tracing::info!(user_id = id, email = %input.email, "Updating user");

        let errors = validate_update(&input, self.today());
        if !errors.is_empty() {
            return Err(UserError::Validation(errors));
        }

        let existing = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or_else(UserError::not_found)?;

        if input.email != existing.email && self.repository.email_exists(&input.email).await? {
            return Err(UserError::email_exists());
        }

        self.repository.update(input.into_user(id)).await?;

        tracing::info!(user_id = id, "Updated user");
        Ok(())
    }

    /// Delete a user
    pub async fn delete_user(&self, id: i32) -> UserResult<()> {
        tracing::info!(user_id = id, "Deleting user");

        if self.repository.get_by_id(id).await?.is_none() {
            return Err(UserError::not_found());
        }

        self.repository.delete(id).await?;

        tracing::info!(user_id = id, "Deleted user");
        Ok(())
    }
}
