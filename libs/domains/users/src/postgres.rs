use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, SqlErr,
};

use crate::{
    entity,
    error::{UserError, UserResult},
    models::{NewUser, User},
    repository::UserRepository,
};

pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Map a store error to the domain taxonomy.
///
/// A violation of the email unique index becomes the same conflict the
/// service pre-check reports; anything else is an infrastructure failure
/// tagged with the operation that hit it.
pub fn classify_db_error(op: &str, err: DbErr) -> UserError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail))
            if detail.contains(entity::EMAIL_UNIQUE_INDEX) =>
        {
            UserError::email_exists()
        }
        _ => UserError::Infrastructure(format!("{op}: {err}")),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> UserResult<User> {
        let active_model: entity::ActiveModel = user.into();

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| classify_db_error("insert user", e))?;

        tracing::debug!(user_id = model.id, "Inserted user");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i32) -> UserResult<Option<User>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| classify_db_error("find user", e))?;

        Ok(model.map(Into::into))
    }

    async fn get_all(&self) -> UserResult<Vec<User>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| classify_db_error("list users", e))?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update(&self, user: User) -> UserResult<()> {
        let id = user.id;
        let active_model: entity::ActiveModel = user.into();

        let result = entity::Entity::update_many()
            .set(active_model)
            .filter(entity::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| classify_db_error("update user", e))?;

        tracing::debug!(user_id = id, rows = result.rows_affected, "Updated user");
        Ok(())
    }

    async fn delete(&self, id: i32) -> UserResult<()> {
        let result = entity::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| classify_db_error("delete user", e))?;

        tracing::debug!(user_id = id, rows = result.rows_affected, "Deleted user");
        Ok(())
    }

    async fn email_exists(&self, email: &str) -> UserResult<bool> {
        let count = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .count(&self.db)
            .await
            .map_err(|e| classify_db_error("check email", e))?;

        Ok(count > 0)
    }
}
