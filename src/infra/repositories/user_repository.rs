//! User repository backed by the relational store.
//!
//! The trait is the seam the service layer depends on: field-based
//! lookups, whole-collection listing and single-record writes. Missing
//! records surface as `None` so callers decide which error each
//! operation reports.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::config::ROLE_USER;
use crate::domain::{NewUser, User, UserRole};
use crate::errors::{ApiError, ApiResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new record; the store assigns id and timestamps.
    async fn insert(&self, data: NewUser) -> ApiResult<User>;

    /// Find a user by email address
    async fn find_by_email(&self, email: &str) -> ApiResult<Option<User>>;

    /// List all users
    async fn list(&self) -> ApiResult<Vec<User>>;

    /// Set the role of the user with the given id. Returns the updated
    /// record, or `None` when no record matches.
    async fn update_role(&self, id: Uuid, role: UserRole) -> ApiResult<Option<User>>;

    /// Replace the password hash of the user with the given email.
    /// Returns the updated record, or `None` when no record matches.
    async fn update_password(&self, email: &str, password_hash: String)
        -> ApiResult<Option<User>>;

    /// Delete the user with the given id. Deleting a missing record is
    /// not an error.
    async fn delete(&self, id: Uuid) -> ApiResult<()>;
}

/// Concrete implementation of UserRepository over SeaORM.
pub struct UserStore {
    db: Arc<DatabaseConnection>,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn insert(&self, data: NewUser) -> ApiResult<User> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(data.first_name),
            paternal_surname: Set(data.paternal_surname),
            maternal_surname: Set(data.maternal_surname),
            username: Set(data.username),
            email: Set(data.email),
            phone: Set(data.phone),
            password_hash: Set(data.password_hash),
            secret_question: Set(data.secret_question),
            answer_hash: Set(data.answer_hash),
            role: Set(ROLE_USER.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(self.db.as_ref())
            .await
            .map_err(ApiError::from)?;
        Ok(User::from(model))
    }

    async fn find_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(ApiError::from)?;

        Ok(result.map(User::from))
    }

    async fn list(&self) -> ApiResult<Vec<User>> {
        let models = UserEntity::find()
            .all(self.db.as_ref())
            .await
            .map_err(ApiError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> ApiResult<Option<User>> {
        let Some(found) = UserEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(ApiError::from)?
        else {
            return Ok(None);
        };

        let mut active: ActiveModel = found.into();
        active.role = Set(role.to_string());
        active.updated_at = Set(chrono::Utc::now());

        // The row can vanish between the find and the update; that is
        // a missing record, not a server fault.
        match active.update(self.db.as_ref()).await {
            Ok(model) => Ok(Some(User::from(model))),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(ApiError::from(e)),
        }
    }

    async fn update_password(
        &self,
        email: &str,
        password_hash: String,
    ) -> ApiResult<Option<User>> {
        let Some(found) = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(ApiError::from)?
        else {
            return Ok(None);
        };

        let mut active: ActiveModel = found.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(chrono::Utc::now());

        match active.update(self.db.as_ref()).await {
            Ok(model) => Ok(Some(User::from(model))),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(ApiError::from(e)),
        }
    }

    async fn delete(&self, id: Uuid) -> ApiResult<()> {
        UserEntity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(ApiError::from)?;

        Ok(())
    }
}
