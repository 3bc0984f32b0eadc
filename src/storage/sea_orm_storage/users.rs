//! User storage operations

use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{EssaySystemError, Result};
use crate::models::users::{
    entities::{User, UserStatus},
    requests::{CreateUserRequest, UpdateProfileRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// Create a user
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            status: Set(UserStatus::Active.to_string()),
            profile_name: Set(req.profile_name),
            avatar_url: Set(req.avatar_url),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EssaySystemError::database_operation(format!("Failed to create user: {e}")))?;

        Ok(result.into_user())
    }

    /// Fetch a user by ID
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EssaySystemError::database_operation(format!("Failed to query user: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// Fetch a user by username
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| EssaySystemError::database_operation(format!("Failed to query user: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// Fetch a user by email
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| EssaySystemError::database_operation(format!("Failed to query user: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// Fetch a user by username or email
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .map_err(|e| EssaySystemError::database_operation(format!("Failed to query user: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// Bump the last login timestamp
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                EssaySystemError::database_operation(format!("Failed to update last login: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    /// Update profile fields
    pub async fn update_user_profile_impl(
        &self,
        id: i64,
        update: UpdateProfileRequest,
    ) -> Result<Option<User>> {
        let existing = self.get_user_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(profile_name) = update.profile_name {
            model.profile_name = Set(Some(profile_name));
        }

        if let Some(avatar_url) = update.avatar_url {
            model.avatar_url = Set(Some(avatar_url));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| EssaySystemError::database_operation(format!("Failed to update user: {e}")))?;

        self.get_user_by_id_impl(id).await
    }
}
