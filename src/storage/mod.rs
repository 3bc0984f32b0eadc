use std::sync::Arc;

use crate::models::{
    essays::{
        entities::{Essay, EssayStatus},
        requests::{CreateEssayRequest, EssayListQuery},
        responses::EssayListResponse,
    },
    evaluations::entities::{CreateEvaluationData, Evaluation},
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateProfileRequest},
    },
};

use crate::errors::Result;

pub mod image_store;
pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// User management
    // Create a user (password already hashed by the caller)
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // Fetch a user by ID
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // Fetch a user by username
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // Fetch a user by email
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // Fetch a user by username or email
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // Bump the last login timestamp
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // Update profile fields
    async fn update_user_profile(
        &self,
        id: i64,
        update: UpdateProfileRequest,
    ) -> Result<Option<User>>;

    /// Essay management. Every method is scoped by the owning user:
    /// an essay belonging to someone else behaves as if it did not exist.
    // Create an essay in the uploaded state
    async fn create_essay(&self, user_id: i64, essay: CreateEssayRequest) -> Result<Essay>;
    // Fetch an essay scoped by (id, user_id)
    async fn get_essay_by_id(&self, essay_id: i64, user_id: i64) -> Result<Option<Essay>>;
    // List the user's essays, newest first, optionally filtered by status
    async fn list_essays_with_pagination(
        &self,
        user_id: i64,
        query: EssayListQuery,
    ) -> Result<EssayListResponse>;
    // Write both transcription fields and advance to transcribed.
    // Conditional on the essay still being in the uploaded state; returns
    // false when another request won the race (or the essay is gone).
    async fn set_essay_transcription(
        &self,
        essay_id: i64,
        user_id: i64,
        raw_transcription: &str,
        transcription: &str,
    ) -> Result<bool>;
    // Set the essay status
    async fn set_essay_status(
        &self,
        essay_id: i64,
        user_id: i64,
        status: EssayStatus,
    ) -> Result<bool>;
    // Delete an essay; evaluations go with it (FK cascade)
    async fn delete_essay(&self, essay_id: i64, user_id: i64) -> Result<bool>;

    /// Evaluation management
    // Insert the evaluation row for an essay
    async fn create_evaluation(&self, data: CreateEvaluationData) -> Result<Evaluation>;
    // Fetch the evaluation of an essay, if any
    async fn get_evaluation_by_essay_id(&self, essay_id: i64) -> Result<Option<Evaluation>>;
    // Delete the evaluation of an essay (re-evaluation escape hatch)
    async fn delete_evaluation_by_essay_id(&self, essay_id: i64) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
