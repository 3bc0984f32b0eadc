//! Evaluation storage operations

use super::SeaOrmStorage;
use crate::entity::evaluations::{ActiveModel, Column, Entity as Evaluations};
use crate::errors::{EssaySystemError, Result};
use crate::models::evaluations::entities::{CreateEvaluationData, Evaluation};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// Insert the evaluation row for an essay
    pub async fn create_evaluation_impl(&self, data: CreateEvaluationData) -> Result<Evaluation> {
        let now = chrono::Utc::now().timestamp();
        let [s1, s2, s3, s4, s5] = data.scores;
        let [f1, f2, f3, f4, f5] = data.feedbacks;

        let model = ActiveModel {
            essay_id: Set(data.essay_id),
            overall_score: Set(data.overall_score),
            competency_1_score: Set(s1),
            competency_2_score: Set(s2),
            competency_3_score: Set(s3),
            competency_4_score: Set(s4),
            competency_5_score: Set(s5),
            competency_1_feedback: Set(f1),
            competency_2_feedback: Set(f2),
            competency_3_feedback: Set(f3),
            competency_4_feedback: Set(f4),
            competency_5_feedback: Set(f5),
            general_feedback: Set(data.general_feedback),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            EssaySystemError::database_operation(format!("Failed to create evaluation: {e}"))
        })?;

        Ok(result.into_evaluation())
    }

    /// Fetch the evaluation of an essay
    pub async fn get_evaluation_by_essay_id_impl(
        &self,
        essay_id: i64,
    ) -> Result<Option<Evaluation>> {
        let result = Evaluations::find()
            .filter(Column::EssayId.eq(essay_id))
            .one(&self.db)
            .await
            .map_err(|e| {
                EssaySystemError::database_operation(format!("Failed to query evaluation: {e}"))
            })?;

        Ok(result.map(|m| m.into_evaluation()))
    }

    /// Delete the evaluation of an essay
    pub async fn delete_evaluation_by_essay_id_impl(&self, essay_id: i64) -> Result<bool> {
        let result = Evaluations::delete_many()
            .filter(Column::EssayId.eq(essay_id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                EssaySystemError::database_operation(format!("Failed to delete evaluation: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }
}
