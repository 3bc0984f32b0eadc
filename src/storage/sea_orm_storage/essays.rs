//! Essay storage operations
//!
//! Every query here carries the owner's user_id filter; tenant isolation
//! happens at this layer, not in the handlers.

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::essays::{ActiveModel, Column, Entity as Essays};
use crate::entity::evaluations::{Column as EvaluationColumn, Entity as Evaluations};
use crate::errors::{EssaySystemError, Result};
use crate::utils::escape_like_pattern;
use crate::models::{
    PaginationInfo,
    essays::{
        entities::{Essay, EssayStatus},
        requests::{CreateEssayRequest, EssayListQuery},
        responses::{EssayListItem, EssayListResponse},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// Create an essay in the uploaded state
    pub async fn create_essay_impl(
        &self,
        user_id: i64,
        req: CreateEssayRequest,
    ) -> Result<Essay> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            user_id: Set(user_id),
            title: Set(req.title.trim().to_string()),
            theme: Set(req.theme.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())),
            image_path: Set(req.image_path),
            image_url: Set(req.image_url),
            status: Set(EssayStatus::Uploaded.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            EssaySystemError::database_operation(format!("Failed to create essay: {e}"))
        })?;

        Ok(result.into_essay())
    }

    /// Fetch an essay scoped by (id, user_id)
    pub async fn get_essay_by_id_impl(&self, essay_id: i64, user_id: i64) -> Result<Option<Essay>> {
        let result = Essays::find_by_id(essay_id)
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| {
                EssaySystemError::database_operation(format!("Failed to query essay: {e}"))
            })?;

        Ok(result.map(|m| m.into_essay()))
    }

    /// List the user's essays with pagination
    pub async fn list_essays_with_pagination_impl(
        &self,
        user_id: i64,
        query: EssayListQuery,
    ) -> Result<EssayListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Essays::find().filter(Column::UserId.eq(user_id));

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        // Title search
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::Title.contains(&escaped));
        }

        select = select.order_by_desc(Column::CreatedAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            EssaySystemError::database_operation(format!("Failed to count essays: {e}"))
        })?;

        let pages = paginator.num_pages().await.map_err(|e| {
            EssaySystemError::database_operation(format!("Failed to count essay pages: {e}"))
        })?;

        let essays: Vec<Essay> = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| {
                EssaySystemError::database_operation(format!("Failed to list essays: {e}"))
            })?
            .into_iter()
            .map(|m| m.into_essay())
            .collect();

        // Attach the overall score of evaluated essays on this page
        let evaluated_ids: Vec<i64> = essays
            .iter()
            .filter(|e| e.status == EssayStatus::Evaluated)
            .map(|e| e.id)
            .collect();

        let mut score_map: HashMap<i64, i32> = HashMap::new();
        if !evaluated_ids.is_empty() {
            let evaluations = Evaluations::find()
                .filter(EvaluationColumn::EssayId.is_in(evaluated_ids))
                .all(&self.db)
                .await
                .map_err(|e| {
                    EssaySystemError::database_operation(format!(
                        "Failed to query evaluations: {e}"
                    ))
                })?;

            for evaluation in evaluations {
                score_map.insert(evaluation.essay_id, evaluation.overall_score);
            }
        }

        let items: Vec<EssayListItem> = essays
            .into_iter()
            .map(|essay| {
                let overall_score = score_map.get(&essay.id).copied();
                EssayListItem {
                    essay,
                    overall_score,
                }
            })
            .collect();

        Ok(EssayListResponse {
            items,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// Write both transcription fields and advance uploaded -> transcribed.
    ///
    /// The update is conditional on the essay still being in the uploaded
    /// state so that two racing transcription requests write at most once;
    /// the loser observes rows_affected == 0 and re-reads.
    pub async fn set_essay_transcription_impl(
        &self,
        essay_id: i64,
        user_id: i64,
        raw_transcription: &str,
        transcription: &str,
    ) -> Result<bool> {
        use sea_orm::sea_query::Expr;

        let now = chrono::Utc::now().timestamp();

        let result = Essays::update_many()
            .col_expr(Column::RawTranscription, Expr::value(raw_transcription))
            .col_expr(Column::Transcription, Expr::value(transcription))
            .col_expr(
                Column::Status,
                Expr::value(EssayStatus::Transcribed.to_string()),
            )
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(essay_id))
            .filter(Column::UserId.eq(user_id))
            .filter(Column::Status.eq(EssayStatus::Uploaded.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| {
                EssaySystemError::database_operation(format!(
                    "Failed to store transcription: {e}"
                ))
            })?;

        Ok(result.rows_affected > 0)
    }

    /// Set the essay status
    pub async fn set_essay_status_impl(
        &self,
        essay_id: i64,
        user_id: i64,
        status: EssayStatus,
    ) -> Result<bool> {
        use sea_orm::sea_query::Expr;

        let now = chrono::Utc::now().timestamp();

        let result = Essays::update_many()
            .col_expr(Column::Status, Expr::value(status.to_string()))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(essay_id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                EssaySystemError::database_operation(format!("Failed to update essay status: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    /// Delete an essay. The evaluations FK cascades, so the evaluation
    /// row (if any) goes with it.
    pub async fn delete_essay_impl(&self, essay_id: i64, user_id: i64) -> Result<bool> {
        let result = Essays::delete_many()
            .filter(Column::Id.eq(essay_id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                EssaySystemError::database_operation(format!("Failed to delete essay: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }
}
