//! Owner-scoped evaluation reads, with status reconciliation.

use std::sync::Arc;

use tracing::{info, warn};

use crate::errors::{EssaySystemError, Result};
use crate::models::essays::entities::EssayStatus;
use crate::models::evaluations::entities::Evaluation;
use crate::storage::Storage;

/// Fetches the evaluation of an essay, scoped by owner.
///
/// Self-healing read: when an evaluation row exists but the essay status
/// lagged behind (a crash between the insert and the status update), the
/// status is reconciled here, best-effort.
pub async fn get_essay_evaluation(
    storage: &Arc<dyn Storage>,
    essay_id: i64,
    user_id: i64,
) -> Result<Option<Evaluation>> {
    let essay = storage
        .get_essay_by_id(essay_id, user_id)
        .await?
        .ok_or_else(|| EssaySystemError::not_found("Essay not found"))?;

    let evaluation = storage.get_evaluation_by_essay_id(essay_id).await?;

    if evaluation.is_some() && essay.status != EssayStatus::Evaluated {
        info!(
            "Essay {} has an evaluation but status '{}', reconciling",
            essay_id, essay.status
        );
        if let Err(e) = storage
            .set_essay_status(essay_id, user_id, EssayStatus::Evaluated)
            .await
        {
            warn!("Failed to reconcile status of essay {}: {}", essay_id, e);
        }
    }

    Ok(evaluation)
}
