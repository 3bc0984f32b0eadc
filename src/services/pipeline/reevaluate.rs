//! The re-evaluation escape hatch: evaluated -> transcribed.

use std::sync::Arc;

use tracing::{info, warn};

use crate::errors::{EssaySystemError, Result};
use crate::models::essays::entities::EssayStatus;
use crate::storage::Storage;

/// Deletes the evaluation of an essay and rolls its status back to
/// transcribed, allowing a fresh evaluation. This is the only backward
/// transition in the essay lifecycle.
///
/// Returns false when the essay has no evaluation.
pub async fn delete_essay_evaluation(
    storage: &Arc<dyn Storage>,
    essay_id: i64,
    user_id: i64,
) -> Result<bool> {
    // Ownership check first; other tenants' essays look absent
    storage
        .get_essay_by_id(essay_id, user_id)
        .await?
        .ok_or_else(|| EssaySystemError::not_found("Essay not found"))?;

    let removed = storage.delete_evaluation_by_essay_id(essay_id).await?;
    if !removed {
        return Ok(false);
    }

    if let Err(e) = storage
        .set_essay_status(essay_id, user_id, EssayStatus::Transcribed)
        .await
    {
        warn!(
            "Failed to roll essay {} back to transcribed: {}",
            essay_id, e
        );
    }

    info!("Evaluation of essay {} deleted for re-evaluation", essay_id);
    Ok(true)
}
