//! The transcribed -> evaluated transition.

use std::sync::Arc;

use tracing::{info, warn};

use crate::errors::{EssaySystemError, Result};
use crate::models::essays::entities::EssayStatus;
use crate::models::evaluations::entities::{CreateEvaluationData, Evaluation};
use crate::services::ai::{EssayEvaluator, gemini::calculate_overall_score};
use crate::storage::Storage;

#[derive(Debug)]
pub struct EvaluationOutcome {
    pub evaluation: Evaluation,
    pub already_evaluated: bool,
}

/// Scores one essay against the rubric.
///
/// Preconditions are checked before any external call: the essay must
/// exist for this user and must hold a transcription. An already
/// evaluated essay short-circuits to its stored evaluation, so scoring is
/// paid at most once unless the evaluation is explicitly deleted.
///
/// The evaluation row is authoritative once inserted: a failure to
/// advance the essay status afterwards is logged, not rolled back, and is
/// reconciled by the read path.
pub async fn evaluate_essay(
    storage: &Arc<dyn Storage>,
    evaluator: &dyn EssayEvaluator,
    essay_id: i64,
    user_id: i64,
) -> Result<EvaluationOutcome> {
    let essay = storage
        .get_essay_by_id(essay_id, user_id)
        .await?
        .ok_or_else(|| EssaySystemError::not_found("Essay not found"))?;

    if !essay.has_transcription() {
        return Err(EssaySystemError::precondition_failed(
            "Essay must be transcribed before evaluation",
        ));
    }

    if essay.status == EssayStatus::Evaluated {
        let existing = storage
            .get_evaluation_by_essay_id(essay_id)
            .await?
            .ok_or_else(|| {
                EssaySystemError::not_found("Evaluation not found for evaluated essay")
            })?;
        return Ok(EvaluationOutcome {
            evaluation: existing,
            already_evaluated: true,
        });
    }

    let transcription = essay.transcription.as_deref().unwrap_or_default();

    info!("Starting rubric evaluation for essay {}", essay_id);
    let result = evaluator.evaluate(transcription).await?;

    // The overall score is always derived here, never taken from the AI
    let overall_score = calculate_overall_score(&result);

    let data = CreateEvaluationData {
        essay_id,
        overall_score,
        scores: result.competencies().map(|c| c.score),
        feedbacks: result.competencies().map(|c| c.feedback.clone()),
        general_feedback: result.general_feedback.clone(),
    };

    let evaluation = storage.create_evaluation(data).await?;

    match storage
        .set_essay_status(essay_id, user_id, EssayStatus::Evaluated)
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            warn!(
                "Essay {} vanished while advancing to evaluated; evaluation {} kept",
                essay_id, evaluation.id
            );
        }
        Err(e) => {
            // The evaluation is already durable; the status lags and the
            // read path reconciles it.
            warn!(
                "Failed to advance essay {} to evaluated: {}; evaluation {} kept",
                essay_id, e, evaluation.id
            );
        }
    }

    info!(
        "Essay {} evaluated with overall score {}",
        essay_id, overall_score
    );

    Ok(EvaluationOutcome {
        evaluation,
        already_evaluated: false,
    })
}
