//! The uploaded -> transcribed transition.

use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::{EssaySystemError, Result};
use crate::services::ai::{EssayEvaluator, TextRecognizer};
use crate::storage::Storage;

#[derive(Debug)]
pub struct TranscriptionOutcome {
    pub transcription: String,
    /// OCR confidence for a fresh run, absent on a short-circuit
    pub confidence: Option<f64>,
    pub already_transcribed: bool,
}

/// Runs the two-step OCR transform for one essay.
///
/// Short-circuits when the essay already holds a transcription, so
/// repeated triggers after a success never reach the external backends.
/// The write is conditional on the essay still being `uploaded`; a crash
/// before it leaves the essay untouched and safe to retry, a lost race
/// returns the winner's transcription.
pub async fn transcribe_essay(
    storage: &Arc<dyn Storage>,
    recognizer: &dyn TextRecognizer,
    evaluator: &dyn EssayEvaluator,
    essay_id: i64,
    user_id: i64,
) -> Result<TranscriptionOutcome> {
    let essay = storage
        .get_essay_by_id(essay_id, user_id)
        .await?
        .ok_or_else(|| EssaySystemError::not_found("Essay not found"))?;

    if let Some(existing) = essay
        .transcription
        .as_deref()
        .filter(|t| !t.trim().is_empty())
    {
        debug!("Essay {} already transcribed, returning stored text", essay_id);
        return Ok(TranscriptionOutcome {
            transcription: existing.to_string(),
            confidence: None,
            already_transcribed: true,
        });
    }

    info!("Starting two-step OCR processing for essay {}", essay_id);
    let ocr = recognizer.extract_text(&essay.image_url).await?;
    debug!(
        "OCR extracted {} characters (confidence {:.2}) for essay {}",
        ocr.text.chars().count(),
        ocr.confidence,
        essay_id
    );

    let reconstructed = evaluator.reconstruct(&ocr.text).await?;
    if reconstructed.trim().is_empty() {
        return Err(EssaySystemError::ai_service(
            "Reconstruction returned empty text",
        ));
    }

    let wrote = storage
        .set_essay_transcription(essay_id, user_id, &ocr.text, &reconstructed)
        .await?;

    if !wrote {
        // Another request transcribed this essay first (or it was deleted
        // meanwhile). Return whatever the winner stored.
        let current = storage
            .get_essay_by_id(essay_id, user_id)
            .await?
            .ok_or_else(|| EssaySystemError::not_found("Essay not found"))?;

        if let Some(stored) = current
            .transcription
            .filter(|t| !t.trim().is_empty())
        {
            info!(
                "Essay {} was transcribed concurrently, returning stored text",
                essay_id
            );
            return Ok(TranscriptionOutcome {
                transcription: stored,
                confidence: None,
                already_transcribed: true,
            });
        }

        return Err(EssaySystemError::database_operation(
            "Failed to store transcription",
        ));
    }

    info!("Essay {} transcribed and reconstructed", essay_id);
    Ok(TranscriptionOutcome {
        transcription: reconstructed,
        confidence: Some(ocr.confidence),
        already_transcribed: false,
    })
}
