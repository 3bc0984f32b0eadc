//! The essay processing pipeline.
//!
//! Sequences the two externally-backed transitions of the essay state
//! machine:
//!
//! - `uploaded -> transcribed`: vision OCR followed by text
//!   reconstruction, both results written together.
//! - `transcribed -> evaluated`: rubric scoring, evaluation row inserted
//!   before the status advances.
//!
//! Both transitions are idempotent: repeated triggers after a success
//! return the stored result without touching the external backends. The
//! core logic lives in plain async functions over the `Storage`,
//! `TextRecognizer` and `EssayEvaluator` traits; this module only wires
//! them to HTTP.

pub mod evaluate;
pub mod get;
pub mod reevaluate;
pub mod transcribe;

#[cfg(test)]
mod tests;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::EssaySystemError;
use crate::models::essays::requests::{EvaluateEssayRequest, TranscribeEssayRequest};
use crate::models::essays::responses::TranscriptionData;
use crate::models::evaluations::responses::EvaluationResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::ai::{EssayEvaluator, GeminiClient, GoogleVisionClient, TextRecognizer};
use crate::storage::Storage;

pub struct PipelineService {
    storage: Option<Arc<dyn Storage>>,
    recognizer: Arc<dyn TextRecognizer>,
    evaluator: Arc<dyn EssayEvaluator>,
}

impl PipelineService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            recognizer: Arc::new(GoogleVisionClient::from_config()),
            evaluator: Arc::new(GeminiClient::from_config()),
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // Trigger OCR + reconstruction
    pub async fn transcribe(
        &self,
        request: &HttpRequest,
        user_id: i64,
        req: TranscribeEssayRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);

        match transcribe::transcribe_essay(
            &storage,
            self.recognizer.as_ref(),
            self.evaluator.as_ref(),
            req.essay_id,
            user_id,
        )
        .await
        {
            Ok(outcome) => {
                let message = if outcome.already_transcribed {
                    "Essay already transcribed"
                } else {
                    "Text extracted and reconstructed successfully"
                };
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    TranscriptionData {
                        transcription: outcome.transcription,
                        confidence: outcome.confidence,
                    },
                    message,
                )))
            }
            Err(e) => Ok(pipeline_error_response(&e)),
        }
    }

    // Trigger rubric evaluation
    pub async fn evaluate(
        &self,
        request: &HttpRequest,
        user_id: i64,
        req: EvaluateEssayRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);

        match evaluate::evaluate_essay(
            &storage,
            self.evaluator.as_ref(),
            req.essay_id,
            user_id,
        )
        .await
        {
            Ok(outcome) => {
                let message = if outcome.already_evaluated {
                    "Essay already evaluated"
                } else {
                    "Essay evaluated successfully"
                };
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    EvaluationResponse::from(outcome.evaluation),
                    message,
                )))
            }
            Err(e) => Ok(pipeline_error_response(&e)),
        }
    }

    // Fetch the evaluation of an essay
    pub async fn get_evaluation(
        &self,
        request: &HttpRequest,
        user_id: i64,
        essay_id: i64,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);

        match get::get_essay_evaluation(&storage, essay_id, user_id).await {
            Ok(Some(evaluation)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                EvaluationResponse::from(evaluation),
                "Evaluation retrieved successfully",
            ))),
            Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::EvaluationNotFound,
                "Essay has not been evaluated yet",
            ))),
            Err(e) => Ok(pipeline_error_response(&e)),
        }
    }

    // Delete the evaluation so the essay can be re-evaluated
    pub async fn delete_evaluation(
        &self,
        request: &HttpRequest,
        user_id: i64,
        essay_id: i64,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);

        match reevaluate::delete_essay_evaluation(&storage, essay_id, user_id).await {
            Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Evaluation deleted, essay can be evaluated again",
            ))),
            Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::EvaluationNotFound,
                "Essay has no evaluation to delete",
            ))),
            Err(e) => Ok(pipeline_error_response(&e)),
        }
    }
}

/// Maps a pipeline error onto the HTTP status and error code of the API
/// contract. Upstream messages are propagated for diagnostics; they never
/// contain credentials.
pub(crate) fn pipeline_error_response(err: &EssaySystemError) -> HttpResponse {
    match err {
        EssaySystemError::NotFound(_) => HttpResponse::NotFound().json(
            ApiResponse::error_empty(ErrorCode::EssayNotFound, err.message()),
        ),
        EssaySystemError::PreconditionFailed(_) => HttpResponse::BadRequest().json(
            ApiResponse::error_empty(ErrorCode::EssayNotTranscribed, err.message()),
        ),
        EssaySystemError::TranscriptionTooShort(_) => HttpResponse::BadRequest().json(
            ApiResponse::error_empty(ErrorCode::TranscriptionTooShort, err.message()),
        ),
        EssaySystemError::Validation(_) => HttpResponse::BadRequest().json(
            ApiResponse::error_empty(ErrorCode::ValidationFailed, err.message()),
        ),
        EssaySystemError::OcrService(_) | EssaySystemError::OcrEmptyResult(_) => {
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::OcrFailed,
                format!("OCR processing failed: {}", err.message()),
            ))
        }
        EssaySystemError::AiService(_) => {
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::AiEvaluationFailed,
                format!("AI request failed: {}", err.message()),
            ))
        }
        EssaySystemError::InvalidAiResponse(_) => {
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InvalidAiResponse,
                format!("AI returned an invalid response: {}", err.message()),
            ))
        }
        _ => HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::InternalServerError,
            err.message(),
        )),
    }
}
