//! Pipeline orchestration tests over in-memory mocks.
//!
//! External backends are counted so the idempotence guarantees can be
//! asserted: a short-circuited transition must not touch them.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::errors::{EssaySystemError, Result};
use crate::models::essays::entities::{Essay, EssayStatus};
use crate::models::essays::requests::{CreateEssayRequest, EssayListQuery};
use crate::models::essays::responses::EssayListResponse;
use crate::models::evaluations::entities::{CreateEvaluationData, Evaluation};
use crate::models::users::entities::User;
use crate::models::users::requests::{CreateUserRequest, UpdateProfileRequest};
use crate::services::ai::{
    AiEvaluationResult, EssayEvaluator, OcrOutcome, TextRecognizer, gemini::CompetencyResult,
};
use crate::services::essays::delete::delete_essay;
use crate::services::pipeline::{evaluate, get, reevaluate, transcribe};
use crate::storage::Storage;
use crate::storage::image_store::{ImageGateway, StoredImage};

const OWNER: i64 = 1;
const INTRUDER: i64 = 2;

const RAW_TEXT: &str = "O Brasil en frenta grandes desafios na edu cacao publica.";
const CLEAN_TEXT: &str =
    "O Brasil enfrenta grandes desafios na educação pública, que exigem políticas consistentes.";

fn make_essay(id: i64, status: EssayStatus, transcription: Option<&str>) -> Essay {
    Essay {
        id,
        user_id: OWNER,
        title: "Redação Teste".to_string(),
        theme: Some("Educação no Brasil".to_string()),
        image_path: format!("{OWNER}/img-{id}.png"),
        image_url: format!("https://x/files/{OWNER}/img-{id}.png"),
        raw_transcription: transcription.map(|_| RAW_TEXT.to_string()),
        transcription: transcription.map(|t| t.to_string()),
        status,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    }
}

#[derive(Default)]
struct MockStorage {
    essays: Mutex<HashMap<i64, Essay>>,
    evaluations: Mutex<HashMap<i64, Evaluation>>,
    next_evaluation_id: AtomicI64,
    fail_status_update: AtomicBool,
    steal_transcription_race: AtomicBool,
}

impl MockStorage {
    fn with_essay(essay: Essay) -> Arc<Self> {
        let storage = Self::default();
        storage.next_evaluation_id.store(1, Ordering::SeqCst);
        storage.essays.lock().unwrap().insert(essay.id, essay);
        Arc::new(storage)
    }

    fn essay(&self, id: i64) -> Option<Essay> {
        self.essays.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn create_user(&self, _user: CreateUserRequest) -> Result<User> {
        unimplemented!("not used in pipeline tests")
    }

    async fn get_user_by_id(&self, _id: i64) -> Result<Option<User>> {
        Ok(None)
    }

    async fn get_user_by_username(&self, _username: &str) -> Result<Option<User>> {
        Ok(None)
    }

    async fn get_user_by_email(&self, _email: &str) -> Result<Option<User>> {
        Ok(None)
    }

    async fn get_user_by_username_or_email(&self, _identifier: &str) -> Result<Option<User>> {
        Ok(None)
    }

    async fn update_last_login(&self, _id: i64) -> Result<bool> {
        Ok(false)
    }

    async fn update_user_profile(
        &self,
        _id: i64,
        _update: UpdateProfileRequest,
    ) -> Result<Option<User>> {
        Ok(None)
    }

    async fn create_essay(&self, _user_id: i64, _essay: CreateEssayRequest) -> Result<Essay> {
        unimplemented!("not used in pipeline tests")
    }

    async fn get_essay_by_id(&self, essay_id: i64, user_id: i64) -> Result<Option<Essay>> {
        Ok(self
            .essays
            .lock()
            .unwrap()
            .get(&essay_id)
            .filter(|e| e.user_id == user_id)
            .cloned())
    }

    async fn list_essays_with_pagination(
        &self,
        _user_id: i64,
        _query: EssayListQuery,
    ) -> Result<EssayListResponse> {
        unimplemented!("not used in pipeline tests")
    }

    async fn set_essay_transcription(
        &self,
        essay_id: i64,
        user_id: i64,
        raw_transcription: &str,
        transcription: &str,
    ) -> Result<bool> {
        let mut essays = self.essays.lock().unwrap();
        let Some(essay) = essays.get_mut(&essay_id) else {
            return Ok(false);
        };
        if essay.user_id != user_id {
            return Ok(false);
        }

        if self.steal_transcription_race.load(Ordering::SeqCst) {
            // Another request won the conditional write first
            essay.raw_transcription = Some(RAW_TEXT.to_string());
            essay.transcription = Some("Texto do vencedor da corrida de transcrição.".to_string());
            essay.status = EssayStatus::Transcribed;
            return Ok(false);
        }

        if essay.status != EssayStatus::Uploaded {
            return Ok(false);
        }

        essay.raw_transcription = Some(raw_transcription.to_string());
        essay.transcription = Some(transcription.to_string());
        essay.status = EssayStatus::Transcribed;
        Ok(true)
    }

    async fn set_essay_status(
        &self,
        essay_id: i64,
        user_id: i64,
        status: EssayStatus,
    ) -> Result<bool> {
        if self.fail_status_update.load(Ordering::SeqCst) {
            return Err(EssaySystemError::database_operation(
                "simulated status update failure",
            ));
        }
        let mut essays = self.essays.lock().unwrap();
        match essays.get_mut(&essay_id) {
            Some(essay) if essay.user_id == user_id => {
                essay.status = status;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_essay(&self, essay_id: i64, user_id: i64) -> Result<bool> {
        let mut essays = self.essays.lock().unwrap();
        match essays.get(&essay_id) {
            Some(essay) if essay.user_id == user_id => {
                essays.remove(&essay_id);
                // FK cascade
                self.evaluations.lock().unwrap().remove(&essay_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn create_evaluation(&self, data: CreateEvaluationData) -> Result<Evaluation> {
        let id = self.next_evaluation_id.fetch_add(1, Ordering::SeqCst);
        let [s1, s2, s3, s4, s5] = data.scores;
        let [f1, f2, f3, f4, f5] = data.feedbacks;
        let evaluation = Evaluation {
            id,
            essay_id: data.essay_id,
            overall_score: data.overall_score,
            competency_1_score: s1,
            competency_2_score: s2,
            competency_3_score: s3,
            competency_4_score: s4,
            competency_5_score: s5,
            competency_1_feedback: f1,
            competency_2_feedback: f2,
            competency_3_feedback: f3,
            competency_4_feedback: f4,
            competency_5_feedback: f5,
            general_feedback: data.general_feedback,
            created_at: chrono::Utc::now(),
        };
        self.evaluations
            .lock()
            .unwrap()
            .insert(data.essay_id, evaluation.clone());
        Ok(evaluation)
    }

    async fn get_evaluation_by_essay_id(&self, essay_id: i64) -> Result<Option<Evaluation>> {
        Ok(self.evaluations.lock().unwrap().get(&essay_id).cloned())
    }

    async fn delete_evaluation_by_essay_id(&self, essay_id: i64) -> Result<bool> {
        Ok(self.evaluations.lock().unwrap().remove(&essay_id).is_some())
    }
}

#[derive(Default)]
struct MockRecognizer {
    calls: AtomicUsize,
}

#[async_trait]
impl TextRecognizer for MockRecognizer {
    async fn extract_text(&self, _image_url: &str) -> Result<OcrOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(OcrOutcome {
            text: RAW_TEXT.to_string(),
            confidence: 0.95,
        })
    }
}

#[derive(Default)]
struct MockEvaluator {
    reconstruct_calls: AtomicUsize,
    evaluate_calls: AtomicUsize,
}

#[async_trait]
impl EssayEvaluator for MockEvaluator {
    async fn reconstruct(&self, _raw_text: &str) -> Result<String> {
        self.reconstruct_calls.fetch_add(1, Ordering::SeqCst);
        Ok(CLEAN_TEXT.to_string())
    }

    async fn evaluate(&self, _transcription: &str) -> Result<AiEvaluationResult> {
        self.evaluate_calls.fetch_add(1, Ordering::SeqCst);
        let competency = |score: i32| CompetencyResult {
            score,
            feedback: "Feedback detalhado da competência.".to_string(),
        };
        Ok(AiEvaluationResult {
            competency_1: competency(160),
            competency_2: competency(160),
            competency_3: competency(160),
            competency_4: competency(160),
            competency_5: competency(160),
            general_feedback: "Resumo geral da avaliação da redação.".to_string(),
        })
    }
}

/// Image gateway that always fails on remove.
struct BrokenImageStore;

impl ImageGateway for BrokenImageStore {
    fn store(&self, _data: &[u8], _owner_id: i64, _extension: &str) -> Result<StoredImage> {
        Err(EssaySystemError::file_operation("store not supported"))
    }

    fn remove(&self, _path: &str) -> Result<()> {
        Err(EssaySystemError::file_operation("simulated storage outage"))
    }

    fn resolve(&self, _owner_id: i64, _name: &str) -> Option<std::path::PathBuf> {
        None
    }
}

#[tokio::test]
async fn test_transcription_populates_both_fields_and_advances_status() {
    let storage = MockStorage::with_essay(make_essay(1, EssayStatus::Uploaded, None));
    let dyn_storage: Arc<dyn Storage> = storage.clone();
    let recognizer = MockRecognizer::default();
    let evaluator = MockEvaluator::default();

    let outcome = transcribe::transcribe_essay(&dyn_storage, &recognizer, &evaluator, 1, OWNER)
        .await
        .unwrap();

    assert!(!outcome.already_transcribed);
    assert_eq!(outcome.transcription, CLEAN_TEXT);
    assert_eq!(outcome.confidence, Some(0.95));

    let essay = storage.essay(1).unwrap();
    assert_eq!(essay.status, EssayStatus::Transcribed);
    assert_eq!(essay.raw_transcription.as_deref(), Some(RAW_TEXT));
    assert_eq!(essay.transcription.as_deref(), Some(CLEAN_TEXT));
}

#[tokio::test]
async fn test_transcription_is_idempotent() {
    let storage = MockStorage::with_essay(make_essay(1, EssayStatus::Uploaded, None));
    let dyn_storage: Arc<dyn Storage> = storage.clone();
    let recognizer = MockRecognizer::default();
    let evaluator = MockEvaluator::default();

    let first = transcribe::transcribe_essay(&dyn_storage, &recognizer, &evaluator, 1, OWNER)
        .await
        .unwrap();
    let second = transcribe::transcribe_essay(&dyn_storage, &recognizer, &evaluator, 1, OWNER)
        .await
        .unwrap();

    // One OCR call and one reconstruction call in total
    assert_eq!(recognizer.calls.load(Ordering::SeqCst), 1);
    assert_eq!(evaluator.reconstruct_calls.load(Ordering::SeqCst), 1);

    assert!(second.already_transcribed);
    assert_eq!(second.transcription, first.transcription);
    assert_eq!(second.confidence, None);
}

#[tokio::test]
async fn test_transcription_race_returns_winner_text() {
    let storage = MockStorage::with_essay(make_essay(1, EssayStatus::Uploaded, None));
    storage.steal_transcription_race.store(true, Ordering::SeqCst);
    let dyn_storage: Arc<dyn Storage> = storage.clone();
    let recognizer = MockRecognizer::default();
    let evaluator = MockEvaluator::default();

    let outcome = transcribe::transcribe_essay(&dyn_storage, &recognizer, &evaluator, 1, OWNER)
        .await
        .unwrap();

    assert!(outcome.already_transcribed);
    assert_eq!(
        outcome.transcription,
        "Texto do vencedor da corrida de transcrição."
    );
}

#[tokio::test]
async fn test_transcription_unknown_essay_is_not_found() {
    let storage = MockStorage::with_essay(make_essay(1, EssayStatus::Uploaded, None));
    let dyn_storage: Arc<dyn Storage> = storage.clone();
    let recognizer = MockRecognizer::default();
    let evaluator = MockEvaluator::default();

    let err = transcribe::transcribe_essay(&dyn_storage, &recognizer, &evaluator, 99, OWNER)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E006");
    assert_eq!(recognizer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_tenant_isolation_reads_as_not_found() {
    let storage = MockStorage::with_essay(make_essay(1, EssayStatus::Transcribed, Some(CLEAN_TEXT)));
    let dyn_storage: Arc<dyn Storage> = storage.clone();
    let recognizer = MockRecognizer::default();
    let evaluator = MockEvaluator::default();

    let err = transcribe::transcribe_essay(&dyn_storage, &recognizer, &evaluator, 1, INTRUDER)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E006");

    let err = evaluate::evaluate_essay(&dyn_storage, &evaluator, 1, INTRUDER)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E006");

    let err = reevaluate::delete_essay_evaluation(&dyn_storage, 1, INTRUDER)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E006");

    let err = delete_essay(&dyn_storage, &BrokenImageStore, 1, INTRUDER)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E006");

    // No external call was ever made, and the essay is untouched
    assert_eq!(recognizer.calls.load(Ordering::SeqCst), 0);
    assert_eq!(evaluator.evaluate_calls.load(Ordering::SeqCst), 0);
    assert!(storage.essay(1).is_some());
}

#[tokio::test]
async fn test_evaluation_requires_transcription() {
    let storage = MockStorage::with_essay(make_essay(1, EssayStatus::Uploaded, None));
    let dyn_storage: Arc<dyn Storage> = storage.clone();
    let evaluator = MockEvaluator::default();

    let err = evaluate::evaluate_essay(&dyn_storage, &evaluator, 1, OWNER)
        .await
        .unwrap_err();

    assert_eq!(err.code(), "E019");
    // Fail-fast: the backend was never called
    assert_eq!(evaluator.evaluate_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_evaluation_scores_and_advances_status() {
    let storage = MockStorage::with_essay(make_essay(1, EssayStatus::Transcribed, Some(CLEAN_TEXT)));
    let dyn_storage: Arc<dyn Storage> = storage.clone();
    let evaluator = MockEvaluator::default();

    let outcome = evaluate::evaluate_essay(&dyn_storage, &evaluator, 1, OWNER)
        .await
        .unwrap();

    assert!(!outcome.already_evaluated);
    assert_eq!(outcome.evaluation.overall_score, 800);
    assert_eq!(outcome.evaluation.competency_scores(), [160; 5]);
    assert_eq!(storage.essay(1).unwrap().status, EssayStatus::Evaluated);
}

#[tokio::test]
async fn test_evaluation_is_idempotent() {
    let storage = MockStorage::with_essay(make_essay(1, EssayStatus::Transcribed, Some(CLEAN_TEXT)));
    let dyn_storage: Arc<dyn Storage> = storage.clone();
    let evaluator = MockEvaluator::default();

    let first = evaluate::evaluate_essay(&dyn_storage, &evaluator, 1, OWNER)
        .await
        .unwrap();
    let second = evaluate::evaluate_essay(&dyn_storage, &evaluator, 1, OWNER)
        .await
        .unwrap();

    // Scoring happened exactly once
    assert_eq!(evaluator.evaluate_calls.load(Ordering::SeqCst), 1);
    assert!(second.already_evaluated);
    assert_eq!(second.evaluation.id, first.evaluation.id);
    assert_eq!(second.evaluation.overall_score, first.evaluation.overall_score);
}

#[tokio::test]
async fn test_evaluation_survives_status_update_failure() {
    let storage = MockStorage::with_essay(make_essay(1, EssayStatus::Transcribed, Some(CLEAN_TEXT)));
    storage.fail_status_update.store(true, Ordering::SeqCst);
    let dyn_storage: Arc<dyn Storage> = storage.clone();
    let evaluator = MockEvaluator::default();

    // The evaluation is durable even though the status write failed
    let outcome = evaluate::evaluate_essay(&dyn_storage, &evaluator, 1, OWNER)
        .await
        .unwrap();
    assert_eq!(outcome.evaluation.overall_score, 800);
    assert_eq!(storage.essay(1).unwrap().status, EssayStatus::Transcribed);

    // The read path reconciles the lagging status
    storage.fail_status_update.store(false, Ordering::SeqCst);
    let evaluation = get::get_essay_evaluation(&dyn_storage, 1, OWNER)
        .await
        .unwrap();
    assert!(evaluation.is_some());
    assert_eq!(storage.essay(1).unwrap().status, EssayStatus::Evaluated);
}

#[tokio::test]
async fn test_delete_evaluation_rolls_status_back() {
    let storage = MockStorage::with_essay(make_essay(1, EssayStatus::Transcribed, Some(CLEAN_TEXT)));
    let dyn_storage: Arc<dyn Storage> = storage.clone();
    let evaluator = MockEvaluator::default();

    evaluate::evaluate_essay(&dyn_storage, &evaluator, 1, OWNER)
        .await
        .unwrap();
    assert_eq!(storage.essay(1).unwrap().status, EssayStatus::Evaluated);

    let removed = reevaluate::delete_essay_evaluation(&dyn_storage, 1, OWNER)
        .await
        .unwrap();
    assert!(removed);
    assert_eq!(storage.essay(1).unwrap().status, EssayStatus::Transcribed);

    // A second delete finds nothing
    let removed = reevaluate::delete_essay_evaluation(&dyn_storage, 1, OWNER)
        .await
        .unwrap();
    assert!(!removed);

    // Re-evaluation is a fresh scoring call
    let outcome = evaluate::evaluate_essay(&dyn_storage, &evaluator, 1, OWNER)
        .await
        .unwrap();
    assert!(!outcome.already_evaluated);
    assert_eq!(evaluator.evaluate_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_delete_essay_cascades_despite_image_failure() {
    let storage = MockStorage::with_essay(make_essay(1, EssayStatus::Transcribed, Some(CLEAN_TEXT)));
    let dyn_storage: Arc<dyn Storage> = storage.clone();
    let evaluator = MockEvaluator::default();

    evaluate::evaluate_essay(&dyn_storage, &evaluator, 1, OWNER)
        .await
        .unwrap();

    // Image removal fails, the delete still succeeds and cascades
    delete_essay(&dyn_storage, &BrokenImageStore, 1, OWNER)
        .await
        .unwrap();

    assert!(storage.essay(1).is_none());
    assert!(
        storage
            .get_evaluation_by_essay_id(1)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_end_to_end_upload_to_evaluated() {
    let storage = MockStorage::with_essay(make_essay(1, EssayStatus::Uploaded, None));
    let dyn_storage: Arc<dyn Storage> = storage.clone();
    let recognizer = MockRecognizer::default();
    let evaluator = MockEvaluator::default();

    let transcription =
        transcribe::transcribe_essay(&dyn_storage, &recognizer, &evaluator, 1, OWNER)
            .await
            .unwrap();
    assert!(transcription.transcription.chars().count() >= 50);
    assert_eq!(storage.essay(1).unwrap().status, EssayStatus::Transcribed);

    let evaluation = evaluate::evaluate_essay(&dyn_storage, &evaluator, 1, OWNER)
        .await
        .unwrap();
    assert_eq!(evaluation.evaluation.overall_score, 800);
    assert_eq!(storage.essay(1).unwrap().status, EssayStatus::Evaluated);

    // Re-triggering returns the identical overall score with no new AI call
    let again = evaluate::evaluate_essay(&dyn_storage, &evaluator, 1, OWNER)
        .await
        .unwrap();
    assert_eq!(again.evaluation.overall_score, 800);
    assert_eq!(evaluator.evaluate_calls.load(Ordering::SeqCst), 1);
}
