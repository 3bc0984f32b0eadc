//! Gemini generative text client.
//!
//! Two operations against the same backend: reconstructing noisy OCR
//! output into clean prose, and scoring a transcription against the ENEM
//! rubric with a strict-JSON response.
//!
//! The rubric response is schema-validated immediately after parsing;
//! anything that does not match the expected shape is an
//! `InvalidAiResponse`, never a silent pass-through.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{EssayEvaluator, rubric};
use crate::config::AppConfig;
use crate::errors::{EssaySystemError, Result};

/// Minimum transcription length (in characters, trimmed) accepted for
/// evaluation. Shorter texts fail before any network call.
pub const MIN_TRANSCRIPTION_LEN: usize = 50;

/// Minimum length of each feedback string in a valid rubric response.
const MIN_FEEDBACK_LEN: usize = 10;

/// One competency in the rubric response.
#[derive(Debug, Clone, Deserialize)]
pub struct CompetencyResult {
    pub score: i32,
    pub feedback: String,
}

/// The strict-JSON shape the rubric prompt requests.
#[derive(Debug, Clone, Deserialize)]
pub struct AiEvaluationResult {
    pub competency_1: CompetencyResult,
    pub competency_2: CompetencyResult,
    pub competency_3: CompetencyResult,
    pub competency_4: CompetencyResult,
    pub competency_5: CompetencyResult,
    pub general_feedback: String,
}

impl AiEvaluationResult {
    pub fn competencies(&self) -> [&CompetencyResult; 5] {
        [
            &self.competency_1,
            &self.competency_2,
            &self.competency_3,
            &self.competency_4,
            &self.competency_5,
        ]
    }
}

/// Sum of the five competency scores. This is the only legitimate source
/// of an evaluation's overall score; it is never taken from the backend.
pub fn calculate_overall_score(result: &AiEvaluationResult) -> i32 {
    result.competencies().iter().map(|c| c.score).sum()
}

/// Rejects transcriptions too short to evaluate, before any network call.
pub fn ensure_evaluable(transcription: &str) -> Result<()> {
    if transcription.trim().chars().count() < MIN_TRANSCRIPTION_LEN {
        return Err(EssaySystemError::transcription_too_short(format!(
            "Transcription must be at least {MIN_TRANSCRIPTION_LEN} characters to evaluate"
        )));
    }
    Ok(())
}

/// Parses the backend's JSON text and validates its shape and values.
pub fn parse_evaluation(text: &str) -> Result<AiEvaluationResult> {
    let result: AiEvaluationResult = serde_json::from_str(text).map_err(|e| {
        EssaySystemError::invalid_ai_response(format!("Malformed evaluation JSON: {e}"))
    })?;

    validate_evaluation_result(&result)?;
    Ok(result)
}

// Range-checks the scores and length-checks the feedback strings.
// Scores are accepted anywhere in [0, 200]; the discrete bands are
// requested in the prompt but not enforced here.
fn validate_evaluation_result(result: &AiEvaluationResult) -> Result<()> {
    for (i, competency) in result.competencies().iter().enumerate() {
        let number = i + 1;
        if competency.score < 0 || competency.score > 200 {
            return Err(EssaySystemError::invalid_ai_response(format!(
                "Invalid score for competency_{number}: {}",
                competency.score
            )));
        }
        if competency.feedback.chars().count() < MIN_FEEDBACK_LEN {
            return Err(EssaySystemError::invalid_ai_response(format!(
                "Invalid feedback for competency_{number}"
            )));
        }
    }

    if result.general_feedback.chars().count() < MIN_FEEDBACK_LEN {
        return Err(EssaySystemError::invalid_ai_response(
            "Invalid general_feedback in evaluation result",
        ));
    }

    Ok(())
}

pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl GeminiClient {
    pub fn from_config() -> Self {
        let config = AppConfig::get();
        Self {
            client: Client::new(),
            api_key: config.ai.api_key.clone(),
            endpoint: config.ai.endpoint.clone(),
            model: config.ai.model.clone(),
            temperature: config.ai.temperature,
            max_output_tokens: config.ai.max_output_tokens,
        }
    }

    async fn generate(&self, prompt: String, json_response: bool) -> Result<String> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: json_response.then(|| "application/json".to_string()),
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        };

        debug!(model = %self.model, "Sending request to Gemini");

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.endpoint, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EssaySystemError::ai_service(format!("Gemini HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(EssaySystemError::ai_service(format!(
                "Gemini returned {status}: {error_body}"
            )));
        }

        let content: GenerateContentResponse = response.json().await.map_err(|e| {
            EssaySystemError::ai_service(format!("Failed to parse Gemini response: {e}"))
        })?;

        content
            .candidates
            .and_then(|mut c| if c.is_empty() { None } else { Some(c.remove(0)) })
            .and_then(|c| c.content)
            .and_then(|mut c| {
                if c.parts.is_empty() {
                    None
                } else {
                    Some(c.parts.remove(0).text)
                }
            })
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| EssaySystemError::ai_service("Gemini returned no text"))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}

#[async_trait]
impl EssayEvaluator for GeminiClient {
    async fn reconstruct(&self, raw_text: &str) -> Result<String> {
        let text = self
            .generate(rubric::reconstruction_prompt(raw_text), false)
            .await?;
        Ok(text.trim().to_string())
    }

    async fn evaluate(&self, transcription: &str) -> Result<AiEvaluationResult> {
        ensure_evaluable(transcription)?;

        let text = self
            .generate(rubric::evaluation_prompt(transcription), true)
            .await?;

        parse_evaluation(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_json(score: i32) -> String {
        let competency = |s: i32| {
            format!(r#"{{"score": {s}, "feedback": "Feedback detalhado da competência."}}"#)
        };
        format!(
            r#"{{
                "competency_1": {c1},
                "competency_2": {c2},
                "competency_3": {c3},
                "competency_4": {c4},
                "competency_5": {c5},
                "general_feedback": "Resumo geral da avaliação da redação."
            }}"#,
            c1 = competency(score),
            c2 = competency(score),
            c3 = competency(score),
            c4 = competency(score),
            c5 = competency(score),
        )
    }

    #[test]
    fn test_parse_valid_evaluation() {
        let result = parse_evaluation(&valid_json(160)).unwrap();
        assert_eq!(result.competency_1.score, 160);
        assert_eq!(calculate_overall_score(&result), 800);
    }

    #[test]
    fn test_overall_score_is_the_sum() {
        let json = r#"{
            "competency_1": {"score": 0, "feedback": "Feedback detalhado."},
            "competency_2": {"score": 40, "feedback": "Feedback detalhado."},
            "competency_3": {"score": 80, "feedback": "Feedback detalhado."},
            "competency_4": {"score": 120, "feedback": "Feedback detalhado."},
            "competency_5": {"score": 200, "feedback": "Feedback detalhado."},
            "general_feedback": "Resumo geral da avaliação."
        }"#;
        let result = parse_evaluation(json).unwrap();
        assert_eq!(calculate_overall_score(&result), 440);
    }

    #[test]
    fn test_overall_score_bounds() {
        let zero = parse_evaluation(&valid_json(0)).unwrap();
        assert_eq!(calculate_overall_score(&zero), 0);

        let max = parse_evaluation(&valid_json(200)).unwrap();
        assert_eq!(calculate_overall_score(&max), 1000);
    }

    #[test]
    fn test_missing_competency_rejected() {
        let json = r#"{
            "competency_1": {"score": 160, "feedback": "Feedback detalhado."},
            "competency_2": {"score": 160, "feedback": "Feedback detalhado."},
            "competency_3": {"score": 160, "feedback": "Feedback detalhado."},
            "competency_5": {"score": 160, "feedback": "Feedback detalhado."},
            "general_feedback": "Resumo geral da avaliação."
        }"#;
        let err = parse_evaluation(json).unwrap_err();
        assert_eq!(err.code(), "E017");
        assert!(err.message().contains("competency_4"));
    }

    #[test]
    fn test_out_of_range_score_rejected_not_clamped() {
        let err = parse_evaluation(&valid_json(250)).unwrap_err();
        assert_eq!(err.code(), "E017");

        let err = parse_evaluation(&valid_json(-40)).unwrap_err();
        assert_eq!(err.code(), "E017");
    }

    #[test]
    fn test_off_band_score_in_range_is_accepted() {
        // 150 is not one of the official bands, but only the 0-200 range
        // is enforced; the bands live in the prompt.
        let result = parse_evaluation(&valid_json(150)).unwrap();
        assert_eq!(calculate_overall_score(&result), 750);
    }

    #[test]
    fn test_short_feedback_rejected() {
        let json = r#"{
            "competency_1": {"score": 160, "feedback": "curto"},
            "competency_2": {"score": 160, "feedback": "Feedback detalhado."},
            "competency_3": {"score": 160, "feedback": "Feedback detalhado."},
            "competency_4": {"score": 160, "feedback": "Feedback detalhado."},
            "competency_5": {"score": 160, "feedback": "Feedback detalhado."},
            "general_feedback": "Resumo geral da avaliação."
        }"#;
        let err = parse_evaluation(json).unwrap_err();
        assert_eq!(err.code(), "E017");
        assert!(err.message().contains("competency_1"));
    }

    #[test]
    fn test_short_general_feedback_rejected() {
        let json = r#"{
            "competency_1": {"score": 160, "feedback": "Feedback detalhado."},
            "competency_2": {"score": 160, "feedback": "Feedback detalhado."},
            "competency_3": {"score": 160, "feedback": "Feedback detalhado."},
            "competency_4": {"score": 160, "feedback": "Feedback detalhado."},
            "competency_5": {"score": 160, "feedback": "Feedback detalhado."},
            "general_feedback": "ok"
        }"#;
        let err = parse_evaluation(json).unwrap_err();
        assert_eq!(err.code(), "E017");
        assert!(err.message().contains("general_feedback"));
    }

    #[test]
    fn test_non_json_rejected() {
        let err = parse_evaluation("A redação está ótima, nota 800!").unwrap_err();
        assert_eq!(err.code(), "E017");
    }

    #[test]
    fn test_ensure_evaluable() {
        assert!(ensure_evaluable("curta demais").is_err());
        assert_eq!(
            ensure_evaluable("   ").unwrap_err().code(),
            "E018"
        );

        let long_enough = "O Brasil enfrenta grandes desafios na área da educação pública.";
        assert!(long_enough.chars().count() >= MIN_TRANSCRIPTION_LEN);
        assert!(ensure_evaluable(long_enough).is_ok());
    }
}
