use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Titles of the five ENEM competencies, indexed by competency number - 1.
pub const COMPETENCY_TITLES: [&str; 5] = [
    "Domínio da língua portuguesa",
    "Compreensão do tema",
    "Organização de informações",
    "Mecanismos linguísticos",
    "Proposta de intervenção",
];

// Evaluation entity: one rubric evaluation of a transcribed essay.
// overall_score is always the sum of the five competency scores.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct Evaluation {
    pub id: i64,
    pub essay_id: i64,
    pub overall_score: i32,
    pub competency_1_score: i32,
    pub competency_2_score: i32,
    pub competency_3_score: i32,
    pub competency_4_score: i32,
    pub competency_5_score: i32,
    pub competency_1_feedback: String,
    pub competency_2_feedback: String,
    pub competency_3_feedback: String,
    pub competency_4_feedback: String,
    pub competency_5_feedback: String,
    pub general_feedback: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Data for inserting a new evaluation row. Built by the pipeline from a
/// validated AI result; `overall_score` is always computed from `scores`.
#[derive(Debug, Clone)]
pub struct CreateEvaluationData {
    pub essay_id: i64,
    pub overall_score: i32,
    pub scores: [i32; 5],
    pub feedbacks: [String; 5],
    pub general_feedback: String,
}

impl Evaluation {
    pub fn competency_scores(&self) -> [i32; 5] {
        [
            self.competency_1_score,
            self.competency_2_score,
            self.competency_3_score,
            self.competency_4_score,
            self.competency_5_score,
        ]
    }

    pub fn competency_feedbacks(&self) -> [&str; 5] {
        [
            &self.competency_1_feedback,
            &self.competency_2_feedback,
            &self.competency_3_feedback,
            &self.competency_4_feedback,
            &self.competency_5_feedback,
        ]
    }
}
