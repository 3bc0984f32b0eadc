use serde::Serialize;
use ts_rs::TS;

use crate::models::evaluations::entities::{COMPETENCY_TITLES, Evaluation};

/// One competency in the evaluation response.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct CompetencyScore {
    pub number: i32,
    pub title: String,
    pub score: i32,
    pub feedback: String,
}

/// Wire shape of an evaluation: the five competencies unrolled into a
/// list the frontend can render directly.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationResponse {
    pub id: i64,
    pub essay_id: i64,
    pub overall_score: i32,
    pub competencies: Vec<CompetencyScore>,
    pub general_feedback: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Evaluation> for EvaluationResponse {
    fn from(evaluation: Evaluation) -> Self {
        let competencies = evaluation
            .competency_scores()
            .into_iter()
            .zip(evaluation.competency_feedbacks())
            .enumerate()
            .map(|(i, (score, feedback))| CompetencyScore {
                number: i as i32 + 1,
                title: COMPETENCY_TITLES[i].to_string(),
                score,
                feedback: feedback.to_string(),
            })
            .collect();

        Self {
            id: evaluation.id,
            essay_id: evaluation.essay_id,
            overall_score: evaluation.overall_score,
            competencies,
            general_feedback: evaluation.general_feedback,
            created_at: evaluation.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_evaluation() -> Evaluation {
        Evaluation {
            id: 7,
            essay_id: 3,
            overall_score: 800,
            competency_1_score: 160,
            competency_2_score: 160,
            competency_3_score: 160,
            competency_4_score: 160,
            competency_5_score: 160,
            competency_1_feedback: "Bom domínio da norma culta.".to_string(),
            competency_2_feedback: "Tema bem compreendido.".to_string(),
            competency_3_feedback: "Argumentação organizada.".to_string(),
            competency_4_feedback: "Coesão adequada.".to_string(),
            competency_5_feedback: "Proposta viável e detalhada.".to_string(),
            general_feedback: "Redação consistente, com boa progressão.".to_string(),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_response_unrolls_competencies() {
        let response = EvaluationResponse::from(sample_evaluation());
        assert_eq!(response.competencies.len(), 5);
        assert_eq!(response.competencies[0].number, 1);
        assert_eq!(response.competencies[4].number, 5);
        assert_eq!(
            response.competencies[4].title,
            "Proposta de intervenção"
        );
        assert_eq!(response.overall_score, 800);
    }
}
