use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::PaginationInfo;
use crate::models::essays::entities::Essay;
use crate::models::evaluations::entities::Evaluation;

/// Essay list entry; carries the overall score once evaluated.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/essay.ts")]
pub struct EssayListItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub essay: Essay,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/essay.ts")]
pub struct EssayListResponse {
    pub items: Vec<EssayListItem>,
    pub pagination: PaginationInfo,
}

/// Essay detail with its evaluation, when one exists.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/essay.ts")]
pub struct EssayDetailResponse {
    #[serde(flatten)]
    #[ts(flatten)]
    pub essay: Essay,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
}

/// Result of the transcription step.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/essay.ts")]
pub struct TranscriptionData {
    pub transcription: String,
    /// OCR confidence for a fresh run; absent when the stored
    /// transcription was returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}
