use crate::models::common::pagination::PaginationQuery;
use crate::models::essays::entities::EssayStatus;
use serde::Deserialize;
use ts_rs::TS;

/// Essay creation request. The image must have been uploaded beforehand;
/// `image_path` and `image_url` come from the upload response.
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/essay.ts")]
pub struct CreateEssayRequest {
    pub title: String,
    pub theme: Option<String>,
    pub image_path: String,
    pub image_url: String,
}

/// Essay list query parameters (HTTP request)
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/essay.ts")]
pub struct EssayListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<EssayStatus>,
    pub search: Option<String>,
}

// Internal query parameters for the storage layer
#[derive(Debug, Clone)]
pub struct EssayListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<EssayStatus>,
    pub search: Option<String>,
}

/// Body of the transcription trigger (`POST /api/v1/ocr`).
/// Accepts both `essay_id` and the legacy `essayId` key.
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/essay.ts")]
pub struct TranscribeEssayRequest {
    #[serde(alias = "essayId")]
    pub essay_id: i64,
}

/// Body of the evaluation trigger (`POST /api/v1/evaluate`).
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/essay.ts")]
pub struct EvaluateEssayRequest {
    #[serde(alias = "essayId")]
    pub essay_id: i64,
}
