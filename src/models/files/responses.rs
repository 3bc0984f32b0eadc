use serde::Serialize;
use ts_rs::TS;

/// Result of an essay image upload.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/file.ts")]
pub struct FileUploadResponse {
    /// Object store path, to be echoed back on essay creation
    pub path: String,
    /// Public URL the OCR backend (and the frontend) can fetch
    pub public_url: String,
    pub size: i64,
    pub content_type: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
