pub mod auth;
pub mod common;
pub mod essays;
pub mod evaluations;
pub mod files;
pub mod users;

pub use common::pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;

/// Business error codes carried in the API response envelope.
///
/// Grouped by the HTTP status family they are usually returned with:
/// 40xxx for client errors, 50xxx for server errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,

    // 400 family
    BadRequest = 40000,
    ValidationFailed = 40001,
    EssayNotTranscribed = 40002,
    TranscriptionTooShort = 40003,
    InvalidEssayTitle = 40004,
    InvalidEssayTheme = 40005,
    FileTypeNotAllowed = 40010,
    FileSizeExceeded = 40011,
    MultifileUploadNotAllowed = 40012,
    UserNameInvalid = 40020,
    UserEmailInvalid = 40021,
    UserPasswordInvalid = 40022,

    // 401 family
    Unauthorized = 40100,
    AuthFailed = 40101,

    // 404 family
    NotFound = 40400,
    UserNotFound = 40401,
    EssayNotFound = 40402,
    EvaluationNotFound = 40403,
    FileNotFound = 40404,

    // 409 family
    UserNameAlreadyExists = 40900,
    UserEmailAlreadyExists = 40901,

    // 500 family
    InternalServerError = 50000,
    RegisterFailed = 50001,
    EssayCreationFailed = 50002,
    EssayDeleteFailed = 50003,
    FileUploadFailed = 50004,
    OcrFailed = 50010,
    AiEvaluationFailed = 50011,
    InvalidAiResponse = 50012,
}

/// Recorded once at process start; exposed for uptime reporting.
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
