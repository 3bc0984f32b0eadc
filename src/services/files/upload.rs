use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::path::Path;

use super::FileService;
use crate::config::AppConfig;
use crate::middlewares::RequireJWT;
use crate::models::files::responses::FileUploadResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn handle_upload(
    service: &FileService,
    req: &HttpRequest,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let config = AppConfig::get();
    let max_size = config.upload.max_size;

    let user_id = match RequireJWT::extract_user_id(req) {
        Some(id) => id,
        None => {
            return Ok(
                HttpResponse::Unauthorized().json(ApiResponse::<()>::error_empty(
                    ErrorCode::Unauthorized,
                    "Unauthorized access, please login",
                )),
            );
        }
    };

    let mut file_uploaded = false;
    let mut extension = String::new();
    let mut content_type = String::new();
    let mut data: Vec<u8> = Vec::new();

    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        if name == "file" {
            if file_uploaded {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::MultifileUploadNotAllowed,
                    "Only one file can be uploaded at a time",
                )));
            }
            file_uploaded = true;

            let original_name = content_disposition
                .and_then(|cd| cd.get_filename())
                .map(|s| s.to_string())
                .unwrap_or_default();

            extension = Path::new(&original_name)
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| format!(".{}", ext.to_lowercase()))
                .unwrap_or_default();

            content_type = field
                .content_type()
                .map(|ct| ct.to_string())
                .unwrap_or_default();

            // Collect the field, bounding memory by the size limit
            while let Some(chunk) = field.next().await {
                let bytes = chunk?;
                if data.len() + bytes.len() > max_size {
                    return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                        ErrorCode::FileSizeExceeded,
                        "File size exceeds the limit",
                    )));
                }
                data.extend_from_slice(&bytes);
            }
        }
    }

    if !file_uploaded || data.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::FileNotFound,
            "No file found in upload payload",
        )));
    }

    // Type, magic bytes and size are validated by the store before any
    // disk write
    let stored = match service.get_images().store(&data, user_id, &extension) {
        Ok(stored) => stored,
        Err(crate::errors::EssaySystemError::Validation(msg)) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::FileTypeNotAllowed, msg)));
        }
        Err(e) => {
            tracing::error!("{}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::FileUploadFailed,
                    "Failed to store uploaded file",
                )),
            );
        }
    };

    let response = FileUploadResponse {
        path: stored.path,
        public_url: stored.public_url,
        size: data.len() as i64,
        content_type,
        created_at: chrono::Utc::now(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "File uploaded successfully")))
}
