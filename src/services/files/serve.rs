use actix_web::{HttpResponse, Result as ActixResult, http::header};
use std::fs;

use super::FileService;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::image_store::content_type_for;

/// Serves a stored essay image.
///
/// This route is public by design: the image URL must be fetchable by the
/// OCR backend. Names are random enough that guessing them is not a
/// practical concern, mirroring public-bucket object storage.
pub async fn handle_serve(
    service: &FileService,
    owner_id: i64,
    name: String,
) -> ActixResult<HttpResponse> {
    let Some(path) = service.get_images().resolve(owner_id, &name) else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::FileNotFound,
            "File not found",
        )));
    };

    match fs::read(&path) {
        Ok(bytes) => Ok(HttpResponse::Ok()
            .insert_header((header::CONTENT_TYPE, content_type_for(&name)))
            .insert_header((header::CACHE_CONTROL, "public, max-age=3600"))
            .body(bytes)),
        Err(e) => {
            tracing::error!("Failed to read image file {:?}: {}", path, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to read file",
                )),
            )
        }
    }
}
