use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::{info, warn};

use super::EssayService;
use crate::errors::{EssaySystemError, Result};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::storage::image_store::ImageGateway;

/// Deletes one essay.
///
/// Image removal is best-effort: a storage outage must never leave the
/// user unable to delete their record, so failures are logged and the
/// database delete proceeds. The row delete cascades to the evaluation;
/// its failure is the only hard error here.
pub async fn delete_essay(
    storage: &Arc<dyn Storage>,
    images: &dyn ImageGateway,
    essay_id: i64,
    user_id: i64,
) -> Result<()> {
    let essay = storage
        .get_essay_by_id(essay_id, user_id)
        .await?
        .ok_or_else(|| EssaySystemError::not_found("Essay not found"))?;

    if let Err(e) = images.remove(&essay.image_path) {
        warn!(
            "Failed to remove image '{}' of essay {}: {}",
            essay.image_path, essay_id, e
        );
    }

    let deleted = storage.delete_essay(essay_id, user_id).await?;
    if !deleted {
        return Err(EssaySystemError::not_found("Essay not found"));
    }

    info!("Essay {} deleted", essay_id);
    Ok(())
}

pub async fn handle_delete(
    service: &EssayService,
    request: &HttpRequest,
    user_id: i64,
    essay_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match delete_essay(&storage, service.get_images(), essay_id, user_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Essay deleted"))),
        Err(EssaySystemError::NotFound(msg)) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::EssayNotFound, msg))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::EssayDeleteFailed,
                format!("Failed to delete essay: {e}"),
            )),
        ),
    }
}
