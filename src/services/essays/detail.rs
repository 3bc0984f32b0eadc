use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::EssayService;
use crate::models::essays::entities::EssayStatus;
use crate::models::essays::responses::EssayDetailResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_essay(
    service: &EssayService,
    request: &HttpRequest,
    user_id: i64,
    essay_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let mut essay = match storage.get_essay_by_id(essay_id, user_id).await {
        Ok(Some(essay)) => essay,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::EssayNotFound,
                "Essay not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to query essay: {e}"),
                )),
            );
        }
    };

    let evaluation = match storage.get_evaluation_by_essay_id(essay_id).await {
        Ok(evaluation) => evaluation,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to query evaluation: {e}"),
                )),
            );
        }
    };

    // Self-healing read: an evaluation exists but the status write lagged
    // behind (e.g. a crash right after the evaluation insert)
    if evaluation.is_some() && essay.status != EssayStatus::Evaluated {
        info!(
            "Essay {} has an evaluation but status '{}', reconciling",
            essay_id, essay.status
        );
        match storage
            .set_essay_status(essay_id, user_id, EssayStatus::Evaluated)
            .await
        {
            Ok(true) => essay.status = EssayStatus::Evaluated,
            Ok(false) => {}
            Err(e) => warn!("Failed to reconcile status of essay {}: {}", essay_id, e),
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        EssayDetailResponse { essay, evaluation },
        "Essay retrieved successfully",
    )))
}
