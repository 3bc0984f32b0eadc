use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireJWT};
use crate::models::essays::requests::{EvaluateEssayRequest, TranscribeEssayRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::PipelineService;

// Lazily created global PipelineService instance
static PIPELINE_SERVICE: Lazy<PipelineService> = Lazy::new(PipelineService::new_lazy);

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "Unauthorized access, please login",
    ))
}

// Trigger OCR + reconstruction for an essay
pub async fn trigger_ocr(
    req: HttpRequest,
    body: web::Json<TranscribeEssayRequest>,
) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => return Ok(unauthorized()),
    };

    PIPELINE_SERVICE
        .transcribe(&req, user_id, body.into_inner())
        .await
}

// Trigger rubric evaluation for an essay
pub async fn trigger_evaluation(
    req: HttpRequest,
    body: web::Json<EvaluateEssayRequest>,
) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => return Ok(unauthorized()),
    };

    PIPELINE_SERVICE
        .evaluate(&req, user_id, body.into_inner())
        .await
}

// Route configuration
pub fn configure_pipeline_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .wrap(middlewares::RequireJWT)
            .route("/ocr", web::post().to(trigger_ocr))
            .route("/evaluate", web::post().to(trigger_evaluation)),
    );
}
