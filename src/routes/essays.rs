use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireJWT};
use crate::models::essays::requests::{CreateEssayRequest, EssayListParams};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{EssayService, PipelineService};
use crate::utils::SafeEssayIdI64;

// Lazily created global service instances
static ESSAY_SERVICE: Lazy<EssayService> = Lazy::new(EssayService::new_lazy);
static PIPELINE_SERVICE: Lazy<PipelineService> = Lazy::new(PipelineService::new_lazy);

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "Unauthorized access, please login",
    ))
}

// Create an essay
pub async fn create_essay(
    req: HttpRequest,
    body: web::Json<CreateEssayRequest>,
) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => return Ok(unauthorized()),
    };

    ESSAY_SERVICE
        .create_essay(&req, user_id, body.into_inner())
        .await
}

// List the caller's essays
pub async fn list_essays(
    req: HttpRequest,
    query: web::Query<EssayListParams>,
) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => return Ok(unauthorized()),
    };

    ESSAY_SERVICE
        .list_essays(&req, user_id, query.into_inner())
        .await
}

// Essay detail (with evaluation, when present)
pub async fn get_essay(req: HttpRequest, path: SafeEssayIdI64) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => return Ok(unauthorized()),
    };

    ESSAY_SERVICE.get_essay(&req, user_id, path.0).await
}

// Delete an essay (image best-effort, row cascade)
pub async fn delete_essay(req: HttpRequest, path: SafeEssayIdI64) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => return Ok(unauthorized()),
    };

    ESSAY_SERVICE.delete_essay(&req, user_id, path.0).await
}

// Fetch the evaluation of an essay
pub async fn get_essay_evaluation(
    req: HttpRequest,
    path: SafeEssayIdI64,
) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => return Ok(unauthorized()),
    };

    PIPELINE_SERVICE.get_evaluation(&req, user_id, path.0).await
}

// Delete the evaluation so the essay can be re-evaluated
pub async fn delete_essay_evaluation(
    req: HttpRequest,
    path: SafeEssayIdI64,
) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => return Ok(unauthorized()),
    };

    PIPELINE_SERVICE
        .delete_evaluation(&req, user_id, path.0)
        .await
}

// Route configuration
pub fn configure_essay_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/essays")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_essays))
                    .route(web::post().to(create_essay)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_essay))
                    .route(web::delete().to(delete_essay)),
            )
            .service(
                web::resource("/{id}/evaluation")
                    .route(web::get().to(get_essay_evaluation))
                    .route(web::delete().to(delete_essay_evaluation)),
            ),
    );
}
