use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EssayService;
use crate::models::essays::requests::CreateEssayRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::{validate_essay_theme, validate_essay_title};

pub async fn create_essay(
    service: &EssayService,
    request: &HttpRequest,
    user_id: i64,
    req: CreateEssayRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_essay_title(&req.title) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::InvalidEssayTitle, msg)));
    }

    if let Some(theme) = &req.theme
        && let Err(msg) = validate_essay_theme(theme)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::InvalidEssayTheme, msg)));
    }

    // The image must have been uploaded first
    if req.image_path.trim().is_empty() || req.image_url.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Essay image is required; upload it before creating the essay",
        )));
    }

    let storage = service.get_storage(request);

    match storage.create_essay(user_id, req).await {
        Ok(essay) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(essay, "Essay created")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::EssayCreationFailed,
                format!("Failed to create essay: {e}"),
            )),
        ),
    }
}
