use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EssayService;
use crate::models::essays::requests::{EssayListParams, EssayListQuery};
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_essays(
    service: &EssayService,
    request: &HttpRequest,
    user_id: i64,
    params: EssayListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let query = EssayListQuery {
        page: Some(params.pagination.page),
        size: Some(params.pagination.size),
        status: params.status,
        search: params.search,
    };

    match storage.list_essays_with_pagination(user_id, query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Essays retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list essays: {e}"),
            )),
        ),
    }
}
