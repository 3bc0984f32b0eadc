use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::ApiResponse;
use crate::utils::jwt;

use super::AuthService;

pub async fn handle_logout(
    _service: &AuthService,
    _request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // Stateless JWTs cannot be revoked server side; expiring the refresh
    // cookie is all that is needed
    let empty_cookie = jwt::JwtUtils::create_empty_refresh_token_cookie();

    Ok(HttpResponse::Ok()
        .cookie(empty_cookie)
        .json(ApiResponse::success_empty("Logged out successfully")))
}
