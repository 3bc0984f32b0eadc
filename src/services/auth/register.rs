use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{ApiResponse, ErrorCode, users::requests::CreateUserRequest};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password, validate_username};

use super::AuthService;

pub async fn handle_register(
    service: &AuthService,
    mut create_request: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 1. Validate username, email and password shape
    if let Err(msg) = validate_username(&create_request.username) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserNameInvalid, msg)));
    }

    if let Err(msg) = validate_email(&create_request.email) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }

    let password_check = validate_password(&create_request.password);
    if !password_check.is_valid {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::UserPasswordInvalid,
            password_check.error_message(),
        )));
    }

    // 2. Reject duplicate username / email
    if let Err(response) = check_username_exists(&storage, &create_request.username).await {
        return Ok(response);
    }

    if let Err(response) = check_email_exists(&storage, &create_request.email).await {
        return Ok(response);
    }

    // 3. Hash the password and create the account
    match hash_password(&create_request.password) {
        Ok(password_hash) => {
            create_request.password = password_hash;

            match storage.create_user(create_request).await {
                Ok(user) => Ok(HttpResponse::Created()
                    .json(ApiResponse::success(user, "Account created successfully"))),
                Err(e) => Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::RegisterFailed,
                        format!("Register failed: {e}"),
                    )),
                ),
            }
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RegisterFailed,
                format!("Password hashing failed: {e}"),
            )),
        ),
    }
}

async fn check_username_exists(
    storage: &std::sync::Arc<dyn crate::storage::Storage>,
    username: &str,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_username(username).await {
        Ok(Some(_)) => Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserNameAlreadyExists,
            "Username already exists",
        ))),
        Ok(None) => Ok(()),
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RegisterFailed,
                format!("Register failed: {e}"),
            )),
        ),
    }
}

async fn check_email_exists(
    storage: &std::sync::Arc<dyn crate::storage::Storage>,
    email: &str,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_email(email).await {
        Ok(Some(_)) => Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserEmailAlreadyExists,
            "Email already exists",
        ))),
        Ok(None) => Ok(()),
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RegisterFailed,
                format!("Register failed: {e}"),
            )),
        ),
    }
}
