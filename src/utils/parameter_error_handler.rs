//! Request parameter error handlers.
//!
//! Malformed JSON bodies and query strings get the standard API envelope
//! instead of actix's plain-text default.

use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse};

use crate::models::{ApiResponse, ErrorCode};

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
        JsonPayloadError::Deserialize(e) => format!("Invalid JSON body: {e}"),
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "JSON body too large".to_string()
        }
        other => format!("Invalid request body: {other}"),
    };

    let response = HttpResponse::BadRequest()
        .json(ApiResponse::<()>::error_empty(ErrorCode::BadRequest, message));

    InternalError::from_response(err, response).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        QueryPayloadError::Deserialize(e) => format!("Invalid query parameters: {e}"),
        other => format!("Invalid query string: {other}"),
    };

    let response = HttpResponse::BadRequest()
        .json(ApiResponse::<()>::error_empty(ErrorCode::BadRequest, message));

    InternalError::from_response(err, response).into()
}
