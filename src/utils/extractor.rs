//! Safe path parameter extractors.
//!
//! Actix path extraction with `web::Path<i64>` turns a malformed segment
//! into an opaque 400; these wrappers produce the standard API envelope
//! instead and validate the value range.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, error::ErrorBadRequest};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn bad_request(message: &str) -> actix_web::Error {
    ErrorBadRequest(
        serde_json::to_string(&ApiResponse::<()>::error_empty(
            ErrorCode::BadRequest,
            message,
        ))
        .unwrap_or_else(|_| message.to_string()),
    )
}

fn parse_positive_i64(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    let raw = req
        .match_info()
        .get(name)
        .ok_or_else(|| bad_request(&format!("Missing path parameter: {name}")))?;

    let value: i64 = raw
        .parse()
        .map_err(|_| bad_request(&format!("Invalid {name}: must be an integer")))?;

    if value <= 0 {
        return Err(bad_request(&format!("Invalid {name}: must be positive")));
    }

    Ok(value)
}

/// Essay ID path segment (`/{id}`)
pub struct SafeEssayIdI64(pub i64);

impl FromRequest for SafeEssayIdI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(parse_positive_i64(req, "id").map(SafeEssayIdI64))
    }
}

/// Owner ID path segment on public file routes (`/files/{owner_id}/{name}`)
pub struct SafeOwnerIdI64(pub i64);

impl FromRequest for SafeOwnerIdI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(parse_positive_i64(req, "owner_id").map(SafeOwnerIdI64))
    }
}

/// File name path segment; rejects anything that could traverse out of
/// the owner's directory.
pub struct SafeFileName(pub String);

impl FromRequest for SafeFileName {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.match_info().get("name") {
            None => Err(bad_request("Missing path parameter: name")),
            Some(raw) => {
                let valid = !raw.is_empty()
                    && raw
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_')
                    && !raw.contains("..");
                if valid {
                    Ok(SafeFileName(raw.to_string()))
                } else {
                    Err(bad_request("Invalid file name"))
                }
            }
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_essay_id_valid() {
        let req = TestRequest::default()
            .param("id", "42")
            .to_http_request();
        let id = SafeEssayIdI64::from_request(&req, &mut Payload::None)
            .await
            .unwrap();
        assert_eq!(id.0, 42);
    }

    #[actix_web::test]
    async fn test_essay_id_rejects_garbage() {
        for raw in ["abc", "-3", "0", "9999999999999999999999"] {
            let req = TestRequest::default().param("id", raw).to_http_request();
            assert!(
                SafeEssayIdI64::from_request(&req, &mut Payload::None)
                    .await
                    .is_err()
            );
        }
    }

    #[actix_web::test]
    async fn test_file_name_rejects_traversal() {
        for raw in ["../secret", "a/b.png", ""] {
            let req = TestRequest::default().param("name", raw).to_http_request();
            assert!(
                SafeFileName::from_request(&req, &mut Payload::None)
                    .await
                    .is_err()
            );
        }

        let req = TestRequest::default()
            .param("name", "1736500000-abcd.png")
            .to_http_request();
        assert!(
            SafeFileName::from_request(&req, &mut Payload::None)
                .await
                .is_ok()
        );
    }
}
