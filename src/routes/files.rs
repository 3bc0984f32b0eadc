use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::services::FileService;
use crate::utils::{SafeFileName, SafeOwnerIdI64};

// Lazily created global FileService instance
static FILE_SERVICE: Lazy<FileService> = Lazy::new(FileService::new_lazy);

// Upload an essay image
pub async fn upload_file(req: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    FILE_SERVICE.handle_upload(&req, payload).await
}

// Serve a stored essay image (public: the OCR backend fetches by URL)
pub async fn serve_file(
    owner_id: SafeOwnerIdI64,
    name: SafeFileName,
) -> ActixResult<HttpResponse> {
    FILE_SERVICE.handle_serve(owner_id.0, name.0).await
}

// Route configuration
pub fn configure_file_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/files")
            .wrap(middlewares::RequireJWT)
            .route("/upload", web::post().to(upload_file)),
    )
    .service(web::resource("/files/{owner_id}/{name}").route(web::get().to(serve_file)));
}
