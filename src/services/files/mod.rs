pub mod serve;
pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::image_store::{DiskImageStore, ImageGateway};

pub struct FileService {
    images: Arc<dyn ImageGateway>,
}

impl FileService {
    pub fn new_lazy() -> Self {
        Self {
            images: Arc::new(DiskImageStore::from_config()),
        }
    }

    pub(crate) fn get_images(&self) -> &dyn ImageGateway {
        self.images.as_ref()
    }

    // Handle essay image upload
    pub async fn handle_upload(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        upload::handle_upload(self, request, payload).await
    }

    // Serve a stored essay image
    pub async fn handle_serve(&self, owner_id: i64, name: String) -> ActixResult<HttpResponse> {
        serve::handle_serve(self, owner_id, name).await
    }
}
