pub mod create;
pub mod delete;
pub mod detail;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::essays::requests::{CreateEssayRequest, EssayListParams};
use crate::storage::Storage;
use crate::storage::image_store::{DiskImageStore, ImageGateway};

pub struct EssayService {
    storage: Option<Arc<dyn Storage>>,
    images: Arc<dyn ImageGateway>,
}

impl EssayService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            images: Arc::new(DiskImageStore::from_config()),
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_images(&self) -> &dyn ImageGateway {
        self.images.as_ref()
    }

    pub async fn create_essay(
        &self,
        request: &HttpRequest,
        user_id: i64,
        req: CreateEssayRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_essay(self, request, user_id, req).await
    }

    pub async fn list_essays(
        &self,
        request: &HttpRequest,
        user_id: i64,
        params: EssayListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_essays(self, request, user_id, params).await
    }

    pub async fn get_essay(
        &self,
        request: &HttpRequest,
        user_id: i64,
        essay_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_essay(self, request, user_id, essay_id).await
    }

    pub async fn delete_essay(
        &self,
        request: &HttpRequest,
        user_id: i64,
        essay_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::handle_delete(self, request, user_id, essay_id).await
    }
}
