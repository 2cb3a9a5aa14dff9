use actix_web::HttpResponse;
use utoipa::OpenApi;

use crate::openapi::ApiDoc;

/// `GET /openapi.json`
pub async fn handler() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
