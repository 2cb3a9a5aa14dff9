use actix_web::{web, HttpResponse};
use summarizer_core::OutputKind;

use crate::auth::Authenticated;
use crate::error::Result;
use crate::handlers::{generation, read_body};
use crate::state::AppState;

/// `POST /generate-summary/`
#[utoipa::path(
    post,
    path = "/generate-summary/",
    tag = "generation",
    request_body = crate::openapi::TextRequest,
    responses(
        (status = 201, description = "Summary generated and stored; only `summary` is set", body = summarizer_core::SubmissionRecord),
        (status = 400, description = "Invalid `text` or malformed JSON", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or unknown token", body = crate::error::ErrorResponse),
        (status = 413, description = "Body too large", body = crate::error::ErrorResponse),
        (status = 500, description = "Result could not be stored", body = crate::error::ErrorResponse),
        (status = 502, description = "Generation service failed", body = crate::error::ErrorResponse),
        (status = 504, description = "Generation service timed out", body = crate::error::ErrorResponse)
    ),
    security(("token" = []))
)]
pub async fn handler(
    state: web::Data<AppState>,
    user: Authenticated,
    payload: web::Payload,
) -> Result<HttpResponse> {
    let body = read_body(payload).await?;
    generation::generate(&state, &user, &body, OutputKind::Summary).await
}
