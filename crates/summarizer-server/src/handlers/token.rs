use actix_web::{web, HttpResponse};
use serde::Serialize;
use summarizer_core::{
    validate_credentials, verify_missing_user, verify_password, CredentialsInput,
    DEFAULT_ITERATIONS,
};
use utoipa::ToSchema;

use crate::error::{AppError, Result};
use crate::handlers::{parse_json_body, read_body};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
    pub user_id: i64,
    pub email: String,
}

/// `POST /token/`: exchanges username and password for the account's API token.
#[utoipa::path(
    post,
    path = "/token/",
    tag = "auth",
    request_body = crate::openapi::CredentialsRequest,
    responses(
        (status = 201, description = "Token for the account, reused on later calls", body = TokenResponse),
        (status = 400, description = "Missing fields or wrong credentials", body = crate::error::ErrorResponse),
        (status = 413, description = "Body too large", body = crate::error::ErrorResponse)
    )
)]
pub async fn handler(state: web::Data<AppState>, payload: web::Payload) -> Result<HttpResponse> {
    let body = read_body(payload).await?;
    let input: CredentialsInput = parse_json_body(&body)?;
    let credentials = validate_credentials(&input)?;

    let account = state.accounts.find_by_username(&credentials.username).await?;

    // PBKDF2 is CPU-bound. Unknown users pay the same cost as wrong passwords.
    let password = credentials.password;
    let password_hash = account.as_ref().map(|account| account.password_hash.clone());
    let verified = web::block(move || match password_hash {
        Some(password_hash) => verify_password(&password, &password_hash),
        None => verify_missing_user(&password, DEFAULT_ITERATIONS),
    })
    .await
    .map_err(|e| AppError::Internal(format!("password check failed: {e}")))?;

    let account = match account {
        Some(account) if verified => account,
        Some(account) => {
            log::warn!("Invalid password for user '{}'", account.username);
            return Err(AppError::InvalidCredentials);
        }
        None => {
            log::warn!("Login attempt for unknown user '{}'", credentials.username);
            return Err(AppError::InvalidCredentials);
        }
    };

    let token = state.accounts.get_or_create_token(account.id).await?;
    log::info!("Issued token for user {} ({})", account.id, account.username);

    Ok(HttpResponse::Created().json(TokenResponse {
        token: token.key,
        user_id: account.id,
        email: account.email,
    }))
}
