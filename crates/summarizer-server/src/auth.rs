use std::ops::Deref;

use actix_web::{
    dev::Payload,
    http::header::{self, HeaderValue},
    web, FromRequest, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use summarizer_core::Account;

use crate::error::AppError;
use crate::state::AppState;

const KEYWORDS: [&str; 2] = ["Token", "Bearer"];

pub const MISSING_CREDENTIALS: &str = "Authentication credentials were not provided.";
pub const INVALID_TOKEN: &str = "Invalid token.";

/// The account behind the request's `Authorization: Token <key>` header.
///
/// Extraction fails with [`AppError::Unauthorized`] before the handler body
/// runs, so unauthenticated requests never reach validation or generation.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Account);

impl Deref for Authenticated {
    type Target = Account;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for Authenticated {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let parsed = parse_authorization(req.headers().get(header::AUTHORIZATION));
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let key = parsed?;
            let state = state
                .ok_or_else(|| AppError::Internal("application state is not configured".into()))?;

            match state.accounts.find_by_token(&key).await? {
                Some(account) => Ok(Authenticated(account)),
                None => {
                    log::warn!("Rejected request with unknown API token");
                    Err(AppError::Unauthorized(INVALID_TOKEN.to_string()))
                }
            }
        })
    }
}

/// Extracts the token key from an `Authorization` header value.
pub fn parse_authorization(value: Option<&HeaderValue>) -> Result<String, AppError> {
    let unauthorized = |message: &str| AppError::Unauthorized(message.to_string());

    let Some(value) = value else {
        return Err(unauthorized(MISSING_CREDENTIALS));
    };

    let Ok(value) = value.to_str() else {
        return Err(unauthorized(
            "Invalid token header. Token string should not contain invalid characters.",
        ));
    };

    let parts: Vec<&str> = value.split_whitespace().collect();
    let Some(keyword) = parts.first() else {
        return Err(unauthorized(MISSING_CREDENTIALS));
    };
    if !KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(keyword)) {
        return Err(unauthorized(MISSING_CREDENTIALS));
    }

    match parts.len() {
        1 => Err(unauthorized("Invalid token header. No credentials provided.")),
        2 => Ok(parts[1].to_string()),
        _ => Err(unauthorized(
            "Invalid token header. Token string should not contain spaces.",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<String, String> {
        let value = HeaderValue::from_str(raw).unwrap();
        parse_authorization(Some(&value)).map_err(|e| e.to_string())
    }

    #[test]
    fn accepts_token_and_bearer_keywords() {
        assert_eq!(parse("Token abc123").unwrap(), "abc123");
        assert_eq!(parse("token abc123").unwrap(), "abc123");
        assert_eq!(parse("Bearer abc123").unwrap(), "abc123");
    }

    #[test]
    fn missing_or_foreign_scheme_means_no_credentials() {
        assert_eq!(
            parse_authorization(None).unwrap_err().to_string(),
            MISSING_CREDENTIALS
        );
        assert_eq!(parse("Basic dXNlcjpwYXNz").unwrap_err(), MISSING_CREDENTIALS);
        assert_eq!(parse("").unwrap_err(), MISSING_CREDENTIALS);
    }

    #[test]
    fn malformed_token_headers_are_rejected() {
        assert_eq!(
            parse("Token").unwrap_err(),
            "Invalid token header. No credentials provided."
        );
        assert_eq!(
            parse("Token abc 123").unwrap_err(),
            "Invalid token header. Token string should not contain spaces."
        );
    }
}
