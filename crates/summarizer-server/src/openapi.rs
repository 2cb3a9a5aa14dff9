//! OpenAPI description of the HTTP surface, served at `/openapi.json`.

use summarizer_core::SubmissionRecord;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use crate::error::{ErrorBody, ErrorResponse};
use crate::handlers;
use crate::handlers::health::HealthStatus;
use crate::handlers::token::TokenResponse;

pub const TOKEN_SCHEME: &str = "token";

/// Body of `POST /generate-summary/` and `POST /generate-bullet-points/`.
#[derive(ToSchema)]
pub struct TextRequest {
    /// Counted after trimming surrounding whitespace.
    #[schema(min_length = 32, max_length = 4096)]
    pub text: String,
}

/// Body of `POST /token/`.
#[derive(ToSchema)]
pub struct CredentialsRequest {
    pub username: String,
    #[schema(format = Password)]
    pub password: String,
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Text Summarizer API",
        description = "Summaries and bullet-point lists for submitted text."
    ),
    paths(
        handlers::token::handler,
        handlers::summary::handler,
        handlers::bullet_points::handler,
        handlers::health::handler,
    ),
    components(schemas(
        SubmissionRecord,
        TextRequest,
        CredentialsRequest,
        TokenResponse,
        ErrorResponse,
        ErrorBody,
        HealthStatus,
    )),
    modifiers(&TokenAuth),
    tags(
        (name = "auth", description = "API token issuance"),
        (name = "generation", description = "Summary and bullet-point generation"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

struct TokenAuth;

impl Modify for TokenAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                TOKEN_SCHEME,
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "Authorization",
                    "`Token <key>` as returned by `POST /token/`",
                ))),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();

        for path in ["/token/", "/generate-summary/", "/generate-bullet-points/"] {
            assert!(doc["paths"][path]["post"].is_object(), "missing {path}");
        }
        assert!(doc["paths"]["/health"]["get"].is_object());
        assert!(doc["components"]["securitySchemes"][TOKEN_SCHEME].is_object());
        assert_eq!(
            doc["components"]["schemas"]["TextRequest"]["properties"]["text"]["minLength"],
            32
        );
    }
}
