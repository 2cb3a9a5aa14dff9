use actix_web::{
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use serde::Serialize;
use summarizer_core::{
    Constraint, FieldViolation, OutputError, ValidationErrors, NON_FIELD_ERRORS,
};
use summarizer_llm::LLMError;
use summarizer_storage::StorageError;
use thiserror::Error;
use utoipa::ToSchema;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Unable to log in with provided credentials.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("Unable to log in with provided credentials.")]
    InvalidCredentials,

    #[error("Invalid input: {0}")]
    Validation(ValidationErrors),

    #[error("Request body exceeds {0} bytes.")]
    PayloadTooLarge(usize),

    #[error("Text generation failed: {message}")]
    GenerationFailed { message: String, timed_out: bool },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => "unauthorized",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::Validation(_) => "validation_error",
            AppError::PayloadTooLarge(_) => "payload_too_large",
            AppError::GenerationFailed { .. } => "generation_failed",
            AppError::Storage(_) => "storage_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    fn fields(&self) -> Option<ValidationErrors> {
        match self {
            AppError::Validation(errors) => Some(errors.clone()),
            AppError::InvalidCredentials => Some(ValidationErrors::single(
                FieldViolation::new(NON_FIELD_ERRORS, Constraint::Invalid)
                    .with_message(INVALID_CREDENTIALS_MESSAGE),
            )),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<LLMError> for AppError {
    fn from(error: LLMError) -> Self {
        AppError::GenerationFailed {
            timed_out: error.is_timeout(),
            message: error.to_string(),
        }
    }
}

impl From<OutputError> for AppError {
    fn from(error: OutputError) -> Self {
        AppError::GenerationFailed {
            message: error.to_string(),
            timed_out: false,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
    /// One of `unauthorized`, `invalid_credentials`, `validation_error`,
    /// `payload_too_large`, `generation_failed`, `storage_error`, `internal_error`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Field name to messages; `non_field_errors` for body-level problems.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub fields: Option<ValidationErrors>,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::GenerationFailed { timed_out: true, .. } => StatusCode::GATEWAY_TIMEOUT,
            AppError::GenerationFailed { .. } => StatusCode::BAD_GATEWAY,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Validation(_) => "Invalid input.".to_string(),
            // Storage internals stay in the server log.
            AppError::Storage(_) => "Failed to save the generated result.".to_string(),
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                message,
                kind: self.kind().to_string(),
                fields: self.fields(),
            },
        };

        let mut response = HttpResponse::build(self.status_code());
        if matches!(self, AppError::Unauthorized(_)) {
            response.insert_header((header::WWW_AUTHENTICATE, "Token"));
        }
        response.json(body)
    }
}
