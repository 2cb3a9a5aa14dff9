pub mod bullet_points;
pub mod generation;
pub mod health;
pub mod openapi;
pub mod summary;
pub mod token;

use actix_web::web;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::Value;
use summarizer_core::{Constraint, FieldViolation, ValidationErrors, NON_FIELD_ERRORS};

use crate::config::MAX_BODY_BYTES;
use crate::error::AppError;

/// Collects the request body, refusing anything over [`MAX_BODY_BYTES`].
pub(crate) async fn read_body(mut payload: web::Payload) -> Result<web::Bytes, AppError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|error| {
            malformed(
                FieldViolation::new(NON_FIELD_ERRORS, Constraint::Malformed)
                    .with_message(format!("Could not read request body - {error}")),
            )
        })?;
        if body.len() + chunk.len() > MAX_BODY_BYTES {
            return Err(AppError::PayloadTooLarge(MAX_BODY_BYTES));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body.freeze())
}

/// Parses a JSON request body. An empty body is read as an empty object so
/// that missing fields are reported per field.
pub(crate) fn parse_json_body<T>(body: &[u8]) -> Result<T, AppError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    let value: Value = serde_json::from_slice(body).map_err(|error| {
        malformed(
            FieldViolation::new(NON_FIELD_ERRORS, Constraint::Malformed)
                .with_message(format!("JSON parse error - {error}")),
        )
    })?;

    if !value.is_object() {
        return Err(malformed(FieldViolation::new(
            NON_FIELD_ERRORS,
            Constraint::Malformed,
        )));
    }

    serde_json::from_value(value).map_err(|error| {
        malformed(
            FieldViolation::new(NON_FIELD_ERRORS, Constraint::Malformed)
                .with_message(error.to_string()),
        )
    })
}

fn malformed(violation: FieldViolation) -> AppError {
    AppError::Validation(ValidationErrors::single(violation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use summarizer_core::SubmissionInput;

    #[test]
    fn empty_body_reads_as_empty_object() {
        let input: SubmissionInput = parse_json_body(b"  \n").unwrap();
        assert!(input.text.is_none());
    }

    #[test]
    fn syntax_errors_are_reported_as_non_field_errors() {
        let err = parse_json_body::<SubmissionInput>(b"{\"text\": ").unwrap_err();
        let AppError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        let violation = errors.field(NON_FIELD_ERRORS).unwrap();
        assert!(violation.message.starts_with("JSON parse error"));
    }

    #[test]
    fn non_object_body_is_malformed() {
        let err = parse_json_body::<SubmissionInput>(b"[1, 2, 3]").unwrap_err();
        let AppError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(
            errors.field(NON_FIELD_ERRORS).unwrap().message,
            "Invalid data. Expected a JSON object."
        );
    }
}
