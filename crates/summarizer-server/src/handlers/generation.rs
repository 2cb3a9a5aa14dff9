//! Shared flow behind the summary and bullet-point endpoints.

use std::time::Instant;

use actix_web::HttpResponse;
use summarizer_core::{validate_submission, Account, GeneratedOutput, OutputKind, SubmissionInput};

use crate::error::{AppError, Result};
use crate::handlers::parse_json_body;
use crate::state::AppState;

/// Validates the body, renders the prompt for `kind`, calls the generator
/// once and stores the result as a new record.
///
/// Nothing is written unless generation succeeds and its output passes the
/// derived-field checks.
pub async fn generate(
    state: &AppState,
    user: &Account,
    body: &[u8],
    kind: OutputKind,
) -> Result<HttpResponse> {
    let input: SubmissionInput = parse_json_body(body)?;
    let text = validate_submission(&input).map_err(|errors| {
        log::debug!("[user {}] Rejected {} request: {}", user.id, kind, errors);
        AppError::from(errors)
    })?;

    let prompt = kind.render_prompt(text.as_str());
    log::info!(
        "[user {}] Generating {} for {} chars with model {}",
        user.id,
        kind,
        text.as_str().chars().count(),
        state.generator.model()
    );

    let started = Instant::now();
    let raw = state.generator.generate(&prompt).await.map_err(|error| {
        log::error!(
            "[user {}] {} generation failed after {}ms: {}",
            user.id,
            kind,
            started.elapsed().as_millis(),
            error
        );
        AppError::from(error)
    })?;

    let output = GeneratedOutput::new(kind, &raw).map_err(|error| {
        log::error!("[user {}] Discarding unusable output: {}", user.id, error);
        AppError::from(error)
    })?;

    let record = state
        .submissions
        .insert(text.as_str(), &output)
        .await
        .map_err(|error| {
            log::error!("[user {}] Failed to store {}: {}", user.id, kind, error);
            AppError::from(error)
        })?;

    log::info!(
        "[user {}] Stored {} ({}) in {}ms",
        user.id,
        record,
        kind,
        started.elapsed().as_millis()
    );

    Ok(HttpResponse::Created().json(record))
}
