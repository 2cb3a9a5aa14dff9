use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;

use crate::prompt::OutputKind;

/// Shortest derived output that may be stored in a record.
pub const MIN_OUTPUT_CHARS: usize = 32;

/// A persisted submission: the original text plus whichever derived
/// field the creating request produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SubmissionRecord {
    pub id: i64,
    /// Submitted text, trimmed.
    pub text: String,
    /// Set only by `POST /generate-summary/`.
    pub summary: Option<String>,
    /// Set only by `POST /generate-bullet-points/`.
    pub bullet_points: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for SubmissionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Submission {}", self.id)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OutputError {
    #[error("generation service returned no {0}")]
    Empty(OutputKind),

    #[error("generated {kind} is too short ({length} characters, need at least 32)")]
    TooShort { kind: OutputKind, length: usize },
}

/// Model output that has been checked against the derived-field constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedOutput {
    kind: OutputKind,
    content: String,
}

impl GeneratedOutput {
    pub fn new(kind: OutputKind, raw: &str) -> Result<Self, OutputError> {
        let content = raw.trim();
        if content.is_empty() {
            return Err(OutputError::Empty(kind));
        }

        let length = content.chars().count();
        if length < MIN_OUTPUT_CHARS {
            return Err(OutputError::TooShort { kind, length });
        }

        Ok(Self {
            kind,
            content: content.to_string(),
        })
    }

    pub fn kind(&self) -> OutputKind {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}
