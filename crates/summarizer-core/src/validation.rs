//! Inbound payload validation.
//!
//! Payloads are deserialized loosely (every field as an optional JSON value)
//! and then checked here, so that a bad request yields a complete list of
//! field violations instead of the first serde error.

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

pub const MIN_TEXT_CHARS: usize = 32;
pub const MAX_TEXT_CHARS: usize = 4096;

pub const NON_FIELD_ERRORS: &str = "non_field_errors";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    Required,
    Null,
    Invalid,
    Blank,
    MinLength(usize),
    MaxLength(usize),
    Malformed,
}

impl Constraint {
    pub fn code(&self) -> &'static str {
        match self {
            Constraint::Required => "required",
            Constraint::Null => "null",
            Constraint::Invalid => "invalid",
            Constraint::Blank => "blank",
            Constraint::MinLength(_) => "min_length",
            Constraint::MaxLength(_) => "max_length",
            Constraint::Malformed => "malformed",
        }
    }

    fn message(&self) -> String {
        match self {
            Constraint::Required => "This field is required.".to_string(),
            Constraint::Null => "This field may not be null.".to_string(),
            Constraint::Invalid => "Not a valid string.".to_string(),
            Constraint::Blank => "This field may not be blank.".to_string(),
            Constraint::MinLength(min) => {
                format!("Ensure this field has at least {min} characters.")
            }
            Constraint::MaxLength(max) => {
                format!("Ensure this field has no more than {max} characters.")
            }
            Constraint::Malformed => "Invalid data. Expected a JSON object.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub constraint: Constraint,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, constraint: Constraint) -> Self {
        Self {
            field: field.into(),
            message: constraint.message(),
            constraint,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

/// Every violation found in one payload, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(violation: FieldViolation) -> Self {
        Self {
            violations: vec![violation],
        }
    }

    pub fn push(&mut self, violation: FieldViolation) {
        self.violations.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&FieldViolation> {
        self.violations.iter().find(|v| v.field == name)
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for violation in &self.violations {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", violation.field, violation.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// Serialized as `{ "field": ["message", ...] }`.
impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut fields: Vec<(&str, Vec<&str>)> = Vec::new();
        for violation in &self.violations {
            match fields.iter_mut().find(|(name, _)| *name == violation.field) {
                Some((_, messages)) => messages.push(violation.message.as_str()),
                None => fields.push((violation.field.as_str(), vec![violation.message.as_str()])),
            }
        }

        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for (name, messages) in fields {
            map.serialize_entry(name, &messages)?;
        }
        map.end()
    }
}

/// Keeps an explicit JSON `null` distinguishable from a missing key.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Body of a generation request. `summary` and `bullet_points` are accepted
/// so they can be recognised and dropped; clients cannot set them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionInput {
    #[serde(default, deserialize_with = "present")]
    pub text: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub summary: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub bullet_points: Option<Value>,
}

impl SubmissionInput {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(Value::String(text.into())),
            ..Self::default()
        }
    }

    pub fn read_only_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.summary.is_some() {
            fields.push("summary");
        }
        if self.bullet_points.is_some() {
            fields.push("bullet_points");
        }
        fields
    }
}

/// Submission text that passed validation; trimmed and within bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedText(String);

impl ValidatedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

pub fn validate_submission(input: &SubmissionInput) -> Result<ValidatedText, ValidationErrors> {
    let ignored = input.read_only_fields();
    if !ignored.is_empty() {
        log::debug!("Ignoring read-only fields in submission: {:?}", ignored);
    }

    let text = string_field("text", input.text.as_ref(), true)
        .and_then(|text| check_length("text", text, MIN_TEXT_CHARS, MAX_TEXT_CHARS));

    match text {
        Ok(text) => Ok(ValidatedText(text)),
        Err(violation) => Err(ValidationErrors::single(violation)),
    }
}

/// Body of `POST /token/`.
#[derive(Clone, Default, Deserialize)]
pub struct CredentialsInput {
    #[serde(default, deserialize_with = "present")]
    pub username: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub password: Option<Value>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub fn validate_credentials(input: &CredentialsInput) -> Result<Credentials, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    // Passwords keep surrounding whitespace.
    let username = string_field("username", input.username.as_ref(), true)
        .map_err(|v| errors.push(v))
        .ok();
    let password = string_field("password", input.password.as_ref(), false)
        .map_err(|v| errors.push(v))
        .ok();

    errors.into_result(|| Credentials {
        username: username.unwrap_or_default(),
        password: password.unwrap_or_default(),
    })
}

fn string_field(name: &str, value: Option<&Value>, trim: bool) -> Result<String, FieldViolation> {
    let raw = match value {
        None => return Err(FieldViolation::new(name, Constraint::Required)),
        Some(Value::Null) => return Err(FieldViolation::new(name, Constraint::Null)),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => return Err(FieldViolation::new(name, Constraint::Invalid)),
    };

    let value = if trim { raw.trim().to_string() } else { raw };
    if value.is_empty() {
        return Err(FieldViolation::new(name, Constraint::Blank));
    }
    Ok(value)
}

fn check_length(name: &str, value: String, min: usize, max: usize) -> Result<String, FieldViolation> {
    let length = value.chars().count();
    if length < min {
        return Err(FieldViolation::new(name, Constraint::MinLength(min)));
    }
    if length > max {
        return Err(FieldViolation::new(name, Constraint::MaxLength(max)));
    }
    Ok(value)
}
