pub mod account;
pub mod credentials;
pub mod prompt;
pub mod record;
pub mod validation;

pub use account::{Account, AuthToken};
pub use credentials::{
    generate_token_key, hash_password, hash_password_with_iterations, verify_missing_user,
    verify_password, DEFAULT_ITERATIONS,
};
pub use prompt::OutputKind;
pub use record::{GeneratedOutput, OutputError, SubmissionRecord, MIN_OUTPUT_CHARS};
pub use validation::{
    validate_credentials, validate_submission, Constraint, Credentials, CredentialsInput,
    FieldViolation, SubmissionInput, ValidatedText, ValidationErrors, MAX_TEXT_CHARS,
    MIN_TEXT_CHARS, NON_FIELD_ERRORS,
};
