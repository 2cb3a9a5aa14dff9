use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Generation service timed out: {0}")]
    Timeout(String),

    #[error("Generation service rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Generation service returned an empty completion")]
    EmptyCompletion,
}

impl LLMError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, LLMError::Timeout(_))
    }
}

impl From<reqwest::Error> for LLMError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            LLMError::Timeout(error.to_string())
        } else if error.is_decode() {
            LLMError::MalformedResponse(error.to_string())
        } else {
            LLMError::Http(error.to_string())
        }
    }
}

impl From<reqwest_middleware::Error> for LLMError {
    fn from(error: reqwest_middleware::Error) -> Self {
        match error {
            reqwest_middleware::Error::Reqwest(error) => error.into(),
            // The retry middleware wraps the final attempt's error.
            reqwest_middleware::Error::Middleware(error) => {
                match error.downcast::<reqwest_retry::RetryError>() {
                    Ok(reqwest_retry::RetryError::WithRetries { retries, err }) => {
                        log::warn!("Giving up after {} retries: {}", retries, err);
                        err.into()
                    }
                    Ok(reqwest_retry::RetryError::Error(err)) => err.into(),
                    Err(error) => LLMError::Http(error.to_string()),
                }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, LLMError>;

/// A text-generation backend: one prompt in, one completion out.
///
/// Implementations are shared across request handlers behind an `Arc`, so
/// they must be safe to call concurrently.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Model identifier reported in logs.
    fn model(&self) -> &str;
}
