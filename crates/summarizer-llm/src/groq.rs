use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};

use crate::protocol::{ChatCompletionRequest, ChatCompletionResponse};
use crate::provider::{LLMError, Result, TextGenerator};

pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_GROQ_MODEL: &str = "mixtral-8x7b-32768";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_MIN_BACKOFF: Duration = Duration::from_millis(250);
const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(5);

/// Connection settings for the Groq chat completions API.
#[derive(Clone)]
pub struct GroqConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub min_backoff: Duration,
    pub max_backoff: Duration,
}

impl GroqConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_GROQ_BASE_URL.to_string(),
            model: DEFAULT_GROQ_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            min_backoff: DEFAULT_MIN_BACKOFF,
            max_backoff: DEFAULT_MAX_BACKOFF,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_backoff(mut self, min: Duration, max: Duration) -> Self {
        self.min_backoff = min;
        self.max_backoff = max.max(min);
        self
    }
}

impl std::fmt::Debug for GroqConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

pub struct GroqProvider {
    client: ClientWithMiddleware,
    api_key: String,
    base_url: String,
    model: String,
}

impl GroqProvider {
    pub fn new(config: GroqConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(config.min_backoff, config.max_backoff)
            .build_with_max_retries(config.max_retries);

        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            api_key: config.api_key,
            base_url: config.base_url,
            model: config.model,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl TextGenerator for GroqProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = ChatCompletionRequest::single_prompt(&self.model, prompt);

        log::debug!(
            "Requesting completion from {} (model: {}, prompt: {} chars)",
            self.base_url,
            self.model,
            prompt.chars().count()
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(LLMError::RateLimited(text));
        }
        if !status.is_success() {
            return Err(LLMError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| LLMError::MalformedResponse(e.to_string()))?;

        if completion.choices.is_empty() {
            return Err(LLMError::MalformedResponse(
                "response contained no choices".to_string(),
            ));
        }

        match completion.first_content() {
            Some(content) if !content.trim().is_empty() => Ok(content.to_string()),
            _ => Err(LLMError::EmptyCompletion),
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = GroqConfig::new("gsk_test");
        assert_eq!(config.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(config.model, "mixtral-8x7b-32768");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.max_retries, 2);
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let provider =
            GroqProvider::new(GroqConfig::new("k").with_base_url("http://localhost:9999/v1/"))
                .unwrap();
        assert_eq!(
            provider.completions_url(),
            "http://localhost:9999/v1/chat/completions"
        );
    }

    #[test]
    fn backoff_upper_bound_never_below_lower() {
        let config = GroqConfig::new("k")
            .with_backoff(Duration::from_millis(500), Duration::from_millis(100));
        assert_eq!(config.max_backoff, Duration::from_millis(500));
    }

    #[test]
    fn debug_output_hides_api_key() {
        let rendered = format!("{:?}", GroqConfig::new("gsk_secret_value"));
        assert!(!rendered.contains("gsk_secret_value"));
    }

    #[test]
    fn provider_reports_configured_model() {
        let provider = GroqProvider::new(GroqConfig::new("k").with_model("llama3-8b-8192")).unwrap();
        assert_eq!(provider.model(), "llama3-8b-8192");
    }
}
