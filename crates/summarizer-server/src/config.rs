//! Runtime configuration for the HTTP service.
//!
//! Values come from CLI flags with environment fallbacks (see `main.rs`);
//! this module only holds the parsed result.

use std::path::PathBuf;
use std::time::Duration;

use summarizer_llm::GroqConfig;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DATABASE_PATH: &str = "summarizer.db";

/// Upper bound on request bodies; comfortably above 4096 characters of
/// multi-byte UTF-8 plus JSON escaping.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub workers: Option<usize>,
    pub llm: GroqConfig,
}

impl ServerConfig {
    pub fn new(llm: GroqConfig) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            workers: None,
            llm,
        }
    }

    pub fn with_bind(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    pub fn with_database(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    pub fn with_workers(mut self, workers: Option<usize>) -> Self {
        self.workers = workers.filter(|&n| n > 0);
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn llm_timeout(&self) -> Duration {
        self.llm.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_locally() {
        let config = ServerConfig::new(GroqConfig::new("gsk_key"));
        assert_eq!(config.bind_address(), "127.0.0.1:8000");
        assert_eq!(config.database_path, PathBuf::from("summarizer.db"));
        assert_eq!(config.llm.model, "mixtral-8x7b-32768");
        assert_eq!(config.llm_timeout(), Duration::from_secs(60));
        assert!(config.workers.is_none());
    }

    #[test]
    fn overrides_apply() {
        let config = ServerConfig::new(GroqConfig::new("gsk_key"))
            .with_bind("0.0.0.0", 9000)
            .with_database("/var/lib/summarizer/data.db")
            .with_workers(Some(0));
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert_eq!(
            config.database_path,
            PathBuf::from("/var/lib/summarizer/data.db")
        );
        assert!(config.workers.is_none());
    }
}
