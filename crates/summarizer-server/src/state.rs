use std::sync::Arc;

use anyhow::Context;
use summarizer_llm::{GroqProvider, TextGenerator};
use summarizer_storage::{AccountStore, SqliteStorage, SubmissionStore};

use crate::config::ServerConfig;

/// Dependencies shared by every request handler.
///
/// Built once at startup and handed to actix as `web::Data`; all members are
/// `Send + Sync` trait objects, so workers call them concurrently.
pub struct AppState {
    pub generator: Arc<dyn TextGenerator>,
    pub submissions: Arc<dyn SubmissionStore>,
    pub accounts: Arc<dyn AccountStore>,
}

impl AppState {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        submissions: Arc<dyn SubmissionStore>,
        accounts: Arc<dyn AccountStore>,
    ) -> Self {
        Self {
            generator,
            submissions,
            accounts,
        }
    }

    pub async fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        log::info!("Initializing storage at: {:?}", config.database_path);
        let storage = Arc::new(SqliteStorage::new(&config.database_path));
        storage
            .init()
            .await
            .with_context(|| format!("failed to initialize {:?}", config.database_path))?;

        log::info!(
            "Creating Groq provider with base URL: {} and model: {}",
            config.llm.base_url,
            config.llm.model
        );
        let generator =
            GroqProvider::new(config.llm.clone()).context("failed to build Groq HTTP client")?;

        Ok(Self::new(Arc::new(generator), storage.clone(), storage))
    }
}
