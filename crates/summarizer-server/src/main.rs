use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use summarizer_core::hash_password;
use summarizer_llm::{GroqConfig, DEFAULT_GROQ_BASE_URL, DEFAULT_GROQ_MODEL};
use summarizer_server::config::{DEFAULT_DATABASE_PATH, DEFAULT_HOST, DEFAULT_PORT};
use summarizer_server::logging::init_logging;
use summarizer_server::{run_server, ServerConfig};
use summarizer_storage::{AccountStore, SqliteStorage};

#[derive(Parser, Debug)]
#[command(name = "summarizer-server")]
#[command(about = "Text summarization and bullet-point HTTP service")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, env = "DEBUG", global = true, default_value = "false")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Create an account that can request API tokens
    CreateUser(CreateUserArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Server port
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// SQLite database file
    #[arg(long, env = "DATABASE_PATH", default_value = DEFAULT_DATABASE_PATH)]
    database: PathBuf,

    /// Groq API key
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    groq_api_key: String,

    /// LLM API base URL
    #[arg(long, env = "LLM_BASE_URL", default_value = DEFAULT_GROQ_BASE_URL)]
    llm_base_url: String,

    /// LLM model name
    #[arg(long, env = "LLM_MODEL", default_value = DEFAULT_GROQ_MODEL)]
    model: String,

    /// Seconds to wait for a single completion
    #[arg(long, env = "LLM_TIMEOUT_SECS", default_value_t = 60)]
    llm_timeout_secs: u64,

    /// Retries for transient LLM failures
    #[arg(long, env = "LLM_MAX_RETRIES", default_value_t = 2)]
    llm_max_retries: u32,

    /// Number of HTTP worker threads (defaults to CPU count)
    #[arg(long, env = "WORKERS")]
    workers: Option<usize>,
}

#[derive(Args, Debug)]
struct CreateUserArgs {
    /// SQLite database file
    #[arg(long, env = "DATABASE_PATH", default_value = DEFAULT_DATABASE_PATH)]
    database: PathBuf,

    #[arg(long)]
    username: String,

    #[arg(long, default_value = "")]
    email: String,

    #[arg(long, env = "SUMMARIZER_PASSWORD", hide_env_values = true)]
    password: String,
}

impl ServeArgs {
    fn into_config(self) -> ServerConfig {
        let llm = GroqConfig::new(self.groq_api_key)
            .with_base_url(self.llm_base_url)
            .with_model(self.model)
            .with_timeout(Duration::from_secs(self.llm_timeout_secs))
            .with_max_retries(self.llm_max_retries);

        ServerConfig::new(llm)
            .with_bind(self.host, self.port)
            .with_database(self.database)
            .with_workers(self.workers)
    }
}

async fn create_user(args: CreateUserArgs) -> anyhow::Result<()> {
    let username = args.username.trim().to_string();
    if username.is_empty() {
        anyhow::bail!("username must not be blank");
    }
    if args.password.is_empty() {
        anyhow::bail!("password must not be empty");
    }

    let storage = SqliteStorage::new(&args.database);
    storage
        .init()
        .await
        .with_context(|| format!("failed to initialize {:?}", args.database))?;

    let password = args.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("password hashing task failed")?;

    let account = storage
        .create_user(&username, args.email.trim(), &password_hash)
        .await?;
    log::info!("Created user {} with id {}", account.username, account.id);
    println!("Created user '{}' (id {})", account.username, account.id);
    Ok(())
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_logging(cli.debug);
    if cli.debug {
        log::debug!("Debug mode enabled");
    }

    match cli.command {
        Command::Serve(args) => {
            let config = args.into_config();
            log::info!("LLM Configuration:");
            log::info!("  Base URL: {}", config.llm.base_url);
            log::info!("  Model: {}", config.llm.model);
            log::info!("  Timeout: {:?}", config.llm_timeout());
            run_server(config).await
        }
        Command::CreateUser(args) => create_user(args).await,
    }
}
