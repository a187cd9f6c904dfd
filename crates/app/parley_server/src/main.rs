//! Parley API server binary.
//!
//! Serves the chat API over PostgreSQL (or an in-memory store with
//! `--in-memory`) and forwards prompts to the configured LLM provider.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use parley_api::config::ApiConfig;
use parley_core::llm::{ChatModel, GroqClient};
use parley_core::store::{ChatStore, MemoryChatStore, PgChatStore};
use sqlx::postgres::PgPoolOptions;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "parley_server", version, about = "Parley chat API server")]
struct Args {
    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on (0 = ephemeral).
    #[arg(long, env = "PORT", default_value_t = 4000)]
    port: u16,

    /// PostgreSQL connection URL.
    #[arg(long, env = "DATABASE_URL", required_unless_present = "in_memory")]
    database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Keep chats in process memory instead of PostgreSQL. Nothing persists.
    #[arg(long, default_value_t = false)]
    in_memory: bool,

    /// Timeout for a single LLM request, in seconds.
    #[arg(long, default_value_t = 60)]
    llm_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("info,parley_api=debug,parley_core=debug")
                }),
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env();
    config.bind_addr = format!("{}:{}", args.host, args.port);
    config.database_url = if args.in_memory {
        None
    } else {
        args.database_url.clone()
    };

    info!(bind_addr = %config.bind_addr, in_memory = args.in_memory, "starting parley_server");

    let store: Arc<dyn ChatStore> = match &config.database_url {
        None => {
            warn!("using in-memory store; chats are lost on exit");
            Arc::new(MemoryChatStore::new())
        }
        Some(url) => {
            info!(max_connections = args.max_connections, "configuring connection pool");
            let pool = PgPoolOptions::new()
                .max_connections(args.max_connections)
                .acquire_timeout(Duration::from_secs(30))
                .connect(url)
                .await?;

            info!("running database migrations");
            parley_api::migrate(&pool).await?;
            Arc::new(PgChatStore::new(pool))
        }
    };

    if config.llm.api_key.is_none() {
        warn!("GROQ_API_KEY is not set; prompts will fail until it is configured");
    }
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.llm_timeout_secs))
        .build()?;
    let model: Arc<dyn ChatModel> = Arc::new(GroqClient::with_client(http, config.llm.clone()));
    info!(model = model.name(), base_url = %config.llm.base_url, "LLM provider configured");

    let bind_addr = config.bind_addr.clone();
    let app = parley_api::router(parley_api::AppState::new(store, model, config));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "REST API listening");

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            wait_for_signal().await;
            info!("shutdown signal received");
            shutdown.cancel();
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
