//! PromptShelf server - HTTP API for saving, searching and reusing prompts.

use anyhow::Result;
use axum::Router;
use clap::Parser;
use promptshelf_server::{config, logging, routes, state};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use config::Config;
use logging::{LogConfig, LogFormat};
use state::AppState;

/// PromptShelf server - prompt library with history and search.
#[derive(Parser, Debug)]
#[command(name = "promptshelf-server")]
#[command(about = "HTTP server for the PromptShelf prompt library")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override port from config
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Override the prompt data file from config
    #[arg(long, value_name = "FILE")]
    data_file: Option<PathBuf>,

    /// Enable verbose logging (INFO level, including HTTP traces)
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable trace logging (TRACE level for everything)
    #[arg(long)]
    trace: bool,

    /// Quiet mode (WARN and ERROR only)
    #[arg(short, long)]
    quiet: bool,

    /// Set log level for specific targets (e.g., "store=debug").
    /// Can be specified multiple times. Targets are prefixed with "promptshelf::" automatically.
    #[arg(long = "log", value_name = "TARGET=LEVEL")]
    log_overrides: Vec<String>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig::from_cli(
        cli.verbose,
        cli.debug,
        cli.trace,
        cli.quiet,
        &cli.log_overrides,
        cli.log_format,
    );
    logging::init(&log_config);

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(data_file) = cli.data_file {
        config.data_file = data_file;
    }

    tracing::info!(
        target: "promptshelf::startup",
        "Loaded configuration (port: {}, data file: {})",
        config.port,
        config.data_file.display()
    );

    let state = Arc::new(AppState::new(&config)?);

    let app = Router::new()
        .nest("/api", routes::api_router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!(target: "promptshelf::startup", "Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.store.lock().await.flush()?;
    tracing::info!(target: "promptshelf::startup", "Prompt store flushed, shutting down");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(target: "promptshelf::startup", "Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
