//! nutriscan-api - Nutrition label analysis service
//!
//! Accepts a photo of a nutrition-facts label, recognizes its text, structures
//! it into nutrients, scores and classifies the product, and returns advice.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nutriscan_api::config::{self, Overrides, TomlConfig};
use nutriscan_api::services::{ChatCompletionsClient, HttpOcrClient, LabelAnalyzer};
use nutriscan_api::AppState;

/// Command-line arguments for nutriscan-api
#[derive(Parser, Debug)]
#[command(name = "nutriscan-api")]
#[command(about = "Nutrition label scoring service")]
#[command(version)]
struct Args {
    /// Path to TOML config file
    #[arg(short, long, env = "NUTRISCAN_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "NUTRISCAN_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "NUTRISCAN_PORT")]
    port: Option<u16>,

    /// OCR service endpoint
    #[arg(long, env = "NUTRISCAN_OCR_URL")]
    ocr_url: Option<String>,

    /// Chat-completions API base URL
    #[arg(long, env = "NUTRISCAN_LLM_BASE_URL")]
    llm_base_url: Option<String>,

    /// Language model identifier
    #[arg(long, env = "NUTRISCAN_LLM_MODEL")]
    llm_model: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "NUTRISCAN_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(config::default_config_path);
    let loaded = match &config_path {
        Some(path) => config::load_toml_config(path)?,
        None => None,
    };
    let file_found = loaded.is_some();

    let config = loaded.unwrap_or_default().with_overrides(Overrides {
        host: args.host,
        port: args.port,
        ocr_url: args.ocr_url,
        llm_base_url: args.llm_base_url,
        llm_model: args.llm_model,
        log_level: args.log_level,
    });

    init_tracing(&config);

    info!("Starting nutriscan-api");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    match (&config_path, file_found) {
        (Some(path), true) => info!("Config: {}", path.display()),
        (Some(path), false) => warn!("Config file {} not found, using defaults", path.display()),
        (None, _) => warn!("No config directory available, using defaults"),
    }

    let api_key = config::resolve_api_key_from_env(&config.llm);
    if api_key.is_none() {
        warn!(
            "Language model API key not configured ({}); extraction will fail and advice will fall back",
            config::API_KEY_ENV
        );
    }

    let llm_key_configured = api_key.is_some();
    let model = ChatCompletionsClient::new(&config.llm, api_key)
        .context("Failed to build language model client")?;
    info!("Language model: {} via {}", model.model(), config.llm.base_url);

    let recognizer = HttpOcrClient::new(&config.ocr).context("Failed to build OCR client")?;
    info!("OCR service: {}", config.ocr.url);

    let analyzer = LabelAnalyzer::new(
        Arc::new(recognizer),
        Arc::new(model),
        config.ocr.min_confidence,
    );
    let state = AppState::new(analyzer, llm_key_configured)
        .with_max_upload_bytes(config.max_upload_bytes);

    let app = nutriscan_api::build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// RUST_LOG wins; otherwise the configured level for our crates
fn init_tracing(config: &TomlConfig) {
    let level = &config.logging.level;
    let default_filter = format!(
        "nutriscan_api={level},nutriscan_common={level},tower_http=debug",
        level = level
    );

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
