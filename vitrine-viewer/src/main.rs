//! vitrine-viewer - read-only coffee catalog viewer
//!
//! Loads the manifest and item documents from a data directory or an HTTP
//! base URL, then serves the catalog pages and JSON API.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use vitrine_common::config::{ConfigOverrides, DataSourceSpec, ViewerConfig};
use vitrine_viewer::loader::{DirSource, DocumentSource, HttpSource};
use vitrine_viewer::{build_router, AppState};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "vitrine-viewer")]
#[command(about = "Read-only viewer for the Vitrine coffee catalog")]
#[command(version)]
struct Args {
    /// Data directory or http(s):// base URL holding the documents
    #[arg(short = 'd', long = "data")]
    data: Option<String>,

    /// Manifest reference relative to the data source
    #[arg(long)]
    manifest: Option<String>,

    /// Listen address
    #[arg(long)]
    host: Option<String>,

    /// Listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let overrides = ConfigOverrides {
        source: args.data,
        manifest: args.manifest,
        host: args.host,
        port: args.port,
        config_file: args.config,
    };
    let config = ViewerConfig::resolve(&overrides).context("Failed to resolve configuration")?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting Vitrine viewer v{}", env!("CARGO_PKG_VERSION"));
    match &config.config_file {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("No config file found, using defaults"),
    }
    info!("Data source: {}", config.source);
    info!("Manifest: {}", config.manifest);

    let source: Arc<dyn DocumentSource> = match &config.source {
        DataSourceSpec::Directory(path) => {
            if !path.is_dir() {
                warn!("Data directory {} does not exist", path.display());
            }
            Arc::new(DirSource::new(path.clone()))
        }
        DataSourceSpec::Url(url) => Arc::new(
            HttpSource::new(url).with_context(|| format!("Invalid data source URL {}", url))?,
        ),
    };

    let state = AppState::new(source, config.manifest.clone());

    // Initial load; failures are shown on the page, not fatal
    let status = state.reload().await;
    match status.advisory.message() {
        Some(message) => warn!("Initial load finished with advisory: {}", message),
        None => info!("✓ Loaded {} items", status.items),
    }

    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("vitrine-viewer listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
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
