//! stw-match - Style matching microservice
//!
//! **Module Identity:**
//! - Name: stw-match
//! - Port: 5741 (default)
//!
//! Maps movies, movie genres, music genres and songs to fashion archetypes
//! and serves similar titles, similar songs and outfit photos through
//! ordered provider fallbacks.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use stw_common::config::{load_toml_config, ConfigFileResolver};
use stw_match::catalog::StyleCatalog;
use stw_match::config::ProviderKeys;
use stw_match::providers::build_http_client;
use stw_match::{AppState, Providers};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const MODULE_NAME: &str = "stw-match";

/// Command-line arguments for stw-match
#[derive(Parser, Debug)]
#[command(name = "stw-match")]
#[command(about = "Style matching microservice for StyleTwin")]
#[command(version)]
struct Args {
    /// Config file (TOML); falls back to STYLETWIN_CONFIG, then the user config dir
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config)
    #[arg(short, long, env = "STYLETWIN_MATCH_PORT")]
    port: Option<u16>,

    /// Address to bind (overrides config)
    #[arg(short, long, env = "STYLETWIN_MATCH_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing starts so its log level applies.
    let config_path = ConfigFileResolver::new(MODULE_NAME).resolve(args.config.as_deref());
    let config = load_toml_config(config_path.as_deref());

    let default_level = config
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    format!(
                        "stw_match={0},stw_common={0},tower_http=info",
                        default_level
                    )
                    .into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config.context("Failed to load configuration")?;
    match &config_path {
        Some(path) if path.exists() => info!("Config file: {}", path.display()),
        Some(path) => warn!(
            "Config file not found: {} (using built-in defaults)",
            path.display()
        ),
        None => warn!("No config file location available, using built-in defaults"),
    }

    info!("Starting stw-match (Style Matching) microservice");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let catalog = StyleCatalog::load(config.catalog_path.as_deref())
        .context("Failed to load style catalog")?;

    let http = build_http_client(Duration::from_secs(config.http_timeout_secs))
        .context("Failed to build HTTP client")?;
    let keys = ProviderKeys::resolve(&config);
    let providers = Providers::from_keys(http, &keys, config.image_variety);

    let state = AppState::new(catalog, providers, &config.default_country);
    info!(
        default_country = %state.default_country,
        image_variety = config.image_variety,
        "Application state initialized"
    );

    let app = stw_match::build_router(state);

    let bind = args.bind.unwrap_or(config.bind_address);
    let port = args.port.unwrap_or(config.port);
    let ip: IpAddr = bind
        .trim()
        .parse()
        .with_context(|| format!("Invalid bind address {:?}", bind))?;
    let addr = SocketAddr::new(ip, port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
