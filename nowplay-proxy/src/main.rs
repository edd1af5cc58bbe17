//! Status Proxy (nowplay-proxy) - Main entry point
//!
//! Server-side half of the "Now Playing" feature: a single read endpoint
//! that relays currently-playing state from the Spotify Web API with
//! short-lived cache directives.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nowplay_common::config::load_toml_config;
use nowplay_proxy::spotify::{SpotifyClient, SpotifyCredentials};
use nowplay_proxy::{build_router, AppState};

const DEFAULT_PORT: u16 = 5750;

/// Command-line arguments for nowplay-proxy
#[derive(Parser, Debug)]
#[command(name = "nowplay-proxy")]
#[command(about = "Now-playing status proxy for the portfolio site")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "NOWPLAY_PROXY_PORT")]
    port: Option<u16>,

    /// Path to TOML config file (default: ~/.config/nowplay/nowplay.toml)
    #[arg(short, long, env = "NOWPLAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nowplay_proxy=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Starting nowplay-proxy v{}", env!("CARGO_PKG_VERSION"));

    let toml_config = load_toml_config(args.config.as_deref())
        .context("Failed to load configuration file")?;

    // CLI/env take priority, TOML is the fallback
    let port = args
        .port
        .or(toml_config.proxy.as_ref().and_then(|section| section.port))
        .unwrap_or(DEFAULT_PORT);

    // Missing credentials are not fatal: the service starts and every
    // status request answers with the generic error shape until configured.
    let credentials = match SpotifyCredentials::resolve(&toml_config) {
        Ok(credentials) => {
            info!("Spotify credentials resolved");
            Some(credentials)
        }
        Err(e) => {
            warn!("{}", e);
            warn!("Status requests will fail until credentials are configured");
            None
        }
    };

    let spotify = SpotifyClient::new(credentials).context("Failed to build Spotify client")?;
    let state = AppState::new(Arc::new(spotify));
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

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
