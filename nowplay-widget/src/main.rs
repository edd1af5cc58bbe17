//! Status Widget (nowplay-widget) - Terminal entry point
//!
//! Polls a running status proxy and prints the rendered tile whenever it
//! changes. The same library drives any other rendering surface; this
//! binary is the terminal one.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nowplay_common::config::load_toml_config;
use nowplay_widget::poller::{spawn_poller, DEFAULT_POLL_INTERVAL};
use nowplay_widget::view::NOW_PLAYING_QUERY;
use nowplay_widget::{ProxyClient, QueryCache, StatusWidget};

const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:5750";

/// Command-line arguments for nowplay-widget
#[derive(Parser, Debug)]
#[command(name = "nowplay-widget")]
#[command(about = "Terminal now-playing status widget")]
#[command(version)]
struct Args {
    /// Base URL of the status proxy
    #[arg(short = 'u', long, env = "NOWPLAY_PROXY_URL")]
    proxy_url: Option<String>,

    /// Poll interval in milliseconds
    #[arg(short, long, env = "NOWPLAY_POLL_INTERVAL_MS")]
    interval_ms: Option<u64>,

    /// Path to TOML config file (default: ~/.config/nowplay/nowplay.toml)
    #[arg(short, long, env = "NOWPLAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nowplay_widget=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let toml_config = load_toml_config(args.config.as_deref())
        .context("Failed to load configuration file")?;
    let widget_section = toml_config.widget.unwrap_or_default();

    // CLI/env take priority, TOML is the fallback
    let proxy_url = args
        .proxy_url
        .or(widget_section.proxy_url)
        .unwrap_or_else(|| DEFAULT_PROXY_URL.to_string());
    let interval = args
        .interval_ms
        .or(widget_section.interval_ms)
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_POLL_INTERVAL);

    info!("Polling {} every {:?}", proxy_url, interval);

    let cache = Arc::new(QueryCache::new());
    let client = ProxyClient::new(&proxy_url).context("Failed to build proxy client")?;
    let mut widget = StatusWidget::new(cache.clone());

    let mut updates = cache.subscribe();
    let poller = spawn_poller(client, cache, NOW_PLAYING_QUERY, interval);

    // First frame before any poll resolves
    let mut last_frame = widget.render().await;
    println!("{}", last_frame);

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down");
                break;
            }
            update = updates.recv() => match update {
                Ok(_) => {
                    let frame = widget.render().await;
                    if frame != last_frame {
                        println!("{}", frame);
                        last_frame = frame;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Missed {} cache updates", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    poller.shutdown().await;
    Ok(())
}
