//! YouTube Transcript Server
//!
//! A small HTTP service that takes a YouTube video id or URL and returns the
//! video's caption track as JSON: the title plus timed text segments.

mod config;
mod config_file;
mod entities;
mod error;
mod http;
#[cfg(test)]
mod integration;
mod limits;
mod state;
mod transcript;
mod video_id;
mod youtube;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use crate::http::create_router;
use crate::limits::KeyedRateLimiter;
use crate::state::AppState;
use crate::youtube::InnerTubeClient;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
const APP_NAME: &str = "yt-transcript-server";

/// Idle time after which a client's rate limit bucket is dropped
const BUCKET_MAX_IDLE: Duration = Duration::from_secs(600);

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| "config.toml".to_string());

    // `--init-config [path]` writes the default configuration and exits
    if config_path == "--init-config" {
        let path = args.next().unwrap_or_else(|| "config.toml".to_string());
        config_file::generate_default_config(&path)?;
        println!("Wrote default configuration to {}", path);
        return Ok(());
    }

    // Load configuration
    let (config, load_error) = match config_file::load(&config_path) {
        Ok(config) => (config, None),
        Err(e) => (ServerConfig::default(), Some(e)),
    };

    // Initialize logging
    init_logging(&config);

    if let Some(e) = load_error {
        tracing::warn!(
            "Failed to load config file {}: {}. Using defaults.",
            config_path,
            e
        );
    }

    tracing::info!("{} v{} starting", APP_NAME, VERSION);
    tracing::info!("Configuration loaded: {:?}", config);

    let client = Arc::new(InnerTubeClient::new(&config.youtube)?);
    let limiter = Arc::new(KeyedRateLimiter::new(config.rate_limit.clone()));

    // Background task: evict idle rate limit buckets every 60 seconds.
    {
        let limiter_bg = Arc::clone(&limiter);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(60));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let removed = limiter_bg.cleanup(BUCKET_MAX_IDLE);
                if removed > 0 {
                    tracing::debug!(
                        "Evicted {} idle rate limit bucket(s), {} still tracked",
                        removed,
                        limiter_bg.tracked_keys()
                    );
                }
            }
        });
    }

    // Create application state
    let state = Arc::new(AppState::new(config.clone(), client, limiter));

    // Build router
    let app = create_router(state);

    // Start server
    let addr: SocketAddr = config
        .socket_addr()
        .parse()
        .map_err(|e| ServerError::Config(format!("Invalid listen address: {}", e)))?;
    tracing::info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Initialize logging with tracing
fn init_logging(config: &ServerConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("yt_transcript_server={},tower_http=debug", config.log_level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
