//! Pressroom API server
//!
//! Entry point for the content API.
//! Handles:
//! - Configuration and logging setup
//! - Database connection and schema bootstrap
//! - Metrics exporter installation
//! - Serving with graceful shutdown

use anyhow::Context;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use pressroom_api::{create_router, AppState};
use pressroom_common::{
    auth::JwtManager,
    config::{AppConfig, ObservabilityConfig},
    db::DbPool,
    errors::AppError,
    metrics,
};
use std::net::SocketAddr;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    init_tracing(&config.observability);

    info!(
        service = %config.observability.service_name,
        "Starting Pressroom API v{}",
        pressroom_common::VERSION
    );

    let secret = config
        .auth
        .jwt_secret
        .clone()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Configuration {
            message: "auth.jwt_secret must be set (APP__AUTH__JWT_SECRET)".to_string(),
        })?;
    let jwt = JwtManager::new(&secret, config.auth.jwt_expiration_secs);

    // Initialize metrics
    let metrics_handle = if config.observability.metrics_enabled {
        let handle = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                metrics::LATENCY_BUCKETS,
            )?
            .install_recorder()?;
        metrics::register_metrics();
        Some(handle)
    } else {
        None
    };

    // Initialize database connection
    let db = DbPool::new(&config.database).await?;
    if config.database.auto_migrate {
        db.init_schema().await?;
    }

    tokio::fs::create_dir_all(&config.media.upload_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.media.upload_dir.display()))?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    // Create app state and router
    let state = AppState::new(config, db, jwt);
    let app = create_router(state, metrics_handle);

    // Start the server
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if config.json_logging {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
