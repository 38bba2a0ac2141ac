//! MemberDash Stripe Bridge server
//!
//! Serves the webhook interception layer in front of a minimal host router.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use memberdash_stripe_bridge::bootstrap::build_router;
use memberdash_stripe_bridge::config::{AppConfig, ServerConfig};

fn init_tracing(server: &ServerConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(env_filter);

    if server.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.server);

    tracing::info!(
        "Starting MemberDash Stripe Bridge v{}",
        env!("CARGO_PKG_VERSION")
    );

    config.validate().context("Invalid configuration")?;

    if config.webhook.signing_secret().is_none() {
        tracing::warn!("No Stripe webhook secret configured; signatures will not be checked");
    }
    tracing::info!(backend = ?config.membership.backend, "Membership backend selected");

    let app = build_router(&config).context("Failed to build application")?;

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
