//! Ride booking back office - application entry point.
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool and run migrations
//! 3. Pick the notifier (mail relay when configured, log otherwise)
//! 4. Build the HTTP router and serve on the configured port

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use ride_booking_back_office::{
    config::Config,
    router::build_router,
    services::notifier::{LogNotifier, Notifier, WebhookNotifier},
    state::AppState,
    store::postgres::{self, PgStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG, defaulting to "info"
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    let pool = postgres::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    postgres::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let notifier: Arc<dyn Notifier> = match &config.mail_relay_url {
        Some(relay_url) => {
            let notifier = WebhookNotifier::new(
                relay_url,
                config.mail_relay_secret.clone(),
                config.mail_from.clone(),
                Duration::from_secs(config.mail_timeout_secs),
            )?;
            tracing::info!("Ride confirmations go to the mail relay");
            Arc::new(notifier)
        }
        None => {
            tracing::warn!("MAIL_RELAY_URL not set, ride confirmations will only be logged");
            Arc::new(LogNotifier)
        }
    };

    let state = AppState::new(Arc::new(PgStore::new(pool)), notifier);
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
