//! The main function for the NBooks web server
//!
//! Reads the configuration, opens the library database and the cover storage once, and serves
//! the JSON API until interrupted.
use crate::config::Config;
use crate::state::AppState;
use anyhow::Error;
use nbooks_core::database::queries::Db;
use nbooks_core::storage::ObjectStorage;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Environment configuration
mod config;
/// Error responses
mod errors;
/// JSON body and path extractors
mod extract;
/// Request handlers
mod handlers;
/// Route table
mod routes;
/// Shared handler state
mod state;

#[allow(clippy::print_stderr, reason = "No other tracing loaded at this point")]
#[tokio::main]
async fn main() {
    if dotenvy::dotenv().is_err() {
        eprintln!("No .env file found, using the process environment only");
    }
    if let Err(error) = run_safe().await {
        eprintln!("Failed to start NBooks! Error: {error:#}");
    }
}

/// Encapsulated run function that allows returning errors instead of panicking on `Err` or
/// `None` variants.
async fn run_safe() -> Result<(), Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env()?;
    tracing::info!(
        database = %config.database_path.display(),
        storage = %config.storage.base_url,
        "configuration loaded"
    );

    let db = Db::init(&config.database_path).await?;
    let storage = ObjectStorage::new(config.storage.clone())?;
    let app = routes::create_router(AppState::new(db.clone(), storage, &config.cover_bucket));

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down, closing database");
    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {err}");
        // Without a signal handler the server runs until killed
        core::future::pending::<()>().await;
    }
}
