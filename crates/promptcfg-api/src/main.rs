//! # promptcfg-api: Binary Entry Point
//!
//! Starts the Axum HTTP server for the validation tool endpoint.
//! Binds to configurable port (default 8080).

use promptcfg_api::{AppConfig, AppState};
use promptcfg_schema::SchemaSettings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();

    let settings = SchemaSettings::from_env().map_err(|e| {
        tracing::error!("Invalid schema configuration: {e}");
        e
    })?;
    tracing::info!(
        local = %settings.local_path.display(),
        remote = %settings.remote_url,
        timeout_secs = settings.fetch_timeout.as_secs(),
        "schema sources configured"
    );

    let state = AppState::from_settings(&settings)?;
    promptcfg_api::serve(state, &config).await?;

    Ok(())
}
