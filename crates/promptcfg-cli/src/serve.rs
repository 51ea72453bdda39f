//! # Serve Subcommand
//!
//! Runs the JSON-RPC tool endpoint from `promptcfg-api` in the foreground.

use anyhow::{Context, Result};
use clap::Args;

use promptcfg_api::{AppConfig, AppState};

use crate::schema_args::SchemaArgs;

/// Arguments for the `promptcfg serve` subcommand.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Port to bind. Defaults to `PORT`, then 8080.
    #[arg(long)]
    pub port: Option<u16>,

    #[command(flatten)]
    pub schema: SchemaArgs,
}

impl ServeArgs {
    fn app_config(&self) -> AppConfig {
        match self.port {
            Some(port) => AppConfig { port },
            None => AppConfig::from_env(),
        }
    }
}

/// Execute the serve subcommand. Only returns on bind or I/O failure.
pub async fn run_serve(args: &ServeArgs) -> Result<u8> {
    let settings = args.schema.settings()?;
    let config = args.app_config();
    tracing::info!(
        port = config.port,
        local = %settings.local_path.display(),
        remote = %settings.remote_url,
        "starting tool endpoint"
    );

    let state = AppState::from_settings(&settings).context("failed to set up schema loading")?;
    promptcfg_api::serve(state, &config)
        .await
        .with_context(|| format!("server on port {} failed", config.port))?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_port_wins() {
        let args = ServeArgs {
            port: Some(9321),
            schema: SchemaArgs::default(),
        };
        assert_eq!(args.app_config(), AppConfig { port: 9321 });
    }
}
