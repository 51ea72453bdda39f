//! Schema source flags shared by `validate` and `serve`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use promptcfg_schema::SchemaSettings;

/// Where to load the schema from. Unset flags fall back to the
/// `PROMPTCFG_SCHEMA_*` environment variables, then to the defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct SchemaArgs {
    /// Local schema file tried first.
    #[arg(long, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Remote schema URL used when the local file is unusable.
    #[arg(long, value_name = "URL")]
    pub schema_url: Option<String>,

    /// Remote fetch timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub fetch_timeout: Option<u64>,
}

impl SchemaArgs {
    /// Resolve flags over the environment-derived settings.
    pub fn settings(&self) -> Result<SchemaSettings> {
        let mut settings = SchemaSettings::from_env().context("invalid schema environment")?;
        if let Some(path) = &self.schema {
            settings = settings.with_local_path(path.clone());
        }
        if let Some(url) = &self.schema_url {
            settings = settings
                .with_remote_url(url)
                .context("invalid --schema-url")?;
        }
        if let Some(secs) = self.fetch_timeout {
            settings = settings.with_fetch_timeout(Duration::from_secs(secs));
        }
        Ok(settings)
    }
}
