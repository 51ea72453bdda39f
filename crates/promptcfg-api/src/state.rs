//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor. Cloning is cheap: the validator holds the
//! schema provider behind an `Arc`, so every request shares one cached
//! compiled schema.

use std::sync::Arc;

use promptcfg_schema::{SchemaError, SchemaProvider, SchemaSettings, Validator};

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind.
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

impl AppConfig {
    /// Read `PORT` from the environment, falling back to 8080.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        Self { port }
    }
}

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub validator: Validator,
}

impl AppState {
    /// State around an existing provider.
    pub fn new(provider: Arc<SchemaProvider>) -> Self {
        Self {
            validator: Validator::new(provider),
        }
    }

    /// State whose provider loads according to `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if the schema HTTP client cannot be built.
    pub fn from_settings(settings: &SchemaSettings) -> Result<Self, SchemaError> {
        Ok(Self::new(Arc::new(SchemaProvider::from_settings(settings)?)))
    }

    /// Whether the schema is cached and requests will not block on a load.
    pub fn is_ready(&self) -> bool {
        self.validator.provider().is_ready()
    }

    /// Load the schema in the background so the first request does not pay
    /// for it. A failure here is logged; requests retry the load.
    pub fn warm_up(&self) {
        let provider = Arc::clone(self.validator.provider());
        tokio::spawn(async move {
            match provider.get().await {
                Ok(_) => tracing::info!("schema ready"),
                Err(e) => tracing::warn!(error = %e, "schema warm-up failed"),
            }
        });
    }
}
