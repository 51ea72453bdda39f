//! Schema sources.
//!
//! A [`SchemaSource`] produces the raw schema document. The default source
//! reads the pre-provisioned local file and falls back to the canonical
//! remote URL when the file is missing or unusable.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::error::SchemaError;
use crate::settings::SchemaSettings;

/// Something that can produce the schema document.
#[async_trait]
pub trait SchemaSource: Send + Sync + fmt::Debug {
    /// Produce the schema document.
    async fn load(&self) -> Result<Value, SchemaError>;
}

// -- Local ------------------------------------------------------------------

/// Reads the schema from a file on disk.
#[derive(Debug, Clone)]
pub struct LocalFileSource {
    path: PathBuf,
}

impl LocalFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SchemaSource for LocalFileSource {
    async fn load(&self) -> Result<Value, SchemaError> {
        let local_err = |reason: String| SchemaError::LocalRead {
            path: self.path.clone(),
            reason,
        };
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| local_err(format!("cannot read file: {e}")))?;
        serde_json::from_slice(&bytes).map_err(|e| local_err(format!("invalid JSON: {e}")))
    }
}

// -- Remote -----------------------------------------------------------------

/// Fetches the schema over HTTP with a bounded timeout.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    http: reqwest::Client,
    url: Url,
}

impl RemoteSource {
    /// Build a remote source whose client enforces `settings.fetch_timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::RemoteFetch`] if the HTTP client cannot be built.
    pub fn new(settings: &SchemaSettings) -> Result<Self, SchemaError> {
        let http = reqwest::Client::builder()
            .timeout(settings.fetch_timeout)
            .build()
            .map_err(|e| SchemaError::RemoteFetch {
                url: settings.remote_url.to_string(),
                reason: format!("client init: {e}"),
            })?;
        Ok(Self {
            http,
            url: settings.remote_url.clone(),
        })
    }
}

#[async_trait]
impl SchemaSource for RemoteSource {
    async fn load(&self) -> Result<Value, SchemaError> {
        let remote_err = |reason: String| SchemaError::RemoteFetch {
            url: self.url.to_string(),
            reason,
        };
        let resp = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| remote_err(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(remote_err(format!("HTTP {status}")));
        }

        let body = resp.bytes().await.map_err(|e| remote_err(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| remote_err(format!("invalid JSON: {e}")))
    }
}

// -- Local first, remote fallback -------------------------------------------

/// Tries the local file, then the remote URL.
#[derive(Debug, Clone)]
pub struct DefaultSchemaSource {
    local: LocalFileSource,
    remote: RemoteSource,
}

impl DefaultSchemaSource {
    /// # Errors
    ///
    /// Returns [`SchemaError::RemoteFetch`] if the HTTP client cannot be built.
    pub fn new(settings: &SchemaSettings) -> Result<Self, SchemaError> {
        Ok(Self {
            local: LocalFileSource::new(settings.local_path.clone()),
            remote: RemoteSource::new(settings)?,
        })
    }
}

#[async_trait]
impl SchemaSource for DefaultSchemaSource {
    async fn load(&self) -> Result<Value, SchemaError> {
        let local_err = match self.local.load().await {
            Ok(schema) => {
                tracing::info!(path = %self.local.path.display(), "loaded schema from local file");
                return Ok(schema);
            }
            Err(e) => e,
        };
        tracing::warn!(error = %local_err, "local schema unusable, fetching remote");

        match self.remote.load().await {
            Ok(schema) => {
                tracing::info!(url = %self.remote.url, "loaded schema from remote");
                Ok(schema)
            }
            Err(remote_err) => {
                tracing::warn!(error = %remote_err, "remote schema fetch failed");
                Err(SchemaError::Unavailable {
                    local: local_err.to_string(),
                    remote: remote_err.to_string(),
                })
            }
        }
    }
}
