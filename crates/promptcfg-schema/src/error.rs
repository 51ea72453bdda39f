//! Schema acquisition errors.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain a compiled schema.
///
/// `Clone` because one load outcome is shared by every caller that joined
/// the same in-flight load.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The local schema file could not be read or is not valid JSON.
    #[error("local schema {} unusable: {reason}", path.display())]
    LocalRead {
        /// File that was tried.
        path: PathBuf,
        /// Why it was rejected.
        reason: String,
    },

    /// The remote fetch failed, timed out, or returned a non-JSON body.
    #[error("remote schema {url} unusable: {reason}")]
    RemoteFetch {
        /// URL that was fetched.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The schema document was obtained but could not be compiled.
    #[error("schema compilation failed: {reason}")]
    Compile {
        /// Compiler message.
        reason: String,
    },

    /// Every source failed.
    #[error("schema unavailable (local: {local}; remote: {remote})")]
    Unavailable {
        /// Local source failure.
        local: String,
        /// Remote source failure.
        remote: String,
    },
}
