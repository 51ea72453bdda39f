//! # promptcfg-cli: CLI for Prompt Configurations
//!
//! Provides the `promptcfg` command-line interface over the validation
//! engine in `promptcfg-schema` and the tool endpoint in `promptcfg-api`.
//!
//! ## Subcommands
//!
//! - `promptcfg validate`: Validate configurations or single segments.
//! - `promptcfg detect`: Print the detected format of a file.
//! - `promptcfg convert`: Re-serialize a configuration in another format.
//! - `promptcfg serve`: Run the JSON-RPC tool endpoint.
//!
//! ```bash
//! promptcfg validate ~/.config/theme.omp.yaml
//! promptcfg validate --segment --format json segment.json
//! cat theme.toml | promptcfg convert --to yaml
//! ```
//!
//! Exit codes: 0 on success, 1 on validation failure, 2 on operational
//! error.

pub mod convert;
pub mod schema_args;
pub mod serve;
pub mod validate;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Read input text from `path`, or from stdin when the path is `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
