//! # Validate Subcommand
//!
//! Validates configuration files, or single segments with `--segment`,
//! and prints either a per-file report or the raw result JSON.
//!
//! Every file is validated against the same provider, so the schema is
//! loaded at most once per invocation.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use promptcfg_schema::{
    RequestedFormat, SchemaProvider, ValidationResult, Validator, WarningType,
};

use crate::schema_args::SchemaArgs;

/// Arguments for the `promptcfg validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Files to validate. `-` (or no path) reads stdin.
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Input format: json, yaml, toml, or auto.
    #[arg(long, default_value = "auto")]
    pub format: RequestedFormat,

    /// Treat each input as a single segment rather than a full configuration.
    #[arg(long)]
    pub segment: bool,

    /// Print the full validation result as JSON.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub schema: SchemaArgs,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when every input is valid, 1 otherwise.
pub async fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let settings = args.schema.settings()?;
    let provider =
        SchemaProvider::from_settings(&settings).context("failed to set up schema loading")?;
    let validator = Validator::new(Arc::new(provider));

    let paths = if args.paths.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        args.paths.clone()
    };

    let mut had_failures = false;
    for path in &paths {
        let content = crate::read_input(path)?;
        let result = if args.segment {
            validator.validate_segment(&content, args.format).await
        } else {
            validator.validate_config(&content, args.format).await
        };
        tracing::info!(path = %path.display(), valid = result.valid, "validated");

        if args.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print!("{}", render_report(&path.display().to_string(), &result));
        }
        had_failures |= !result.valid;
    }

    Ok(u8::from(had_failures))
}

/// Human-readable report for one input.
pub fn render_report(label: &str, result: &ValidationResult) -> String {
    let mut out = if result.valid {
        format!("OK: {label} ({})\n", result.detected_format)
    } else {
        format!(
            "FAIL: {label} ({}) with {} error(s)\n",
            result.detected_format,
            result.errors.len()
        )
    };

    for error in &result.errors {
        out.push_str(&format!("  error {}: {}\n", error.path, error.message));
    }
    for warning in &result.warnings {
        let kind = match warning.kind {
            WarningType::Deprecation => "deprecation",
            WarningType::Recommendation => "recommendation",
        };
        out.push_str(&format!("  {kind} {}: {}\n", warning.path, warning.message));
    }
    out
}
