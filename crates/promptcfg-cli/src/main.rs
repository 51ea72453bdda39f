//! # promptcfg CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use promptcfg_cli::convert::{run_convert, run_detect, ConvertArgs, DetectArgs};
use promptcfg_cli::serve::{run_serve, ServeArgs};
use promptcfg_cli::validate::{run_validate, ValidateArgs};

/// Validate, inspect, and convert prompt configuration files.
#[derive(Parser, Debug)]
#[command(name = "promptcfg", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate configurations or segments against the schema.
    Validate(ValidateArgs),

    /// Print the detected format (json, yaml, or toml) of a file.
    Detect(DetectArgs),

    /// Re-serialize a configuration in another format.
    Convert(ConvertArgs),

    /// Run the JSON-RPC tool endpoint.
    Serve(ServeArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("promptcfg CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args).await,
        Commands::Detect(args) => run_detect(&args),
        Commands::Convert(args) => run_convert(&args),
        Commands::Serve(args) => run_serve(&args).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
