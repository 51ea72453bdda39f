//! # Detect and Convert Subcommands
//!
//! `detect` prints the format a file would be parsed as under `auto`.
//! `convert` parses a file and writes it back out in another format.
//! Neither touches the schema.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use promptcfg_schema::{detect_format, parse_config, serialize_document, Format, RequestedFormat};

/// Arguments for the `promptcfg detect` subcommand.
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// File to inspect. `-` reads stdin.
    #[arg(value_name = "PATH", default_value = "-")]
    pub path: PathBuf,
}

/// Arguments for the `promptcfg convert` subcommand.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// File to convert. `-` reads stdin.
    #[arg(value_name = "PATH", default_value = "-")]
    pub path: PathBuf,

    /// Input format: json, yaml, toml, or auto.
    #[arg(long, default_value = "auto")]
    pub from: RequestedFormat,

    /// Output format: json, yaml, or toml.
    #[arg(long)]
    pub to: RequestedFormat,

    /// Write to this file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Execute the detect subcommand.
pub fn run_detect(args: &DetectArgs) -> Result<u8> {
    let content = crate::read_input(&args.path)?;
    println!("{}", detect_format(&content));
    Ok(0)
}

/// Execute the convert subcommand.
///
/// Returns exit code 1 when the input does not parse.
pub fn run_convert(args: &ConvertArgs) -> Result<u8> {
    let target = concrete(args.to)?;
    let content = crate::read_input(&args.path)?;
    let source = args.from.resolve(&content);

    let document = match parse_config(&content, args.from) {
        Ok(document) => document,
        Err(e) => {
            println!("FAIL: {}: {}", args.path.display(), e);
            return Ok(1);
        }
    };
    let text = serialize_document(&document, target)?;

    match &args.output {
        Some(out) => write_output(out, &text)?,
        None => print!("{text}"),
    }
    tracing::info!(from = %source, to = %target, "converted");
    Ok(0)
}

fn concrete(format: RequestedFormat) -> Result<Format> {
    match format {
        RequestedFormat::Json => Ok(Format::Json),
        RequestedFormat::Yaml => Ok(Format::Yaml),
        RequestedFormat::Toml => Ok(Format::Toml),
        RequestedFormat::Auto => bail!("--to needs a concrete format (json, yaml, or toml)"),
    }
}

fn write_output(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert_file(input: &str, name: &str, to: RequestedFormat) -> (u8, Option<String>) {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join(name);
        let out = dir.path().join("out");
        std::fs::write(&src, input).unwrap();

        let args = ConvertArgs {
            path: src,
            from: RequestedFormat::Auto,
            to,
            output: Some(out.clone()),
        };
        let code = run_convert(&args).unwrap();
        (code, std::fs::read_to_string(out).ok())
    }

    #[test]
    fn yaml_to_toml_preserves_document() {
        let yaml = "version: 3\nblocks:\n  - type: prompt\n    alignment: left\n";
        let (code, out) = convert_file(yaml, "theme.yaml", RequestedFormat::Toml);
        assert_eq!(code, 0);

        let out = out.unwrap();
        let back = parse_config(&out, RequestedFormat::Toml).unwrap();
        assert_eq!(back, parse_config(yaml, RequestedFormat::Yaml).unwrap());
    }

    #[test]
    fn toml_to_json() {
        let toml = "version = 3\n\n[[blocks]]\ntype = \"prompt\"\n";
        let (code, out) = convert_file(toml, "theme.toml", RequestedFormat::Json);
        assert_eq!(code, 0);
        let value: serde_json::Value = serde_json::from_str(&out.unwrap()).unwrap();
        assert_eq!(value["blocks"][0]["type"], "prompt");
    }

    #[test]
    fn unparseable_input_exits_one() {
        let (code, out) = convert_file("{ \"a\": ", "bad.json", RequestedFormat::Yaml);
        assert_eq!(code, 1);
        assert!(out.is_none());
    }

    #[test]
    fn auto_target_is_rejected() {
        assert!(concrete(RequestedFormat::Auto).is_err());
        assert_eq!(concrete(RequestedFormat::Yaml).unwrap(), Format::Yaml);
    }

    #[test]
    fn detect_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme");
        std::fs::write(&path, "[[blocks]]\ntype = \"prompt\"\n").unwrap();
        assert_eq!(run_detect(&DetectArgs { path }).unwrap(), 0);
    }
}
