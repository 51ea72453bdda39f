//! # Format Detection
//!
//! Classifies raw configuration text as JSON, YAML, or TOML.
//!
//! ## Disambiguation Order
//!
//! YAML and TOML share surface syntax, so detection is an ordering policy
//! rather than a grammar check:
//!
//! 1. A leading `{` or `[` (after trimming) is JSON.
//! 2. Any line that is a bracketed table header (`[blocks]`) or a bare
//!    `key = value` assignment is TOML.
//! 3. Everything else is YAML, the most permissive of the three.
//!
//! Detection never fails and never performs I/O.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// `^\[.*\]$` evaluated per line (CRLF-aware).
static TOML_TABLE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mR)^\[.*\]$").expect("table header pattern is valid")
});

/// `^[A-Za-z_][A-Za-z0-9_]*\s*=` evaluated per line.
static TOML_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[A-Za-z_][A-Za-z0-9_]*\s*=").expect("assignment pattern is valid")
});

/// A concrete serialization format.
///
/// This is what gets recorded as `detectedFormat` in a validation result,
/// so it deliberately has no `auto` member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Yaml,
    Toml,
}

impl Format {
    /// All concrete formats, in detection priority order.
    pub const ALL: [Format; 3] = [Format::Json, Format::Toml, Format::Yaml];

    /// Lowercase wire name (`json`, `yaml`, `toml`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The format a caller asks for: a concrete format or `auto`.
///
/// Accepts the `yml` and `tml` aliases (case-insensitive) in addition to
/// the canonical names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestedFormat {
    Json,
    #[serde(alias = "yml")]
    Yaml,
    #[serde(alias = "tml")]
    Toml,
    #[default]
    Auto,
}

impl RequestedFormat {
    /// Resolve `auto` against the content; concrete formats pass through.
    pub fn resolve(self, content: &str) -> Format {
        match self {
            Self::Json => Format::Json,
            Self::Yaml => Format::Yaml,
            Self::Toml => Format::Toml,
            Self::Auto => detect_format(content),
        }
    }
}

impl From<Format> for RequestedFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => Self::Json,
            Format::Yaml => Self::Yaml,
            Format::Toml => Self::Toml,
        }
    }
}

/// Error for an unrecognized format name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported format: {0} (expected json, yaml, toml, or auto)")]
pub struct UnknownFormat(pub String);

impl FromStr for RequestedFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" | "tml" => Ok(Self::Toml),
            "auto" | "" => Ok(Self::Auto),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// Classify raw text as JSON, YAML, or TOML.
pub fn detect_format(content: &str) -> Format {
    let trimmed = content.trim();

    let format = if trimmed.starts_with('{') || trimmed.starts_with('[') {
        Format::Json
    } else if TOML_TABLE_HEADER.is_match(trimmed) || TOML_ASSIGNMENT.is_match(trimmed) {
        Format::Toml
    } else {
        Format::Yaml
    };

    tracing::debug!(%format, "detected configuration format");
    format
}
