//! # Multi-Format Parsing
//!
//! Parses configuration text into a format-agnostic document
//! (`serde_json::Value`). JSON is parsed directly; YAML and TOML are parsed
//! with their native crates and then converted into the JSON value model so
//! that schema validation and warning checks see one uniform tree.
//!
//! Parser failures from any backend are normalized into
//! [`ParseError::Syntax`], which carries the resolved format and the
//! underlying message but never the backend's error type.

use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::format::{Format, RequestedFormat};

/// Errors produced while turning text into a document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The caller passed empty (or whitespace-only) content.
    #[error("Content must be a non-empty string")]
    EmptyContent,

    /// The content is not well-formed in the resolved format.
    #[error("Failed to parse {format}: {reason}")]
    Syntax {
        /// The format that was attempted (never `auto`).
        format: Format,
        /// Backend parser message.
        reason: String,
    },

    /// A document could not be written back out in the requested format.
    #[error("Failed to serialize {format}: {reason}")]
    Serialize {
        /// The target format.
        format: Format,
        /// Backend serializer message.
        reason: String,
    },
}

/// Parse `content` in the given format, resolving `auto` first.
///
/// # Errors
///
/// Returns [`ParseError::EmptyContent`] for empty input and
/// [`ParseError::Syntax`] when the resolved format's parser rejects it.
pub fn parse_config(content: &str, format: RequestedFormat) -> Result<Value, ParseError> {
    if content.trim().is_empty() {
        return Err(ParseError::EmptyContent);
    }
    parse_as(content, format.resolve(content))
}

/// Parse `content` in a concrete format.
pub(crate) fn parse_as(content: &str, format: Format) -> Result<Value, ParseError> {
    let syntax = |reason: String| ParseError::Syntax { format, reason };

    let document = match format {
        Format::Json => serde_json::from_str(content).map_err(|e| syntax(e.to_string()))?,
        Format::Yaml => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(content).map_err(|e| syntax(e.to_string()))?;
            yaml_to_json_value(yaml).map_err(syntax)?
        }
        Format::Toml => {
            let table: toml::Table =
                toml::from_str(content).map_err(|e| syntax(e.to_string()))?;
            toml_to_json_value(toml::Value::Table(table)).map_err(syntax)?
        }
    };

    tracing::debug!(%format, "parsed configuration document");
    Ok(document)
}

/// Write a document back out in a concrete format.
///
/// TOML requires a table at the top level and cannot express `null`, so
/// documents that violate either constraint fail with
/// [`ParseError::Serialize`].
///
/// # Errors
///
/// Returns [`ParseError::Serialize`] when the backend serializer rejects
/// the document.
pub fn serialize_document(document: &Value, format: Format) -> Result<String, ParseError> {
    let serialize = |reason: String| ParseError::Serialize { format, reason };
    match format {
        Format::Json => serde_json::to_string_pretty(document).map_err(|e| serialize(e.to_string())),
        Format::Yaml => serde_yaml::to_string(document).map_err(|e| serialize(e.to_string())),
        Format::Toml => toml::to_string_pretty(document).map_err(|e| serialize(e.to_string())),
    }
}

/// Convert a `serde_yaml::Value` into a `serde_json::Value`.
///
/// Non-string mapping keys (numbers, booleans) are stringified; tags are
/// dropped in favour of the tagged value.
fn yaml_to_json_value(yaml: serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in a document"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s)),
        serde_yaml::Value::Sequence(seq) => seq
            .into_iter()
            .map(yaml_to_json_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_yaml::Value::Mapping(map) => {
            let mut object = Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s,
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    serde_yaml::Value::Null => "null".to_string(),
                    other => return Err(format!("unsupported YAML map key: {other:?}")),
                };
                object.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(object))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(tagged.value),
    }
}

/// Convert a `toml::Value` into a `serde_json::Value`.
///
/// Datetimes become their RFC 3339 string form. Non-finite floats (`inf`,
/// `nan`) have no JSON representation and are rejected.
fn toml_to_json_value(value: toml::Value) -> Result<Value, String> {
    match value {
        toml::Value::String(s) => Ok(Value::String(s)),
        toml::Value::Integer(i) => Ok(Value::Number(Number::from(i))),
        toml::Value::Float(f) => Number::from_f64(f)
            .map(Value::Number)
            .ok_or_else(|| format!("cannot represent float {f} in a document")),
        toml::Value::Boolean(b) => Ok(Value::Bool(b)),
        toml::Value::Datetime(dt) => Ok(Value::String(dt.to_string())),
        toml::Value::Array(items) => items
            .into_iter()
            .map(toml_to_json_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        toml::Value::Table(table) => {
            let mut object = Map::new();
            for (k, v) in table {
                object.insert(k, toml_to_json_value(v)?);
            }
            Ok(Value::Object(object))
        }
    }
}
