//! The validation result returned by every engine entry point.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::diagnostics::{ValidationError, Warning};
use crate::format::Format;

/// Message for the schema-unavailable error entry.
pub const SCHEMA_UNAVAILABLE_MESSAGE: &str =
    "Schema could not be loaded. Validation is not available.";

/// The parsed input, keyed by what kind of input it was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParsedDocument {
    #[serde(rename = "parsedConfig")]
    Config(Option<Value>),
    #[serde(rename = "parsedSegment")]
    Segment(Option<Value>),
}

impl ParsedDocument {
    /// The parsed value, if parsing got that far.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Config(v) | Self::Segment(v) => v.as_ref(),
        }
    }
}

/// Outcome of a validation call.
///
/// `valid` is true exactly when `errors` is empty. Warnings never affect it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<Warning>,
    pub detected_format: Format,
    #[serde(flatten)]
    pub parsed: ParsedDocument,
}

impl ValidationResult {
    /// Build a result; `valid` is derived from `errors`.
    pub fn new(
        detected_format: Format,
        parsed: ParsedDocument,
        errors: Vec<ValidationError>,
        warnings: Vec<Warning>,
    ) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
            detected_format,
            parsed,
        }
    }

    /// A failed result carrying a single error and no warnings.
    pub fn rejected(detected_format: Format, parsed: ParsedDocument, error: ValidationError) -> Self {
        Self::new(detected_format, parsed, vec![error], Vec::new())
    }

    /// Schema could not be obtained.
    pub fn schema_unavailable(detected_format: Format, parsed: ParsedDocument) -> Self {
        Self::rejected(
            detected_format,
            parsed,
            ValidationError::direct("schema", "schema", SCHEMA_UNAVAILABLE_MESSAGE),
        )
    }

    /// Content could not be parsed.
    pub fn parse_failure(
        detected_format: Format,
        parsed: ParsedDocument,
        message: impl Into<String>,
    ) -> Self {
        Self::rejected(detected_format, parsed, ValidationError::direct("parse", "parse", message))
    }
}
