//! # Validation Engine
//!
//! Whole-document and fragment validation.
//!
//! ## Fragment Validation
//!
//! The schema only describes a segment inside a full document, so a
//! fragment is validated in context: after structural pre-checks it is
//! embedded at [`SEGMENT_LOCATOR`] in a minimal wrapper document, the whole
//! wrapper is validated, and only errors at or beneath the locator survive,
//! with the locator stripped from their paths. Errors elsewhere belong to
//! the wrapper and are discarded.
//!
//! Entry points never fail: every failure becomes an error entry in the
//! returned [`ValidationResult`].

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::diagnostics::{format_errors, RawValidationError, ValidationError, Warning};
use crate::format::RequestedFormat;
use crate::locator::{embed_segment, relative_to, SEGMENT_LOCATOR};
use crate::parse::parse_config;
use crate::provider::SchemaProvider;
use crate::result::{ParsedDocument, ValidationResult};

/// Fields every segment must carry before schema validation is attempted.
const SEGMENT_REQUIRED_FIELDS: [&str; 2] = ["type", "style"];

/// Validates configurations and segments against the provider's schema.
#[derive(Debug, Clone)]
pub struct Validator {
    provider: Arc<SchemaProvider>,
}

impl Validator {
    pub fn new(provider: Arc<SchemaProvider>) -> Self {
        Self { provider }
    }

    /// The schema provider backing this validator.
    pub fn provider(&self) -> &Arc<SchemaProvider> {
        &self.provider
    }

    /// Validate a full configuration document.
    pub async fn validate_config(&self, content: &str, format: RequestedFormat) -> ValidationResult {
        let detected = format.resolve(content);

        let schema = match self.provider.get().await {
            Ok(schema) => schema,
            Err(e) => {
                tracing::warn!(error = %e, "config validation without schema");
                return ValidationResult::schema_unavailable(detected, ParsedDocument::Config(None));
            }
        };

        let document = match parse_config(content, detected.into()) {
            Ok(document) => document,
            Err(e) => {
                return ValidationResult::parse_failure(detected, ParsedDocument::Config(None), e.to_string())
            }
        };

        let (valid, raw) = schema.validate(&document);
        let errors = if valid { Vec::new() } else { format_errors(&raw) };
        let warnings = config_warnings(&document);

        tracing::debug!(%detected, valid, errors = errors.len(), "validated configuration");
        ValidationResult::new(detected, ParsedDocument::Config(Some(document)), errors, warnings)
    }

    /// Validate a single segment in isolation.
    pub async fn validate_segment(&self, content: &str, format: RequestedFormat) -> ValidationResult {
        let detected = format.resolve(content);

        let document = match parse_config(content, detected.into()) {
            Ok(document) => document,
            Err(e) => {
                return ValidationResult::parse_failure(detected, ParsedDocument::Segment(None), e.to_string())
            }
        };

        let segment = match document {
            Value::Object(segment) => segment,
            other => {
                let error = ValidationError::direct("root", "type", "Must be of type object")
                    .with_param("type", "object");
                return ValidationResult::rejected(detected, ParsedDocument::Segment(Some(other)), error);
            }
        };

        let missing = missing_required_fields(&segment);
        if !missing.is_empty() {
            return ValidationResult::new(
                detected,
                ParsedDocument::Segment(Some(Value::Object(segment))),
                missing,
                Vec::new(),
            );
        }

        let schema = match self.provider.get().await {
            Ok(schema) => schema,
            Err(e) => {
                tracing::warn!(error = %e, "segment validation without schema");
                return ValidationResult::schema_unavailable(
                    detected,
                    ParsedDocument::Segment(Some(Value::Object(segment))),
                );
            }
        };

        let warnings = segment_warnings(&segment);
        let (_, raw) = schema.validate(&embed_segment(segment.clone()));
        let errors = format_errors(&segment_errors(raw));

        tracing::debug!(%detected, errors = errors.len(), "validated segment");
        ValidationResult::new(
            detected,
            ParsedDocument::Segment(Some(Value::Object(segment))),
            errors,
            warnings,
        )
    }
}

/// Pre-check errors for absent (or null) required segment fields.
fn missing_required_fields(segment: &Map<String, Value>) -> Vec<ValidationError> {
    SEGMENT_REQUIRED_FIELDS
        .iter()
        .filter(|field| segment.get(**field).map_or(true, Value::is_null))
        .map(|field| {
            ValidationError::direct(field, "required", format!("Missing required property: {field}"))
                .with_param("missingProperty", *field)
        })
        .collect()
}

/// Keep only errors at or beneath the segment, re-rooted at the segment.
fn segment_errors(raw: Vec<RawValidationError>) -> Vec<RawValidationError> {
    raw.into_iter()
        .filter(|e| e.keyword != "if")
        .filter_map(|mut e| {
            let relative = relative_to(&e.path, SEGMENT_LOCATOR)?.to_string();
            e.path = relative;
            Some(e)
        })
        .collect()
}

fn config_warnings(document: &Value) -> Vec<Warning> {
    let Some(config) = document.as_object() else {
        return Vec::new();
    };
    let mut warnings = Vec::new();

    if let Some(version) = config.get("version").and_then(Value::as_f64) {
        if version != 0.0 && version < 2.0 {
            warnings.push(Warning::deprecation(
                "version",
                "Using deprecated version format. Consider upgrading to version 2 or 3.",
            ));
        }
    }

    if !config.get("$schema").is_some_and(is_truthy) {
        warnings.push(Warning::recommendation(
            "$schema",
            "Consider adding \"$schema\" property for better editor support.",
        ));
    }

    warnings
}

/// `false`, `0`, `""` and `null` count as unset.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn segment_warnings(segment: &Map<String, Value>) -> Vec<Warning> {
    match (segment.contains_key("properties"), segment.contains_key("options")) {
        (true, true) => vec![Warning::deprecation(
            "properties",
            "\"properties\" is deprecated and redundant alongside \"options\". Remove it.",
        )],
        (true, false) => vec![Warning::deprecation(
            "properties",
            "\"properties\" is deprecated. Rename it to \"options\".",
        )],
        _ => Vec::new(),
    }
}
