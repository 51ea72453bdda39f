//! # Diagnostics
//!
//! Turns raw validator error records into stable, human-readable
//! [`ValidationError`]s, and defines the non-fatal [`Warning`] type.
//!
//! Messages for the common rule kinds are rewritten into fixed templates so
//! callers can rely on their wording across validator upgrades. Everything
//! else keeps the validator's own message.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Path reported for violations at the document root.
pub const ROOT_PATH: &str = "root";

// ---------------------------------------------------------------------------
// Raw records
// ---------------------------------------------------------------------------

/// One violated schema constraint, as produced by the compiled schema.
#[derive(Debug, Clone, PartialEq)]
pub struct RawValidationError {
    /// JSON Pointer to the offending location (`""` for the root).
    pub path: String,
    /// Rule name (`required`, `enum`, `type`, `pattern`, ...).
    pub keyword: String,
    /// The validator's default message.
    pub message: String,
    /// Rule-specific parameters (`missingProperty`, `allowedValues`, ...).
    pub params: Map<String, Value>,
    /// The offending value, when available.
    pub data: Option<Value>,
}

impl RawValidationError {
    /// Build a record with no parameters and no data.
    pub fn new(
        path: impl Into<String>,
        keyword: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            keyword: keyword.into(),
            message: message.into(),
            params: Map::new(),
            data: None,
        }
    }

    /// Attach a parameter.
    pub fn with_param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    /// Attach the offending value.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

// ---------------------------------------------------------------------------
// Public diagnostics
// ---------------------------------------------------------------------------

/// A formatted validation failure, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
    pub keyword: String,
    pub params: Map<String, Value>,
    pub data: Value,
}

impl ValidationError {
    /// An error that bypasses the formatter (schema, parse, pre-check failures).
    pub fn direct(path: &str, keyword: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            message: message.into(),
            keyword: keyword.to_string(),
            params: Map::new(),
            data: Value::Null,
        }
    }

    /// Attach a parameter.
    pub fn with_param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }
}

/// Kind of a non-fatal advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningType {
    Deprecation,
    Recommendation,
}

/// Non-fatal advisory. Never affects `valid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub path: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: WarningType,
}

impl Warning {
    pub fn deprecation(path: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            message: message.into(),
            kind: WarningType::Deprecation,
        }
    }

    pub fn recommendation(path: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            message: message.into(),
            kind: WarningType::Recommendation,
        }
    }
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Map raw records to formatted diagnostics, preserving order.
pub fn format_errors(raw: &[RawValidationError]) -> Vec<ValidationError> {
    raw.iter().map(format_error).collect()
}

fn format_error(raw: &RawValidationError) -> ValidationError {
    let path = if raw.path.is_empty() {
        ROOT_PATH.to_string()
    } else {
        raw.path.clone()
    };

    ValidationError {
        path,
        message: message_for(raw),
        keyword: raw.keyword.clone(),
        params: raw.params.clone(),
        data: raw.data.clone().unwrap_or(Value::Null),
    }
}

fn message_for(raw: &RawValidationError) -> String {
    let param = |key: &str| raw.params.get(key).map(render_param);

    let rewritten = match raw.keyword.as_str() {
        "required" => param("missingProperty").map(|p| format!("Missing required property: {p}")),
        "enum" => param("allowedValues").map(|v| format!("Value must be one of: {v}")),
        "type" => param("type").map(|t| format!("Must be of type {t}")),
        "pattern" => param("pattern").map(|p| format!("Must match pattern: {p}")),
        "additionalProperties" => {
            param("additionalProperty").map(|p| format!("Unexpected property: {p}"))
        }
        _ => None,
    };

    rewritten.unwrap_or_else(|| raw.message.clone())
}

/// Render a parameter for a message: strings bare, arrays joined with `, `.
fn render_param(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(render_param).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(path: &str, keyword: &str) -> RawValidationError {
        RawValidationError::new(path, keyword, "default message")
    }

    #[test]
    fn required_message() {
        let errs = format_errors(&[raw("", "required").with_param("missingProperty", "version")]);
        assert_eq!(errs[0].message, "Missing required property: version");
        assert_eq!(errs[0].path, "root");
        assert_eq!(errs[0].params["missingProperty"], "version");
    }

    #[test]
    fn enum_message_joins_allowed_values() {
        let errs = format_errors(&[raw("/blocks/0/type", "enum")
            .with_param("allowedValues", json!(["prompt", "rprompt"]))
            .with_data(json!("bogus"))]);
        assert_eq!(errs[0].message, "Value must be one of: prompt, rprompt");
        assert_eq!(errs[0].path, "/blocks/0/type");
        assert_eq!(errs[0].data, json!("bogus"));
    }

    #[test]
    fn enum_message_renders_non_string_values() {
        let errs = format_errors(&[raw("/n", "enum").with_param("allowedValues", json!([1, true]))]);
        assert_eq!(errs[0].message, "Value must be one of: 1, true");
    }

    #[test]
    fn type_pattern_and_additional_messages() {
        let errs = format_errors(&[
            raw("/version", "type").with_param("type", "integer"),
            raw("/foreground", "pattern").with_param("pattern", "^#[0-9a-f]{6}$"),
            raw("", "additionalProperties").with_param("additionalProperty", "colour"),
        ]);
        assert_eq!(errs[0].message, "Must be of type integer");
        assert_eq!(errs[1].message, "Must match pattern: ^#[0-9a-f]{6}$");
        assert_eq!(errs[2].message, "Unexpected property: colour");
        assert_eq!(errs[2].path, "root");
    }

    #[test]
    fn other_keywords_keep_default_message() {
        let errs = format_errors(&[raw("/blocks", "minItems")]);
        assert_eq!(errs[0].message, "default message");
        assert_eq!(errs[0].keyword, "minItems");
        assert_eq!(errs[0].data, Value::Null);
    }

    #[test]
    fn missing_param_falls_back_to_default_message() {
        let errs = format_errors(&[raw("/x", "required")]);
        assert_eq!(errs[0].message, "default message");
    }

    #[test]
    fn preserves_order_and_count() {
        let input = vec![raw("/a", "x"), raw("/b", "y"), raw("", "z")];
        let paths: Vec<String> = format_errors(&input).into_iter().map(|e| e.path).collect();
        assert_eq!(paths, ["/a", "/b", "root"]);
    }

    #[test]
    fn warning_serializes_type_field() {
        let w = Warning::deprecation("version", "old");
        assert_eq!(
            serde_json::to_value(&w).unwrap(),
            json!({"path": "version", "message": "old", "type": "deprecation"})
        );
    }
}
