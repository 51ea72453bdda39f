//! Compiled schema wrapper.
//!
//! Wraps a `jsonschema::Validator` bound to one schema document and
//! converts its errors into [`RawValidationError`] records with the
//! parameter shapes the formatter expects.

use std::fmt;

use jsonschema::error::{TypeKind, ValidationErrorKind};
use jsonschema::{Retrieve, Uri, Validator};
use serde_json::{json, Value};

use crate::diagnostics::RawValidationError;
use crate::error::SchemaError;

/// Resolves external `$ref`s without touching the network or disk.
///
/// The prompt schema is self-contained; anything it references outside
/// itself resolves to an accept-all schema.
struct OfflineRetriever;

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        tracing::warn!(uri = uri.as_str(), "external $ref not resolved, treating as accept-all");
        Ok(json!({}))
    }
}

/// A schema compiled once and reused for every validation.
pub struct CompiledSchema {
    validator: Validator,
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema").finish_non_exhaustive()
    }
}

impl CompiledSchema {
    /// Compile a schema document.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Compile`] if the document is not a valid schema.
    pub fn compile(schema: &Value) -> Result<Self, SchemaError> {
        let validator = jsonschema::options()
            .with_retriever(OfflineRetriever)
            .build(schema)
            .map_err(|e| SchemaError::Compile {
                reason: e.to_string(),
            })?;
        Ok(Self { validator })
    }

    /// Validate a document, returning the outcome and every violation.
    pub fn validate(&self, instance: &Value) -> (bool, Vec<RawValidationError>) {
        let errors: Vec<RawValidationError> = self
            .validator
            .iter_errors(instance)
            .flat_map(|e| raw_errors(&e))
            .collect();
        (errors.is_empty(), errors)
    }
}

/// Convert one validator error into raw records.
///
/// `additionalProperties` failures name every unexpected key at once; they
/// are split into one record per key.
fn raw_errors(error: &jsonschema::ValidationError<'_>) -> Vec<RawValidationError> {
    let path = error.instance_path.to_string();
    let message = error.to_string();
    let data = error.instance.clone().into_owned();
    let base = |keyword: &str| {
        RawValidationError::new(path.clone(), keyword, message.clone()).with_data(data.clone())
    };

    match &error.kind {
        ValidationErrorKind::Required { property } => {
            let name = property
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| property.to_string());
            vec![base("required").with_param("missingProperty", name)]
        }
        ValidationErrorKind::Enum { options } => {
            vec![base("enum").with_param("allowedValues", options.clone())]
        }
        ValidationErrorKind::Type { kind } => {
            let expected = match kind {
                TypeKind::Single(t) => t.to_string(),
                TypeKind::Multiple(set) => (*set)
                    .into_iter()
                    .map(|t| t.to_string())
                    .collect::<Vec<_>>()
                    .join(","),
            };
            vec![base("type").with_param("type", expected)]
        }
        ValidationErrorKind::Pattern { pattern } => {
            vec![base("pattern").with_param("pattern", pattern.clone())]
        }
        ValidationErrorKind::AdditionalProperties { unexpected } => unexpected
            .iter()
            .map(|name| base("additionalProperties").with_param("additionalProperty", name.clone()))
            .collect(),
        _ => vec![base(&keyword_from_schema_path(&error.schema_path.to_string()))],
    }
}

/// The rule name is the last non-index token of the schema path.
fn keyword_from_schema_path(schema_path: &str) -> String {
    schema_path
        .rsplit('/')
        .find(|token| !token.is_empty() && !token.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or("schema")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> CompiledSchema {
        CompiledSchema::compile(&json!({
            "type": "object",
            "required": ["name"],
            "additionalProperties": false,
            "properties": {
                "name": { "type": "string", "pattern": "^[a-z]+$" },
                "kind": { "enum": ["a", "b"] },
                "items": { "type": "array", "minItems": 1 }
            }
        }))
        .unwrap()
    }

    #[test]
    fn valid_document_has_no_errors() {
        let (valid, errors) = schema().validate(&json!({"name": "abc"}));
        assert!(valid);
        assert!(errors.is_empty());
    }

    #[test]
    fn required_carries_missing_property() {
        let (valid, errors) = schema().validate(&json!({}));
        assert!(!valid);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].keyword, "required");
        assert_eq!(errors[0].path, "");
        assert_eq!(errors[0].params["missingProperty"], "name");
    }

    #[test]
    fn enum_type_and_pattern_params() {
        let (_, errors) = schema().validate(&json!({"name": "ABC", "kind": "c"}));
        let pattern = errors.iter().find(|e| e.keyword == "pattern").unwrap();
        assert_eq!(pattern.path, "/name");
        assert_eq!(pattern.params["pattern"], "^[a-z]+$");
        assert_eq!(pattern.data, Some(json!("ABC")));

        let en = errors.iter().find(|e| e.keyword == "enum").unwrap();
        assert_eq!(en.params["allowedValues"], json!(["a", "b"]));

        let (_, errors) = schema().validate(&json!({"name": 5}));
        let ty = errors.iter().find(|e| e.keyword == "type").unwrap();
        assert_eq!(ty.params["type"], "string");
    }

    #[test]
    fn additional_properties_split_per_key() {
        let (_, errors) = schema().validate(&json!({"name": "a", "x": 1, "y": 2}));
        let mut extra: Vec<&str> = errors
            .iter()
            .filter(|e| e.keyword == "additionalProperties")
            .map(|e| e.params["additionalProperty"].as_str().unwrap())
            .collect();
        extra.sort_unstable();
        assert_eq!(extra, ["x", "y"]);
    }

    #[test]
    fn other_keywords_come_from_schema_path() {
        let (_, errors) = schema().validate(&json!({"name": "a", "items": []}));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].keyword, "minItems");
        assert_eq!(errors[0].path, "/items");
    }

    #[test]
    fn keyword_skips_index_tokens() {
        assert_eq!(keyword_from_schema_path("/allOf/2/then/anyOf"), "anyOf");
        assert_eq!(keyword_from_schema_path("/required/0"), "required");
        assert_eq!(keyword_from_schema_path(""), "schema");
    }

    #[test]
    fn invalid_schema_fails_to_compile() {
        let err = CompiledSchema::compile(&json!({"type": 12})).unwrap_err();
        assert!(matches!(err, SchemaError::Compile { .. }));
    }
}
