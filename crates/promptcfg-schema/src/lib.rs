//! # promptcfg-schema
//!
//! Validation engine for prompt configuration documents.
//!
//! Accepts JSON, YAML, or TOML text, parses it into one document model,
//! and validates it against the published prompt configuration JSON Schema.
//! Whole documents and isolated segments are both supported; segments are
//! validated in the context of a minimal wrapper document so the single
//! full-document schema covers both.
//!
//! ## Layout
//!
//! - [`format`]: format detection and requested-format parsing.
//! - [`parse`]: multi-format parsing into `serde_json::Value`.
//! - [`settings`], [`source`], [`provider`], [`compiled`]: schema
//!   acquisition (local first, remote fallback), compilation, and
//!   single-flight caching.
//! - [`diagnostics`]: error formatting and warnings.
//! - [`engine`], [`locator`]: config and segment validation.
//! - [`result`]: the result type every entry point returns.

pub mod compiled;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod format;
pub mod locator;
pub mod parse;
pub mod provider;
pub mod result;
pub mod settings;
pub mod source;

pub use compiled::CompiledSchema;
pub use diagnostics::{format_errors, RawValidationError, ValidationError, Warning, WarningType};
pub use engine::Validator;
pub use error::SchemaError;
pub use format::{detect_format, Format, RequestedFormat, UnknownFormat};
pub use parse::{parse_config, serialize_document, ParseError};
pub use provider::SchemaProvider;
pub use result::{ParsedDocument, ValidationResult};
pub use settings::{ConfigError, SchemaSettings};
pub use source::{DefaultSchemaSource, LocalFileSource, RemoteSource, SchemaSource};
