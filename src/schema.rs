//! A2UI message schema
//!
//! The schema describes one A2UI message. Model payloads are lists of such
//! messages, so payloads are checked against a list schema whose `items` is
//! the single-message schema. Only the first violation is reported.

use jsonschema::Validator;
use serde_json::{json, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Built-in single-message schema, shipped with the binary
const BUILTIN_SCHEMA: &str = include_str!("schema/a2ui_message.json");

/// Errors raised while loading or compiling the schema.
///
/// These are configuration failures: a service without a schema never
/// attempts a structured-output turn.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read schema file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("schema is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid schema: {0}")]
    Invalid(String),
}

/// First schema violation found in a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// Location of the offending value, e.g. `$/0/surfaceUpdate/components`
    pub path: String,
    pub reason: String,
}

impl SchemaViolation {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }

    fn from_error(error: &jsonschema::ValidationError<'_>) -> Self {
        Self::new(format!("${}", error.instance_path()), error.to_string())
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.reason, self.path)
    }
}

/// Compiled A2UI single-message schema
pub struct Schema {
    message: Validator,
    list: Validator,
    source: String,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("source_len", &self.source.len())
            .finish_non_exhaustive()
    }
}

impl Schema {
    /// Compile the schema bundled with the binary
    pub fn builtin() -> Result<Self, SchemaError> {
        Self::from_json_str(BUILTIN_SCHEMA)
    }

    /// Load the schema from `path` if given, otherwise use the built-in one
    pub fn load(path: Option<&Path>) -> Result<Self, SchemaError> {
        let Some(path) = path else {
            return Self::builtin();
        };
        let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(text)?;
        let message = compile(&value)?;
        let list = compile(&json!({"type": "array", "items": value}))?;
        Ok(Self {
            message,
            list,
            source: text.trim().to_string(),
        })
    }

    /// Schema text as loaded, for embedding in the UI instruction
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Validate one message against the single-message schema
    pub fn validate_message(&self, message: &Value) -> Result<(), SchemaViolation> {
        self.message
            .validate(message)
            .map_err(|e| SchemaViolation::from_error(&e))
    }

    /// Validate a whole payload.
    ///
    /// A list is checked against the list schema (paths `$/0`, `$/1`, ...)
    /// and a bare object is checked as a single message. Anything else is
    /// rejected at `$`.
    pub fn validate_payload(&self, payload: &Value) -> Result<(), SchemaViolation> {
        if payload.is_object() {
            return self.validate_message(payload);
        }
        self.list
            .validate(payload)
            .map_err(|e| SchemaViolation::from_error(&e))
    }
}

fn compile(schema: &Value) -> Result<Validator, SchemaError> {
    jsonschema::validator_for(schema).map_err(|e| SchemaError::Invalid(e.to_string()))
}
