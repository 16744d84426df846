//! Per-attempt validation outcomes

use crate::schema::{Schema, SchemaViolation};
use crate::splitter;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Why one generation attempt was rejected.
///
/// All of these are recovered inside the generation loop by retrying with
/// feedback; none reach the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("Delimiter '---a2ui_JSON---' not found")]
    MissingDelimiter,
    #[error("JSON part is empty")]
    EmptyPayload,
    #[error("Malformed JSON: {0}")]
    MalformedJson(String),
    #[error("Schema violation: {0}")]
    SchemaViolation(SchemaViolation),
    #[error("No final response from the model")]
    NoFinalResponse,
}

/// The A2UI message kinds defined by the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    BeginRendering,
    SurfaceUpdate,
    DataModelUpdate,
    DeleteSurface,
}

impl MessageKind {
    const ALL: [MessageKind; 4] = [
        MessageKind::BeginRendering,
        MessageKind::SurfaceUpdate,
        MessageKind::DataModelUpdate,
        MessageKind::DeleteSurface,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::BeginRendering => "beginRendering",
            MessageKind::SurfaceUpdate => "surfaceUpdate",
            MessageKind::DataModelUpdate => "dataModelUpdate",
            MessageKind::DeleteSurface => "deleteSurface",
        }
    }
}

/// One schema-validated A2UI message, kept exactly as the model produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuredMessage(Value);

impl StructuredMessage {
    pub fn into_value(self) -> Value {
        self.0
    }

    /// First message kind present in the message, if any
    pub fn kind(&self) -> Option<MessageKind> {
        MessageKind::ALL
            .into_iter()
            .find(|kind| self.0.get(kind.as_str()).is_some())
    }

    /// Surface addressed by the message
    pub fn surface_id(&self) -> Option<&str> {
        let kind = self.kind()?;
        self.0.get(kind.as_str())?.get("surfaceId")?.as_str()
    }
}

/// Result of checking one model response
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Valid {
        /// Explanatory text, untrimmed
        text: String,
        /// `None` for text-only content; `Some` when a payload was validated,
        /// in payload order
        messages: Option<Vec<StructuredMessage>>,
    },
    Invalid(GenerationError),
}

impl ValidationOutcome {
    pub fn text_only(text: impl Into<String>) -> Self {
        ValidationOutcome::Valid {
            text: text.into(),
            messages: None,
        }
    }

    #[cfg(test)]
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid { .. })
    }
}

/// Plain text mode: every response is valid and passed through unmodified
pub fn evaluate_text(raw: String) -> ValidationOutcome {
    ValidationOutcome::text_only(raw)
}

/// Structured mode: split, clean, parse and validate the payload
pub fn evaluate_structured(raw: &str, schema: &Schema) -> ValidationOutcome {
    let split = splitter::split(raw);
    let Some(json) = split.json_payload.as_deref() else {
        return ValidationOutcome::Invalid(GenerationError::MissingDelimiter);
    };

    let cleaned = splitter::clean_payload(json);
    if cleaned.is_empty() {
        return ValidationOutcome::Invalid(GenerationError::EmptyPayload);
    }

    let payload: Value = match serde_json::from_str(cleaned) {
        Ok(v) => v,
        Err(e) => return ValidationOutcome::Invalid(GenerationError::MalformedJson(e.to_string())),
    };

    if let Err(violation) = schema.validate_payload(&payload) {
        return ValidationOutcome::Invalid(GenerationError::SchemaViolation(violation));
    }

    let messages = match payload {
        Value::Array(items) => items.into_iter().map(StructuredMessage).collect(),
        single => vec![StructuredMessage(single)],
    };

    ValidationOutcome::Valid {
        text: split.explanatory_text,
        messages: Some(messages),
    }
}
