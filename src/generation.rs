//! Self-correcting generation loop
//!
//! One user turn may take several model attempts. Each response is split,
//! parsed and validated; an invalid response is fed back to the model with
//! the failure reason until the attempt budget runs out, at which point a
//! fixed apology is returned instead. The loop never fails outward.

mod outcome;

pub use outcome::{
    evaluate_structured, evaluate_text, GenerationError, StructuredMessage, ValidationOutcome,
};

use crate::schema::Schema;
use outcome::MessageKind;
use futures::stream::BoxStream;
use futures::StreamExt;
use std::sync::Arc;

/// Default attempt budget: the initial attempt plus one retry
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

/// Sent when the last attempt produced no final response
pub const NO_RESPONSE_TEXT: &str = "Sorry, I couldn't process your request.";

/// Sent when every attempt produced invalid structured output
pub const RETRIES_EXHAUSTED_TEXT: &str =
    "Sorry, I'm having trouble generating the UI. Please try again.";

/// Sent for structured turns when the schema failed to load at startup
pub const CONFIG_ERROR_TEXT: &str = "Internal configuration error. Please contact support.";

// ============================================================================
// Generation collaborator
// ============================================================================

/// Event produced by the model collaborator during one attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationEvent {
    /// Non-final progress; carries no content
    Progress,
    /// Final response text. At most one per attempt, always last.
    Final { text: String },
}

pub type GenerationStream = BoxStream<'static, GenerationEvent>;

/// Model invocation seam.
///
/// A stream that ends without [`GenerationEvent::Final`] is an attempt
/// failure.
pub trait Generator: Send + Sync {
    fn generate(&self, session_id: &str, query: &str, structured: bool) -> GenerationStream;
}

impl<T: Generator + ?Sized> Generator for Arc<T> {
    fn generate(&self, session_id: &str, query: &str, structured: bool) -> GenerationStream {
        (**self).generate(session_id, query, structured)
    }
}

// ============================================================================
// Turn
// ============================================================================

/// One request/response exchange, owned by the loop while it runs
#[derive(Debug, Clone)]
pub struct Turn {
    /// Correlation id (the task id on the wire)
    pub id: String,
    /// Conversation session the model history belongs to
    pub session_id: String,
    /// Originating query text
    pub query: String,
    /// Whether the response must carry validated A2UI messages
    pub structured: bool,
    attempt: u32,
    terminal: bool,
    failures: Vec<GenerationError>,
}

impl Turn {
    pub fn new(
        id: impl Into<String>,
        session_id: impl Into<String>,
        query: impl Into<String>,
        structured: bool,
    ) -> Self {
        Self {
            id: id.into(),
            session_id: session_id.into(),
            query: query.into(),
            structured,
            attempt: 0,
            terminal: false,
            failures: Vec::new(),
        }
    }

    /// Number of attempts started so far
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Rejection reason of every failed attempt, in order
    pub fn failures(&self) -> &[GenerationError] {
        &self.failures
    }

    fn finish(&mut self, outcome: ValidationOutcome) -> ValidationOutcome {
        self.terminal = true;
        outcome
    }
}

// ============================================================================
// Loop
// ============================================================================

/// Loop configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Attempts per turn, initial attempt included
    pub max_attempts: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl GenerationConfig {
    pub fn from_env() -> Self {
        let max_attempts = std::env::var("UI_BUILDER_MAX_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_ATTEMPTS)
            .max(1);
        Self { max_attempts }
    }
}

/// Query for the next attempt after an invalid response
pub fn correction_query(error: &GenerationError, original: &str) -> String {
    format!(
        "Your previous response was invalid. Validation failed: {error}. \
         Generate a valid A2UI JSON response. Original request: '{original}'"
    )
}

/// Query for the next attempt after a missing final response
pub fn retry_query(original: &str) -> String {
    format!("Please retry: '{original}'")
}

/// The generation-validation loop.
///
/// `schema` is `None` when the schema failed to load; structured turns are
/// then answered with [`CONFIG_ERROR_TEXT`] without calling the model.
pub struct GenerationLoop {
    schema: Option<Arc<Schema>>,
    config: GenerationConfig,
}

impl GenerationLoop {
    pub fn new(schema: Option<Arc<Schema>>, config: GenerationConfig) -> Self {
        Self { schema, config }
    }

    pub fn config(&self) -> GenerationConfig {
        self.config
    }

    pub fn has_schema(&self) -> bool {
        self.schema.is_some()
    }

    /// Run `turn` to completion.
    ///
    /// `on_progress` is called once per progress event, in order. The
    /// returned outcome is always [`ValidationOutcome::Valid`].
    pub async fn run<G, F>(&self, turn: &mut Turn, generator: &G, mut on_progress: F) -> ValidationOutcome
    where
        G: Generator + ?Sized,
        F: FnMut() + Send,
    {
        let schema = match (&self.schema, turn.structured) {
            (Some(schema), true) => Some(schema.as_ref()),
            (None, true) => {
                tracing::error!(turn_id = %turn.id, "A2UI schema is not loaded, cannot perform UI validation");
                return turn.finish(ValidationOutcome::text_only(CONFIG_ERROR_TEXT));
            }
            (_, false) => None,
        };

        let max_attempts = self.config.max_attempts.max(1);
        let mut query = turn.query.clone();

        while turn.attempt < max_attempts {
            turn.attempt += 1;
            tracing::info!(
                turn_id = %turn.id,
                session_id = %turn.session_id,
                attempt = turn.attempt,
                max_attempts,
                structured = turn.structured,
                "Starting generation attempt"
            );

            let Some(response) =
                await_final(generator, &turn.session_id, &query, turn.structured, &mut on_progress).await
            else {
                tracing::warn!(turn_id = %turn.id, attempt = turn.attempt, "No final response content");
                turn.failures.push(GenerationError::NoFinalResponse);
                if turn.attempt < max_attempts {
                    query = retry_query(&turn.query);
                    continue;
                }
                return turn.finish(ValidationOutcome::text_only(NO_RESPONSE_TEXT));
            };

            let outcome = match schema {
                Some(schema) => evaluate_structured(&response, schema),
                None => evaluate_text(response),
            };

            match outcome {
                ValidationOutcome::Valid { ref messages, .. } => {
                    let messages = messages.as_deref().unwrap_or_default();
                    tracing::info!(
                        turn_id = %turn.id,
                        attempt = turn.attempt,
                        messages = messages.len(),
                        kinds = ?messages.iter().filter_map(|m| m.kind().map(MessageKind::as_str)).collect::<Vec<_>>(),
                        surfaces = ?messages.iter().filter_map(StructuredMessage::surface_id).collect::<Vec<_>>(),
                        "Response valid"
                    );
                    return turn.finish(outcome);
                }
                ValidationOutcome::Invalid(error) => {
                    tracing::warn!(
                        turn_id = %turn.id,
                        attempt = turn.attempt,
                        error = %error,
                        "A2UI validation failed"
                    );
                    if turn.attempt < max_attempts {
                        query = correction_query(&error, &turn.query);
                    }
                    turn.failures.push(error);
                }
            }
        }

        tracing::error!(turn_id = %turn.id, attempts = turn.attempt, "Max retries exhausted, sending text-only error");
        turn.finish(ValidationOutcome::text_only(RETRIES_EXHAUSTED_TEXT))
    }
}

/// Drain one attempt's stream up to its final event
async fn await_final<G, F>(
    generator: &G,
    session_id: &str,
    query: &str,
    structured: bool,
    on_progress: &mut F,
) -> Option<String>
where
    G: Generator + ?Sized,
    F: FnMut() + Send,
{
    let mut events = generator.generate(session_id, query, structured);
    while let Some(event) = events.next().await {
        match event {
            GenerationEvent::Progress => on_progress(),
            GenerationEvent::Final { text } => return Some(text),
        }
    }
    None
}
