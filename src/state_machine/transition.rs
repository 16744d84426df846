//! Pure state transition function

use super::{Effect, Event, OutputPart, TurnContext, TurnState};
use crate::generation::{ValidationOutcome, RETRIES_EXHAUSTED_TEXT};
use thiserror::Error;

/// Status text attached to every progress notification
pub const PROGRESS_STATUS: &str = "Generating your UI...";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: TurnState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: TurnState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Turn {0} already completed")]
    AlreadyTerminal(String),
}

/// Pure transition function: no I/O, same inputs give the same outputs.
pub fn transition(
    state: &TurnState,
    context: &TurnContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        (TurnState::Terminal, _) => Err(TransitionError::AlreadyTerminal(context.task_id.clone())),

        (TurnState::Pending | TurnState::Streaming { .. }, Event::Progress) => {
            let updates = state.progress_count() + 1;
            Ok(TransitionResult::new(TurnState::Streaming { updates })
                .with_effect(Effect::NotifyProgress { status: PROGRESS_STATUS }))
        }

        (TurnState::Pending | TurnState::Streaming { .. }, Event::Completed { outcome }) => {
            Ok(TransitionResult::new(TurnState::Terminal)
                .with_effect(Effect::emit_final(assemble_parts(outcome))))
        }
    }
}

/// Build the ordered output parts for a finished turn.
///
/// Text-only outcomes give exactly one text part. Outcomes with a validated
/// payload give the trimmed text first (skipped when blank), then one part
/// per message in payload order.
pub fn assemble_parts(outcome: ValidationOutcome) -> Vec<OutputPart> {
    match outcome {
        ValidationOutcome::Valid { text, messages: None } => {
            vec![OutputPart::Text(text.trim().to_string())]
        }
        ValidationOutcome::Valid {
            text,
            messages: Some(messages),
        } => {
            let text = text.trim();
            let lead = (!text.is_empty()).then(|| OutputPart::Text(text.to_string()));
            lead.into_iter()
                .chain(messages.into_iter().map(OutputPart::Structured))
                .collect()
        }
        ValidationOutcome::Invalid(_) => vec![OutputPart::Text(RETRIES_EXHAUSTED_TEXT.to_string())],
    }
}
