//! Property-based tests for the turn state machine

use super::transition::{assemble_parts, PROGRESS_STATUS};
use super::*;
use crate::generation::{GenerationError, StructuredMessage, ValidationOutcome};
use proptest::prelude::*;
use serde_json::json;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_message() -> impl Strategy<Value = StructuredMessage> {
    "[a-z]{1,8}".prop_map(|id| {
        serde_json::from_value(json!({"deleteSurface": {"surfaceId": id}})).unwrap()
    })
}

fn arb_outcome() -> impl Strategy<Value = ValidationOutcome> {
    prop_oneof![
        "[a-zA-Z \\n]{0,20}".prop_map(ValidationOutcome::text_only),
        (
            "[a-zA-Z \\n]{0,20}",
            proptest::collection::vec(arb_message(), 0..5)
        )
            .prop_map(|(text, messages)| ValidationOutcome::Valid {
                text,
                messages: Some(messages)
            }),
        Just(ValidationOutcome::Invalid(GenerationError::MissingDelimiter)),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        4 => Just(Event::Progress),
        1 => arb_outcome().prop_map(|outcome| Event::Completed { outcome }),
    ]
}

fn ctx() -> TurnContext {
    TurnContext::new("t", "c")
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Any event sequence reaches Terminal at most once, emits at most one
    /// final, and every later event is rejected.
    #[test]
    fn terminal_reached_at_most_once(events in proptest::collection::vec(arb_event(), 0..30)) {
        let mut state = TurnState::Pending;
        let mut finals = 0;
        let mut progress = 0u32;

        for event in events {
            let was_terminal = state.is_terminal();
            match transition(&state, &ctx(), event) {
                Ok(result) => {
                    prop_assert!(!was_terminal);
                    for effect in &result.effects {
                        match effect {
                            Effect::NotifyProgress { status } => {
                                prop_assert_eq!(*status, PROGRESS_STATUS);
                                progress += 1;
                            }
                            Effect::EmitFinal { .. } => finals += 1,
                        }
                    }
                    state = result.new_state;
                    if !state.is_terminal() {
                        prop_assert_eq!(state.progress_count(), progress);
                    }
                }
                Err(_) => prop_assert!(was_terminal),
            }
        }

        prop_assert!(finals <= 1);
        prop_assert_eq!(finals == 1, state.is_terminal());
    }

    /// Structured parts keep payload order and always follow any text part
    #[test]
    fn parts_are_ordered(outcome in arb_outcome()) {
        let expected_ids: Vec<String> = match &outcome {
            ValidationOutcome::Valid { messages: Some(m), .. } => m
                .iter()
                .filter_map(|m| m.surface_id().map(str::to_string))
                .collect(),
            _ => vec![],
        };
        let text_only = matches!(
            outcome,
            ValidationOutcome::Valid { messages: None, .. } | ValidationOutcome::Invalid(_)
        );

        let parts = assemble_parts(outcome);

        if text_only {
            prop_assert_eq!(parts.len(), 1);
            prop_assert!(matches!(parts[0], OutputPart::Text(_)));
        }

        let first_structured = parts
            .iter()
            .position(|p| matches!(p, OutputPart::Structured(_)))
            .unwrap_or(parts.len());
        prop_assert!(parts
            .iter()
            .skip(first_structured)
            .all(|p| matches!(p, OutputPart::Structured(_))));
        prop_assert!(first_structured <= 1);

        let got: Vec<String> = parts
            .iter()
            .filter_map(|p| match p {
                OutputPart::Structured(m) => m.surface_id().map(str::to_string),
                OutputPart::Text(_) => None,
            })
            .collect();
        prop_assert_eq!(got, expected_ids);

        for part in &parts {
            if let OutputPart::Text(t) = part {
                prop_assert_eq!(t.trim(), t.as_str());
            }
        }
    }
}
