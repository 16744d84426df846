//! Turn state and output part types

use crate::generation::StructuredMessage;
use crate::protocol::Part;

/// Where a turn is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    /// Created, nothing reported yet
    #[default]
    Pending,
    /// At least one progress notification has been sent
    Streaming { updates: u32 },
    /// Final parts emitted; accepts no further events
    Terminal,
}

impl TurnState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnState::Terminal)
    }

    pub fn progress_count(&self) -> u32 {
        match self {
            TurnState::Streaming { updates } => *updates,
            TurnState::Pending | TurnState::Terminal => 0,
        }
    }
}

/// Immutable identifiers of the turn a machine belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnContext {
    pub task_id: String,
    pub context_id: String,
}

impl TurnContext {
    pub fn new(task_id: impl Into<String>, context_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            context_id: context_id.into(),
        }
    }
}

/// One element of a turn's final emission
#[derive(Debug, Clone, PartialEq)]
pub enum OutputPart {
    Text(String),
    Structured(StructuredMessage),
}

impl OutputPart {
    pub fn into_wire(self) -> Part {
        match self {
            OutputPart::Text(text) => Part::text(text),
            OutputPart::Structured(message) => Part::a2ui(message.into_value()),
        }
    }
}
