//! Effects produced by state transitions

use super::state::OutputPart;
use crate::protocol::TaskState;

/// Effects to be executed after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Tell the client the turn is still working
    NotifyProgress { status: &'static str },

    /// Send the terminal emission
    EmitFinal {
        parts: Vec<OutputPart>,
        task_state: TaskState,
    },
}

impl Effect {
    pub fn emit_final(parts: Vec<OutputPart>) -> Self {
        Effect::EmitFinal {
            parts,
            // Tasks stay open so the conversation can continue after failures
            task_state: TaskState::InputRequired,
        }
    }
}
