//! Per-turn state machine
//!
//! Elm-style pure transitions: the executor feeds events in, applies the
//! returned effects, and discards the machine once it is terminal.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{OutputPart, TurnContext, TurnState};
pub use transition::{transition, TransitionError};
