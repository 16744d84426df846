//! Events that drive a turn

use crate::generation::ValidationOutcome;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Non-final progress reported by the model collaborator
    Progress,
    /// The generation loop finished
    Completed { outcome: ValidationOutcome },
}
