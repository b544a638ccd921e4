//! Error types for session commands.

use crate::combat::ResolveError;
use crate::planner::PlanError;
use crate::state::ActorId;

use super::Stage;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("battle party has no living members")]
    EmptyParty,

    #[error("{command} is not accepted during {stage}")]
    NotAccepting { command: &'static str, stage: Stage },

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("batch resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    #[error("no living party member to target")]
    NoStrikeTarget,

    #[error("strike target {0} is missing from the party")]
    MissingStrikeTarget(ActorId),

    #[error("authoritative HP updates only apply to raid sessions")]
    NotRaid,

    #[error("invalid stage transition {from} -> {to}")]
    InvalidTransition { from: Stage, to: Stage },
}

impl SessionError {
    /// True for ignored input such as a wrong phase, missing AP or a double
    /// commit. Everything else is an internal failure.
    pub fn is_rejection(&self) -> bool {
        matches!(self, SessionError::NotAccepting { .. } | SessionError::Plan(_))
    }
}
