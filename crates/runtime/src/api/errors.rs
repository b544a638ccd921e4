//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from setup providers, the raid channel and worker
//! coordination so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use battle_core::SessionError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The battle could not be opened. Not recoverable for this encounter.
    #[error("battle setup failed: {0}")]
    Setup(#[from] SetupError),

    /// The session ignored the command (wrong phase, not enough AP, ...).
    /// State is unchanged.
    #[error("command rejected: {0}")]
    Rejected(#[source] SessionError),

    #[error("session failure: {0}")]
    Session(#[source] SessionError),

    #[error("runtime requires an encounter provider before building")]
    MissingProvider,

    #[error("runtime requires an encounter before building")]
    MissingEncounter,

    #[error("raid encounters require a raid channel")]
    MissingRaidChannel,

    #[error(transparent)]
    Raid(#[from] RaidError),

    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("session worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl RuntimeError {
    pub fn is_rejection(&self) -> bool {
        matches!(self, RuntimeError::Rejected(_))
    }
}

impl From<SessionError> for RuntimeError {
    fn from(err: SessionError) -> Self {
        if err.is_rejection() {
            RuntimeError::Rejected(err)
        } else {
            RuntimeError::Session(err)
        }
    }
}

/// Failures while fetching what a battle needs to start.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("encounter '{0}' not found")]
    EnemyNotFound(String),

    #[error("raid '{0}' not found")]
    RaidNotFound(String),

    #[error("no profile for user '{0}'")]
    ProfileNotFound(String),

    #[error("enemy '{id}' is invalid: {reason}")]
    InvalidEnemy { id: String, reason: &'static str },

    #[error("{what} fetch failed: {message}")]
    Fetch { what: &'static str, message: String },

    #[error("could not open session: {0}")]
    Session(#[source] SessionError),
}

/// Failures talking to the shared raid ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RaidError {
    #[error("raid '{0}' is unknown to the ledger")]
    UnknownRaid(String),

    #[error("raid ledger unavailable: {0}")]
    Unavailable(String),

    #[error("raid hp subscription closed")]
    SubscriptionClosed,
}
