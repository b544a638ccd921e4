//! Event types produced by the runtime itself rather than the session.

use serde::{Deserialize, Serialize};

/// Outcome of forwarding dealt damage to the raid ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaidEvent {
    DamageReported { amount: u32 },

    /// The report was dropped. The local battle carries on regardless.
    ReportFailed { amount: u32, error: String },
}
