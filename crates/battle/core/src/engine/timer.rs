use std::time::Duration;

/// Deferred phase transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionKind {
    /// Windup telegraph finished.
    BeginStrike,
    /// Post-commit settle or post-strike pause finished.
    AdvanceTurn,
    /// A provisional raid kill was not confirmed in time.
    ConfirmationTimeout,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingTransition {
    pub due: Duration,
    pub kind: TransitionKind,
}

/// Single-slot timer for the next scheduled transition.
///
/// Scheduling replaces whatever was pending, so transitions never stack up.
#[derive(Clone, Debug, Default)]
pub struct TransitionTimer {
    pending: Option<PendingTransition>,
}

impl TransitionTimer {
    /// Schedules `kind` at `due`, returning the transition it replaced.
    pub fn schedule(&mut self, due: Duration, kind: TransitionKind) -> Option<PendingTransition> {
        self.pending.replace(PendingTransition { due, kind })
    }

    pub fn cancel(&mut self) -> Option<PendingTransition> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<PendingTransition> {
        self.pending
    }

    pub fn due_at(&self) -> Option<Duration> {
        self.pending.map(|pending| pending.due)
    }

    /// Removes and returns the pending transition if it is due at `now`.
    pub fn take_due(&mut self, now: Duration) -> Option<PendingTransition> {
        match self.pending {
            Some(pending) if pending.due <= now => self.pending.take(),
            _ => None,
        }
    }
}
