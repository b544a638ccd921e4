use crate::state::Phase;

/// Internal session stage.
///
/// Finer than [`Phase`]: `Resolving` is the busy state while a committed batch
/// settles, and `AwaitingConfirmation` holds a provisional raid kill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stage {
    Planning,
    Resolving,
    AwaitingConfirmation,
    Windup,
    Strike,
    Victory,
    Defeat,
}

impl Stage {
    pub fn phase(self) -> Phase {
        match self {
            Stage::Planning | Stage::Resolving | Stage::AwaitingConfirmation => Phase::Active,
            Stage::Windup => Phase::EnemyWindup,
            Stage::Strike => Phase::EnemyStrike,
            Stage::Victory => Phase::Victory,
            Stage::Defeat => Phase::Defeat,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.phase().is_terminal()
    }

    /// The complete transition table.
    pub fn can_transition_to(self, next: Stage) -> bool {
        use Stage::*;
        matches!(
            (self, next),
            (Planning, Resolving | Windup | Victory)
                | (Resolving, Planning | Victory | AwaitingConfirmation)
                | (AwaitingConfirmation, Planning | Victory)
                | (Windup, Strike)
                | (Strike, Planning | Victory | Defeat)
        )
    }
}
