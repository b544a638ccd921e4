use crate::combat::BatchOutcome;
use crate::reaction::{ReactionMode, Verdict};
use crate::state::{AbilityId, ActorId, Phase, Stance};
use crate::turn::TurnTag;

/// Notifications emitted by a session as its state changes.
///
/// Sessions buffer events until the owner drains them with
/// [`crate::BattleSession::drain_events`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionEvent {
    PhaseChanged {
        from: Phase,
        to: Phase,
    },
    TurnStarted {
        index: usize,
        tag: TurnTag,
    },
    AbilityArmed {
        actor: ActorId,
        ability: AbilityId,
    },
    AbilityPlanned {
        actor: ActorId,
        ability: AbilityId,
        chain: usize,
    },
    PlanUndone {
        actor: ActorId,
        ability: AbilityId,
        chain: usize,
    },
    StanceChanged {
        stance: Stance,
    },
    /// A committed batch was applied. `outcome.total_damage` drives raid reports.
    BatchResolved {
        turn: usize,
        outcome: BatchOutcome,
    },
    StrikeTelegraphed {
        target: ActorId,
    },
    ReactionStarted {
        mode: ReactionMode,
    },
    ReactionResolved {
        target: ActorId,
        verdict: Verdict,
        damage: u32,
    },
    EnemyHpCorrected {
        local: u32,
        authoritative: u32,
    },
    /// Local HP hit zero in a raid; waiting for the ledger.
    VictoryProvisional,
    BattleEnded {
        phase: Phase,
    },
}
