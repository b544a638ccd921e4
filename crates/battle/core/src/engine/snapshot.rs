use crate::planner::{PlannedAction, Selection};
use crate::reaction::ParryVisual;
use crate::state::{Actor, ActorId, Phase, Stance};
use crate::turn::TurnTag;

/// Display data about the enemy that the rules never read.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyInfo {
    pub id: String,
    pub name: String,
    pub icon_url: Option<String>,
}

/// One-shot presentation cues raised when a strike resolves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlashSignals {
    pub success: bool,
    pub fail: bool,
    pub shake: bool,
}

/// Immutable view of a session for the UI layer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSnapshot {
    pub revision: u64,
    pub phase: Phase,
    pub stance: Stance,
    pub charge_level: f64,
    pub party: Vec<Actor>,
    pub enemy: Actor,
    pub enemy_info: EnemyInfo,
    pub turn_queue: Vec<TurnTag>,
    pub turn_index: usize,
    pub chain: usize,
    pub armed: Option<Selection>,
    pub planned: Vec<PlannedAction>,
    /// The last two battle log lines, oldest first.
    pub log: Vec<String>,
    pub parry: Option<ParryVisual>,
    pub flash: FlashSignals,
    pub strike_target: Option<ActorId>,
    pub victory_provisional: bool,
    pub finished: bool,
}

impl BattleSnapshot {
    pub fn current_turn(&self) -> Option<TurnTag> {
        self.turn_queue.get(self.turn_index).copied()
    }

    pub fn party_member(&self, id: ActorId) -> Option<&Actor> {
        self.party.iter().find(|actor| actor.id == id)
    }

    pub fn armed_selection(&self) -> Option<&Selection> {
        self.armed.as_ref()
    }
}
