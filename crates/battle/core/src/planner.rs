//! Per-turn ability planning.
//!
//! Selection is two-phase: the first `select` arms an ability, a second
//! `select` on the same armed ability plans it. Planning deducts AP right away
//! so the UI shows what is left; `undo_last` refunds it.

use crate::state::{Ability, AbilityId, Actor, ActorId};

/// An ability queued for the current batch but not yet resolved.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannedAction {
    pub actor: ActorId,
    pub ability: Ability,
}

/// The currently armed (selected but unconfirmed) ability.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Selection {
    pub actor: ActorId,
    pub ability: AbilityId,
}

/// Result of a successful `select`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The ability is now armed; select it again to plan it.
    Armed(Selection),
    /// The ability was planned; `chain` is the new chain length.
    Planned { chain: usize },
}

/// Reasons a planning command is refused. None of them change state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error("actor {0} is not in the party")]
    UnknownActor(ActorId),

    #[error("actor {actor} does not know ability '{ability}'")]
    UnknownAbility { actor: ActorId, ability: AbilityId },

    #[error("actor {0} is down")]
    ActorDown(ActorId),

    #[error("ability '{ability}' needs {required} AP but {actor} has {available}")]
    InsufficientAp {
        actor: ActorId,
        ability: AbilityId,
        required: u32,
        available: u32,
    },

    #[error("ability '{ability}' is on cooldown for {remaining} more turn(s)")]
    OnCooldown { ability: AbilityId, remaining: u8 },

    #[error("nothing planned to undo")]
    NothingToUndo,
}

#[derive(Clone, Debug, Default)]
pub struct AbilityPlanner {
    planned: Vec<PlannedAction>,
    armed: Option<Selection>,
}

impl AbilityPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn planned(&self) -> &[PlannedAction] {
        &self.planned
    }

    pub fn armed(&self) -> Option<&Selection> {
        self.armed.as_ref()
    }

    /// Number of abilities chained into the current batch.
    pub fn chain_count(&self) -> usize {
        self.planned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planned.is_empty()
    }

    pub fn select(
        &mut self,
        party: &mut [Actor],
        actor_id: ActorId,
        ability_id: &AbilityId,
    ) -> Result<SelectOutcome, PlanError> {
        let actor = party
            .iter_mut()
            .find(|actor| actor.id == actor_id)
            .ok_or(PlanError::UnknownActor(actor_id))?;

        if !actor.is_alive() {
            return Err(PlanError::ActorDown(actor_id));
        }

        let ability = actor
            .ability(ability_id)
            .cloned()
            .ok_or_else(|| PlanError::UnknownAbility {
                actor: actor_id,
                ability: ability_id.clone(),
            })?;

        let remaining = actor.cooldown_remaining(ability_id);
        if remaining > 0 {
            return Err(PlanError::OnCooldown {
                ability: ability_id.clone(),
                remaining,
            });
        }

        // An ability with a cooldown can only go into a batch once.
        if ability.cooldown > 0
            && self
                .planned
                .iter()
                .any(|p| p.actor == actor_id && p.ability.id == ability.id)
        {
            return Err(PlanError::OnCooldown {
                ability: ability_id.clone(),
                remaining: ability.cooldown,
            });
        }

        let selection = Selection {
            actor: actor_id,
            ability: ability_id.clone(),
        };

        if self.armed.as_ref() != Some(&selection) {
            self.armed = Some(selection.clone());
            return Ok(SelectOutcome::Armed(selection));
        }

        if !actor.spend_ap(ability.ap_cost) {
            return Err(PlanError::InsufficientAp {
                actor: actor_id,
                ability: ability_id.clone(),
                required: ability.ap_cost,
                available: actor.ap().current(),
            });
        }

        self.planned.push(PlannedAction {
            actor: actor_id,
            ability,
        });
        self.armed = None;

        Ok(SelectOutcome::Planned {
            chain: self.planned.len(),
        })
    }

    /// Removes the last planned action and refunds its AP.
    pub fn undo_last(&mut self, party: &mut [Actor]) -> Result<PlannedAction, PlanError> {
        let action = self.planned.pop().ok_or(PlanError::NothingToUndo)?;
        if let Some(actor) = party.iter_mut().find(|actor| actor.id == action.actor) {
            actor.restore_ap(action.ability.ap_cost);
        }
        Ok(action)
    }

    /// Drops the plan and selection without refunding AP.
    pub fn clear(&mut self) {
        self.planned.clear();
        self.armed = None;
    }
}
