use crate::state::{AbilityId, ActorId};

/// What one resolved action did.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectOutcome {
    Damage { amount: u32, enemy_hp: u32 },
    Heal { per_member: u32, healed: Vec<(ActorId, u32)> },
    Buff { turns: u8 },
    Debuff { turns: u8 },
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionOutcome {
    pub position: usize,
    pub actor: ActorId,
    pub ability: AbilityId,
    pub ability_name: String,
    pub effect: EffectOutcome,
}

/// Aggregate result of resolving a planned batch.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchOutcome {
    pub actions: Vec<ActionOutcome>,
    /// HP actually removed from the enemy.
    pub total_damage: u32,
    /// HP actually restored across the party.
    pub total_healed: u32,
    pub enemy_hp: u32,
}

impl BatchOutcome {
    pub fn enemy_defeated(&self) -> bool {
        self.enemy_hp == 0
    }
}
