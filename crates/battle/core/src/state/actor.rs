use std::collections::BTreeMap;

use super::{Ability, AbilityId, ActorId, ResourceMeter};

/// Which side an actor fights on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActorKind {
    Player,
    Enemy,
}

/// Turn-based status counters. A counter is active while non-zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusCounters {
    pub attack_buff: u8,
    pub defense_down: u8,
}

impl StatusCounters {
    pub fn attack_buff_active(&self) -> bool {
        self.attack_buff > 0
    }

    pub fn defense_down_active(&self) -> bool {
        self.defense_down > 0
    }

    /// Decrements every counter by one, flooring at zero.
    pub fn tick(&mut self) {
        self.attack_buff = self.attack_buff.saturating_sub(1);
        self.defense_down = self.defense_down.saturating_sub(1);
    }
}

/// A combatant.
///
/// HP and AP are [`ResourceMeter`]s, so `0 <= hp <= max_hp` and
/// `0 <= ap <= max_ap` hold after any mutation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub kind: ActorKind,
    pub level: u32,
    hp: ResourceMeter,
    ap: ResourceMeter,
    pub status: StatusCounters,
    pub abilities: Vec<Ability>,
    cooldowns: BTreeMap<AbilityId, u8>,
}

impl Actor {
    pub fn new(
        id: ActorId,
        name: impl Into<String>,
        kind: ActorKind,
        hp: ResourceMeter,
        ap: ResourceMeter,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            level: 1,
            hp,
            ap,
            status: StatusCounters::default(),
            abilities: Vec::new(),
            cooldowns: BTreeMap::new(),
        }
    }

    /// Creates a party member with full HP and AP.
    pub fn player(id: ActorId, name: impl Into<String>, max_hp: u32, max_ap: u32) -> Self {
        Self::new(
            id,
            name,
            ActorKind::Player,
            ResourceMeter::full(max_hp),
            ResourceMeter::full(max_ap),
        )
    }

    /// Creates the enemy actor. Enemies do not plan, so they carry no AP.
    pub fn enemy(name: impl Into<String>, hp: u32, max_hp: u32) -> Self {
        Self::new(
            ActorId::ENEMY,
            name,
            ActorKind::Enemy,
            ResourceMeter::new(hp, max_hp),
            ResourceMeter::default(),
        )
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_abilities(mut self, abilities: Vec<Ability>) -> Self {
        self.abilities = abilities;
        self
    }

    pub fn hp(&self) -> ResourceMeter {
        self.hp
    }

    pub fn ap(&self) -> ResourceMeter {
        self.ap
    }

    pub fn is_alive(&self) -> bool {
        !self.hp.is_empty()
    }

    pub fn ability(&self, id: &AbilityId) -> Option<&Ability> {
        self.abilities.iter().find(|ability| &ability.id == id)
    }

    /// Applies damage, returning the HP actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.hp.drain(amount)
    }

    /// Restores HP, returning the HP actually gained.
    pub fn heal(&mut self, amount: u32) -> u32 {
        self.hp.restore(amount)
    }

    /// Overwrites HP with an externally supplied value (clamped).
    pub fn set_hp(&mut self, value: u32) {
        self.hp.set(value);
    }

    /// Spends AP if enough is available. Returns false without change otherwise.
    pub fn spend_ap(&mut self, amount: u32) -> bool {
        if self.ap.current() < amount {
            return false;
        }
        self.ap.drain(amount);
        true
    }

    pub fn restore_ap(&mut self, amount: u32) -> u32 {
        self.ap.restore(amount)
    }

    pub fn cooldown_remaining(&self, ability: &AbilityId) -> u8 {
        self.cooldowns.get(ability).copied().unwrap_or(0)
    }

    /// Puts `ability` on cooldown for its configured number of turns.
    pub fn start_cooldown(&mut self, ability: &Ability) {
        if ability.cooldown > 0 {
            self.cooldowns.insert(ability.id.clone(), ability.cooldown);
        }
    }

    /// Per-turn upkeep: status counters and cooldowns tick down by one.
    pub fn tick_counters(&mut self) {
        self.status.tick();
        self.cooldowns.retain(|_, remaining| {
            *remaining = remaining.saturating_sub(1);
            *remaining > 0
        });
    }
}
