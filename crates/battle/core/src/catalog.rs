//! Ability catalog and player loadouts.
//!
//! The catalog is content (loaded by `battle-content`); the loadout is the
//! player's owned subset. [`AbilityCatalog::resolve_loadout`] turns the two
//! into the concrete ability list an actor fights with.

use std::collections::HashMap;

use crate::state::{Ability, AbilityId, EffectType, Element};

/// Catalog entry for an ability, before a rank is attached.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityDefinition {
    pub id: AbilityId,
    pub name: String,
    pub ap_cost: u32,
    pub base_power: u32,
    pub effect: EffectType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub element: Element,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
}

impl AbilityDefinition {
    pub fn instantiate(&self, rank: u8) -> Ability {
        Ability {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            ap_cost: self.ap_cost,
            base_power: self.base_power,
            effect: self.effect,
            element: self.element,
            cooldown: self.cooldown,
            rank: rank.max(1),
        }
    }
}

/// Lookup table of every ability the game knows about.
#[derive(Clone, Debug, Default)]
pub struct AbilityCatalog {
    definitions: HashMap<AbilityId, AbilityDefinition>,
}

impl AbilityCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_definitions(definitions: impl IntoIterator<Item = AbilityDefinition>) -> Self {
        let mut catalog = Self::new();
        for definition in definitions {
            catalog.insert(definition);
        }
        catalog
    }

    /// Inserts a definition, replacing any previous entry with the same id.
    pub fn insert(&mut self, definition: AbilityDefinition) {
        self.definitions.insert(definition.id.clone(), definition);
    }

    pub fn get(&self, id: &AbilityId) -> Option<&AbilityDefinition> {
        self.definitions.get(id)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Resolves a loadout into concrete abilities.
    ///
    /// Only the first [`Loadout::MAX_SLOTS`] slots are considered and slots
    /// with unknown ids are skipped. The basic attack is always present: it
    /// comes first, taken from the catalog when defined there and from
    /// [`Ability::basic_attack`] otherwise.
    pub fn resolve_loadout(&self, loadout: &Loadout) -> Vec<Ability> {
        let basic_id = AbilityId::new(Ability::BASIC_ATTACK_ID);
        let basic = self
            .get(&basic_id)
            .map(|definition| definition.instantiate(1))
            .unwrap_or_else(Ability::basic_attack);

        let mut abilities = vec![basic];
        for slot in loadout.slots.iter().take(Loadout::MAX_SLOTS) {
            if slot.ability == basic_id || abilities.iter().any(|a| a.id == slot.ability) {
                continue;
            }
            if let Some(definition) = self.get(&slot.ability) {
                abilities.push(definition.instantiate(slot.rank));
            }
        }
        abilities
    }

    /// Loadout slot ids that have no catalog entry.
    pub fn missing(&self, loadout: &Loadout) -> Vec<AbilityId> {
        loadout
            .slots
            .iter()
            .take(Loadout::MAX_SLOTS)
            .filter(|slot| slot.ability.as_str() != Ability::BASIC_ATTACK_ID)
            .filter(|slot| self.get(&slot.ability).is_none())
            .map(|slot| slot.ability.clone())
            .collect()
    }
}

/// One owned ability with its upgrade rank.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadoutSlot {
    pub ability: AbilityId,
    #[cfg_attr(feature = "serde", serde(default = "LoadoutSlot::default_rank"))]
    pub rank: u8,
}

impl LoadoutSlot {
    pub fn new(ability: impl Into<AbilityId>, rank: u8) -> Self {
        Self {
            ability: ability.into(),
            rank,
        }
    }

    #[cfg(feature = "serde")]
    fn default_rank() -> u8 {
        1
    }
}

/// The abilities a player brings into battle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Loadout {
    pub slots: Vec<LoadoutSlot>,
}

impl Loadout {
    pub const MAX_SLOTS: usize = 4;

    pub fn new(slots: Vec<LoadoutSlot>) -> Self {
        Self { slots }
    }
}
