//! Content compiled into the binary from the crate's `data/` directory.

use battle_core::{AbilityCatalog, BattleConfig};

use crate::loaders::{
    AbilityCatalogLoader, ConfigLoader, EncounterLoader, EncounterTable, LoadResult,
};

pub const ABILITIES_RON: &str = include_str!("../../data/abilities.ron");
pub const ENCOUNTERS_RON: &str = include_str!("../../data/encounters.ron");
pub const BATTLE_TOML: &str = include_str!("../../data/battle.toml");

pub fn ability_catalog() -> LoadResult<AbilityCatalog> {
    AbilityCatalogLoader::parse(ABILITIES_RON)
}

pub fn encounter_table() -> LoadResult<EncounterTable> {
    EncounterLoader::parse(ENCOUNTERS_RON)
}

pub fn battle_config() -> LoadResult<BattleConfig> {
    ConfigLoader::parse(BATTLE_TOML)
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{Ability, AbilityId};

    #[test]
    fn shipped_config_matches_defaults() {
        assert_eq!(battle_config().unwrap(), BattleConfig::default());
    }

    #[test]
    fn shipped_profiles_resolve_against_catalog() {
        let catalog = ability_catalog().unwrap();
        let table = encounter_table().unwrap();
        assert!(catalog.get(&AbilityId::new(Ability::BASIC_ATTACK_ID)).is_some());

        for profile in &table.profiles {
            assert!(
                catalog.missing(&profile.loadout).is_empty(),
                "profile {} references unknown abilities",
                profile.user_id
            );
            let abilities = catalog.resolve_loadout(&profile.loadout);
            assert!(abilities[0].is_basic_attack());
        }
        assert!(!table.encounters.is_empty());
        assert!(!table.raids.is_empty());
    }
}
