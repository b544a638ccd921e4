//! Encounter table loader.
//!
//! One RON file lists the standalone encounters, the raid bosses and the local
//! player profiles (stats plus loadout) available to offline runs.

use std::collections::HashSet;
use std::path::Path;

use battle_core::Loadout;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// An enemy as authored in content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyDefinition {
    pub id: String,
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
    #[serde(default)]
    pub icon_url: Option<String>,
}

/// Player stats and loadout. `mp` is the pool that becomes AP in battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDefinition {
    pub user_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_level")]
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub mp: u32,
    pub max_mp: u32,
    #[serde(default)]
    pub loadout: Loadout,
}

fn default_level() -> u32 {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterTable {
    #[serde(default)]
    pub encounters: Vec<EnemyDefinition>,
    #[serde(default)]
    pub raids: Vec<EnemyDefinition>,
    #[serde(default)]
    pub profiles: Vec<ProfileDefinition>,
}

impl EncounterTable {
    pub fn encounter(&self, id: &str) -> Option<&EnemyDefinition> {
        self.encounters.iter().find(|enemy| enemy.id == id)
    }

    pub fn raid(&self, id: &str) -> Option<&EnemyDefinition> {
        self.raids.iter().find(|enemy| enemy.id == id)
    }

    pub fn profile(&self, user_id: &str) -> Option<&ProfileDefinition> {
        self.profiles.iter().find(|profile| profile.user_id == user_id)
    }
}

/// Loader for encounter tables from RON files.
pub struct EncounterLoader;

impl EncounterLoader {
    pub fn load(path: &Path) -> LoadResult<EncounterTable> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<EncounterTable> {
        let table: EncounterTable = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse encounter table RON: {}", e))?;
        Self::validate(&table)?;
        Ok(table)
    }

    fn validate(table: &EncounterTable) -> LoadResult<()> {
        let mut ids = HashSet::new();
        for enemy in table.encounters.iter().chain(&table.raids) {
            anyhow::ensure!(
                ids.insert(enemy.id.as_str()),
                "Duplicate enemy id '{}'",
                enemy.id
            );
            anyhow::ensure!(enemy.max_hp > 0, "Enemy '{}' has no max HP", enemy.id);
            anyhow::ensure!(
                enemy.hp <= enemy.max_hp,
                "Enemy '{}' starts above max HP ({} > {})",
                enemy.id,
                enemy.hp,
                enemy.max_hp
            );
        }

        let mut users = HashSet::new();
        for profile in &table.profiles {
            anyhow::ensure!(
                users.insert(profile.user_id.as_str()),
                "Duplicate profile '{}'",
                profile.user_id
            );
            anyhow::ensure!(
                profile.hp <= profile.max_hp && profile.mp <= profile.max_mp,
                "Profile '{}' has resources above their maximum",
                profile.user_id
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_by_id() {
        let table = EncounterLoader::parse(
            r#"(
                encounters: [(id: "rat", name: "Rat", hp: 50, max_hp: 50)],
                raids: [(id: "wyrm", name: "Wyrm", level: 40, hp: 9000, max_hp: 10000,
                         icon_url: Some("icons/wyrm.png"))],
                profiles: [(user_id: "u1", hp: 100, max_hp: 100, mp: 2, max_mp: 4)],
            )"#,
        )
        .unwrap();

        assert_eq!(table.encounter("rat").map(|e| e.level), Some(1));
        assert_eq!(table.raid("wyrm").and_then(|e| e.icon_url.as_deref()), Some("icons/wyrm.png"));
        assert!(table.encounter("wyrm").is_none());
        let profile = table.profile("u1").unwrap();
        assert!(profile.loadout.slots.is_empty());
        assert!(profile.name.is_none());
    }

    #[test]
    fn rejects_enemy_above_max_hp() {
        let err = EncounterLoader::parse(
            r#"(encounters: [(id: "rat", name: "Rat", hp: 60, max_hp: 50)])"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("starts above max HP"));
    }

    #[test]
    fn ids_are_unique_across_encounters_and_raids() {
        let err = EncounterLoader::parse(
            r#"(
                encounters: [(id: "boss", name: "A", hp: 1, max_hp: 1)],
                raids: [(id: "boss", name: "B", hp: 1, max_hp: 1)],
            )"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Duplicate enemy id 'boss'"));
    }
}
