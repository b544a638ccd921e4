//! Encounter provider backed by a local content table.
use async_trait::async_trait;

use battle_content::{EncounterTable, EnemyDefinition, ProfileDefinition};
use battle_core::Loadout;

use crate::api::{EncounterProvider, EnemyDescriptor, IdentitySnapshot, SetupError};

/// Serves enemies, raid bosses and player profiles from an [`EncounterTable`].
///
/// Used for offline play and tests. Raid boss HP is the value authored in
/// content; live HP comes from the raid channel once the battle starts.
#[derive(Debug, Clone, Default)]
pub struct ContentProvider {
    table: EncounterTable,
}

impl ContentProvider {
    pub fn new(table: EncounterTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &EncounterTable {
        &self.table
    }

    fn profile(&self, user_id: &str) -> Result<&ProfileDefinition, SetupError> {
        self.table
            .profile(user_id)
            .ok_or_else(|| SetupError::ProfileNotFound(user_id.to_owned()))
    }
}

impl From<&EnemyDefinition> for EnemyDescriptor {
    fn from(definition: &EnemyDefinition) -> Self {
        Self {
            id: definition.id.clone(),
            name: definition.name.clone(),
            level: definition.level,
            hp: definition.hp,
            max_hp: definition.max_hp,
            icon_url: definition.icon_url.clone(),
        }
    }
}

#[async_trait]
impl EncounterProvider for ContentProvider {
    async fn fetch_enemy(&self, encounter_id: &str) -> Result<Option<EnemyDescriptor>, SetupError> {
        Ok(self.table.encounter(encounter_id).map(EnemyDescriptor::from))
    }

    async fn fetch_raid_boss(&self, raid_id: &str) -> Result<Option<EnemyDescriptor>, SetupError> {
        Ok(self.table.raid(raid_id).map(EnemyDescriptor::from))
    }

    async fn fetch_loadout(&self, user_id: &str) -> Result<Loadout, SetupError> {
        Ok(self.profile(user_id)?.loadout.clone())
    }

    async fn identity(&self, user_id: &str) -> Result<IdentitySnapshot, SetupError> {
        let profile = self.profile(user_id)?;
        Ok(IdentitySnapshot {
            user_id: profile.user_id.clone(),
            name: profile.name.clone(),
            level: profile.level,
            hp: profile.hp,
            max_hp: profile.max_hp,
            mp: profile.mp,
            max_mp: profile.max_mp,
        })
    }
}
