//! Asynchronous abstraction for sourcing battle setup data.
//!
//! Runtime users plug in an [`EncounterProvider`] so a battle can be opened
//! from a game backend, local content tables, or test fixtures.
use async_trait::async_trait;
use battle_core::Loadout;
use serde::{Deserialize, Serialize};

use super::errors::SetupError;

/// Enemy or raid boss as reported by the backend.
///
/// For raids `hp` is the shared, live value at fetch time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyDescriptor {
    pub id: String,
    pub name: String,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub icon_url: Option<String>,
}

/// Player stats at battle start. `mp`/`max_mp` seed the actor's AP pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentitySnapshot {
    pub user_id: String,
    pub name: Option<String>,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub mp: u32,
    pub max_mp: u32,
}

/// Trait for fetching everything a battle needs before it can start.
///
/// `Ok(None)` from an enemy fetch means the id is unknown; the runtime turns
/// it into a [`SetupError`].
#[async_trait]
pub trait EncounterProvider: Send + Sync {
    async fn fetch_enemy(&self, encounter_id: &str) -> Result<Option<EnemyDescriptor>, SetupError>;

    async fn fetch_raid_boss(&self, raid_id: &str) -> Result<Option<EnemyDescriptor>, SetupError>;

    /// The player's owned abilities (at most four are used).
    async fn fetch_loadout(&self, user_id: &str) -> Result<Loadout, SetupError>;

    async fn identity(&self, user_id: &str) -> Result<IdentitySnapshot, SetupError>;
}
