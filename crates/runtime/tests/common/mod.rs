#![allow(dead_code)]

use std::time::Duration;

use async_trait::async_trait;
use battle_core::{
    AbilityCatalog, AbilityDefinition, AbilityId, EffectType, Element, Loadout, LoadoutSlot,
};
use battle_runtime::{
    EncounterProvider, EnemyDescriptor, Event, IdentitySnapshot, SetupError,
};
use tokio::sync::broadcast;

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// Provider with one standalone enemy, one raid boss and one player.
#[derive(Clone)]
pub struct FixtureProvider {
    pub enemy_hp: u32,
    pub raid_hp: u32,
    pub hero_hp: u32,
    pub loadout: Loadout,
}

impl Default for FixtureProvider {
    fn default() -> Self {
        Self {
            enemy_hp: 1_000,
            raid_hp: 200,
            hero_hp: 2_000,
            loadout: Loadout::new(vec![LoadoutSlot::new("strike", 1)]),
        }
    }
}

impl FixtureProvider {
    fn descriptor(id: &str, name: &str, hp: u32, max_hp: u32) -> EnemyDescriptor {
        EnemyDescriptor {
            id: id.into(),
            name: name.into(),
            level: 10,
            hp,
            max_hp,
            icon_url: None,
        }
    }
}

#[async_trait]
impl EncounterProvider for FixtureProvider {
    async fn fetch_enemy(&self, encounter_id: &str) -> Result<Option<EnemyDescriptor>, SetupError> {
        Ok((encounter_id == "boss")
            .then(|| Self::descriptor("boss", "Boss", self.enemy_hp, self.enemy_hp.max(1))))
    }

    async fn fetch_raid_boss(&self, raid_id: &str) -> Result<Option<EnemyDescriptor>, SetupError> {
        Ok((raid_id == "titan").then(|| Self::descriptor("titan", "Titan", self.raid_hp, 60_000)))
    }

    async fn fetch_loadout(&self, _user_id: &str) -> Result<Loadout, SetupError> {
        Ok(self.loadout.clone())
    }

    async fn identity(&self, user_id: &str) -> Result<IdentitySnapshot, SetupError> {
        Ok(IdentitySnapshot {
            user_id: user_id.to_owned(),
            name: Some("Hero".into()),
            level: 5,
            hp: self.hero_hp,
            max_hp: self.hero_hp,
            mp: 3,
            max_mp: 3,
        })
    }
}

/// A single 1-AP damage ability of power 50.
pub fn catalog() -> AbilityCatalog {
    AbilityCatalog::from_definitions([AbilityDefinition {
        id: AbilityId::new("strike"),
        name: "Strike Twice".into(),
        ap_cost: 1,
        base_power: 50,
        effect: EffectType::Damage,
        element: Element::Physical,
        cooldown: 0,
        description: String::new(),
    }])
}

/// Waits until `matches` accepts an event, skipping everything else.
pub async fn wait_for(
    rx: &mut broadcast::Receiver<Event>,
    matches: impl Fn(&Event) -> bool,
) -> Event {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match rx.recv().await {
                Ok(event) if matches(&event) => return event,
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => panic!("event bus closed"),
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}
