//! Battle setup failures and loadout resolution.
mod common;

use std::sync::Arc;

use battle_core::{Ability, Loadout};
use battle_runtime::{
    BattleRuntime, ContentProvider, Encounter, LocalRaidLedger, ManualClock, RuntimeError,
    SetupError,
};
use battle_content::loaders::embedded;
use common::FixtureProvider;

#[tokio::test]
async fn unknown_encounter_fails_setup() {
    let err = BattleRuntime::builder()
        .provider(FixtureProvider::default())
        .encounter(Encounter::standalone("dragon"))
        .build()
        .await
        .err()
        .expect("setup should fail");

    assert!(matches!(
        err,
        RuntimeError::Setup(SetupError::EnemyNotFound(ref id)) if id == "dragon"
    ));
}

#[tokio::test]
async fn unknown_raid_fails_setup() {
    let err = BattleRuntime::builder()
        .provider(FixtureProvider::default())
        .raid_channel(Arc::new(LocalRaidLedger::new()))
        .encounter(Encounter::raid("ghost"))
        .build()
        .await
        .err()
        .expect("setup should fail");

    assert!(matches!(
        err,
        RuntimeError::Setup(SetupError::RaidNotFound(_))
    ));
}

#[tokio::test]
async fn raid_needs_a_channel_and_builder_needs_inputs() {
    let err = BattleRuntime::builder()
        .provider(FixtureProvider::default())
        .encounter(Encounter::raid("titan"))
        .build()
        .await
        .err()
        .expect("missing channel");
    assert!(matches!(err, RuntimeError::MissingRaidChannel));

    let err = BattleRuntime::builder()
        .encounter(Encounter::standalone("boss"))
        .build()
        .await
        .err()
        .expect("missing provider");
    assert!(matches!(err, RuntimeError::MissingProvider));

    let err = BattleRuntime::builder()
        .provider(FixtureProvider::default())
        .build()
        .await
        .err()
        .expect("missing encounter");
    assert!(matches!(err, RuntimeError::MissingEncounter));
}

#[tokio::test]
async fn empty_loadout_still_has_the_basic_attack() {
    let provider = FixtureProvider {
        loadout: Loadout::default(),
        ..FixtureProvider::default()
    };
    let runtime = BattleRuntime::builder()
        .provider(provider)
        .clock(ManualClock::new())
        .encounter(Encounter::standalone("boss"))
        .build()
        .await
        .expect("runtime should start");

    let snapshot = runtime.handle().snapshot().await.expect("snapshot");
    let abilities = &snapshot.party[0].abilities;
    assert_eq!(abilities.len(), 1);
    assert_eq!(abilities[0].id.as_str(), Ability::BASIC_ATTACK_ID);

    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn embedded_content_opens_a_battle() {
    let catalog = embedded::ability_catalog().expect("catalog");
    let table = embedded::encounter_table().expect("encounters");

    let runtime = BattleRuntime::builder()
        .provider(ContentProvider::new(table))
        .catalog(catalog)
        .clock(ManualClock::new())
        .encounter(Encounter::standalone("slime_glade"))
        .build()
        .await
        .expect("runtime should start");

    let snapshot = runtime.handle().snapshot().await.expect("snapshot");
    assert_eq!(snapshot.enemy_info.id, "slime_glade");
    assert_eq!(snapshot.party[0].name, "Wanderer");
    let ids: Vec<&str> = snapshot.party[0]
        .abilities
        .iter()
        .map(|ability| ability.id.as_str())
        .collect();
    assert_eq!(
        ids,
        vec![Ability::BASIC_ATTACK_ID, "fireball", "war_cry", "expose", "mend"]
    );

    runtime.shutdown().await.expect("shutdown");
}
