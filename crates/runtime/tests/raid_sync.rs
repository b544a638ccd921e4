//! Raid battles against the in-process ledger.
mod common;

use std::sync::Arc;

use battle_core::{ActorId, Phase, SessionEvent, TurnTag};
use battle_runtime::{
    BattleHandle, BattleRuntime, Encounter, Event, LocalRaidLedger, ManualClock, RaidEvent,
    RuntimeConfig, Topic,
};
use common::{FixtureProvider, catalog, ms, wait_for};

use TurnTag::Player;

async fn start_raid(ledger: &Arc<LocalRaidLedger>, clock: &ManualClock) -> BattleRuntime {
    ledger.open_raid("titan", 200).await;
    BattleRuntime::builder()
        .config(RuntimeConfig::default().with_seed(11))
        .provider(FixtureProvider::default())
        .raid_channel(ledger.clone())
        .catalog(catalog())
        .clock(clock.clone())
        .user_id("alice")
        .encounter(Encounter::raid("titan"))
        .turn_order(vec![Player, Player, Player])
        .build()
        .await
        .expect("raid runtime should start")
}

/// Charges fully and chains two strikes: 125 + 137 kills a 200 HP boss.
async fn lethal_batch(handle: &BattleHandle, clock: &ManualClock) {
    clock.advance(ms(1_250));
    for _ in 0..2 {
        handle.select(ActorId::PLAYER, "strike").await.expect("arm");
        handle.select(ActorId::PLAYER, "strike").await.expect("plan");
    }
    let outcome = handle.commit().await.expect("commit");
    assert_eq!(outcome.total_damage, 200);
}

#[tokio::test]
async fn local_kill_waits_for_ledger_confirmation() {
    let ledger = Arc::new(LocalRaidLedger::new());
    let clock = ManualClock::new();
    let runtime = start_raid(&ledger, &clock).await;
    let handle = runtime.handle();
    let mut phases = handle.subscribe(Topic::Phase);

    lethal_batch(&handle, &clock).await;

    // The report drains the shared HP; the push back confirms the kill.
    wait_for(&mut phases, |event| {
        matches!(
            event,
            Event::Session(SessionEvent::BattleEnded {
                phase: Phase::Victory
            })
        )
    })
    .await;

    let reports = ledger.reports().await;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].user_id, "alice");
    assert_eq!(reports[0].amount, 200);
    assert_eq!(ledger.hp("titan").await, Some(0));

    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn failed_report_is_not_fatal_and_confirmation_times_out() {
    let ledger = Arc::new(LocalRaidLedger::new());
    ledger.fail_reports(true);
    let clock = ManualClock::new();
    let runtime = start_raid(&ledger, &clock).await;
    let handle = runtime.handle();
    let mut raid_events = handle.subscribe(Topic::Raid);

    lethal_batch(&handle, &clock).await;

    let failed = wait_for(&mut raid_events, |event| {
        matches!(event, Event::Raid(RaidEvent::ReportFailed { .. }))
    })
    .await;
    assert!(matches!(
        failed,
        Event::Raid(RaidEvent::ReportFailed { amount: 200, .. })
    ));

    let snapshot = handle.snapshot().await.expect("snapshot");
    assert!(snapshot.victory_provisional);
    assert_eq!(snapshot.phase, Phase::Active);
    assert_eq!(snapshot.enemy.hp().current(), 0);

    clock.advance(ms(5_000));
    let snapshot = handle.snapshot().await.expect("snapshot");
    assert!(!snapshot.victory_provisional);
    assert_eq!(snapshot.phase, Phase::Active);
    assert_eq!(snapshot.turn_index, 1);
    assert_eq!(snapshot.enemy.hp().current(), 200);
    assert_eq!(ledger.hp("titan").await, Some(200));

    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn ledger_push_corrects_local_hp() {
    let ledger = Arc::new(LocalRaidLedger::new());
    let clock = ManualClock::new();
    let runtime = start_raid(&ledger, &clock).await;
    let handle = runtime.handle();
    let mut raid_events = handle.subscribe(Topic::Raid);

    ledger.set_hp("titan", 150).await.expect("set hp");

    let corrected = wait_for(&mut raid_events, |event| {
        matches!(
            event,
            Event::Session(SessionEvent::EnemyHpCorrected { .. })
        )
    })
    .await;
    assert!(matches!(
        corrected,
        Event::Session(SessionEvent::EnemyHpCorrected {
            local: 200,
            authoritative: 150
        })
    ));
    assert_eq!(
        handle.snapshot().await.expect("snapshot").enemy.hp().current(),
        150
    );

    runtime.shutdown().await.expect("shutdown");
}
