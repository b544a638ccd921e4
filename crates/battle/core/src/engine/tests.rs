use std::time::Duration;

use super::*;
use crate::reaction::{ReactionChallenge, Sigil, SigilChallenge};
use crate::state::{Ability, EffectType, Element};

use crate::turn::TurnTag::{Enemy, Player};

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn ability(id: &str, effect: EffectType, power: u32) -> Ability {
    Ability {
        id: AbilityId::new(id),
        name: id.to_owned(),
        description: String::new(),
        ap_cost: 1,
        base_power: power,
        effect,
        element: Element::Physical,
        cooldown: 0,
        rank: 1,
    }
}

fn hero(max_hp: u32) -> Actor {
    Actor::player(ActorId::PLAYER, "Hero", max_hp, 3).with_abilities(vec![
        ability("strike", EffectType::Damage, 50),
        ability("rally", EffectType::Buff, 0),
        ability("mend", EffectType::Heal, 40),
    ])
}

struct Fixture {
    order: Vec<TurnTag>,
    mode: BattleMode,
    hero_hp: u32,
    enemy: Actor,
    config: BattleConfig,
}

impl Fixture {
    fn new(order: Vec<TurnTag>) -> Self {
        Self {
            order,
            mode: BattleMode::Standalone,
            hero_hp: 2_000,
            enemy: Actor::enemy("Boss", 1_000, 1_000),
            config: BattleConfig::default(),
        }
    }

    fn raid(mut self) -> Self {
        self.mode = BattleMode::Raid;
        self
    }

    fn hero_hp(mut self, hp: u32) -> Self {
        self.hero_hp = hp;
        self
    }

    fn enemy(mut self, hp: u32, max_hp: u32) -> Self {
        self.enemy = Actor::enemy("Boss", hp, max_hp);
        self
    }

    fn config(mut self, config: BattleConfig) -> Self {
        self.config = config;
        self
    }

    fn start(self) -> BattleSession {
        let setup = SessionSetup {
            party: vec![hero(self.hero_hp)],
            enemy: self.enemy,
            enemy_info: EnemyInfo {
                id: "boss".into(),
                name: "Boss".into(),
                icon_url: None,
            },
            mode: self.mode,
            seed: 42,
            turn_order: Some(self.order),
        };
        BattleSession::new(setup, self.config).unwrap()
    }
}

fn plan(session: &mut BattleSession, ability: &str, times: usize) {
    let id = AbilityId::new(ability);
    for _ in 0..times {
        session.select(ActorId::PLAYER, &id).unwrap();
        session.select(ActorId::PLAYER, &id).unwrap();
    }
}

fn hero_of(session: &BattleSession) -> &Actor {
    &session.party()[0]
}

fn force_sigil(session: &mut BattleSession, target: Sigil) {
    let challenge = SigilChallenge::new(target, session.config());
    session.reaction = Some(ReactionMinigame::from_challenge(ReactionChallenge::Sigil(
        challenge,
    )));
}

#[test]
fn opens_in_active_at_index_zero() {
    let session = Fixture::new(vec![Player; 4]).start();
    assert_eq!(session.phase(), Phase::Active);
    assert_eq!(session.stage(), Stage::Planning);
    assert_eq!(session.queue().index(), 0);
    assert_eq!(hero_of(&session).ap().current(), 3);
}

#[test]
fn party_without_living_members_is_rejected() {
    let mut fallen = hero(100);
    fallen.take_damage(100);
    let setup = SessionSetup {
        party: vec![fallen],
        enemy: Actor::enemy("Boss", 100, 100),
        enemy_info: EnemyInfo::default(),
        mode: BattleMode::Standalone,
        seed: 1,
        turn_order: None,
    };
    let err = BattleSession::new(setup, BattleConfig::default()).err();
    assert_eq!(err, Some(SessionError::EmptyParty));
}

#[test]
fn same_seed_yields_same_turn_order() {
    let build = || {
        let setup = SessionSetup {
            party: vec![hero(100)],
            enemy: Actor::enemy("Boss", 100, 100),
            enemy_info: EnemyInfo::default(),
            mode: BattleMode::Standalone,
            seed: 7,
            turn_order: None,
        };
        BattleSession::new(setup, BattleConfig::default()).unwrap()
    };
    assert_eq!(build().queue().entries(), build().queue().entries());
    assert_eq!(build().queue().entries().len(), 50);
}

#[test]
fn charged_two_strike_chain_leaves_738() {
    let mut session = Fixture::new(vec![Player; 4]).start();
    session.advance_to(ms(1_250)).unwrap();
    assert_eq!(session.charge_level(), 2.0);

    plan(&mut session, "strike", 2);
    let outcome = session.commit().unwrap();

    assert_eq!(outcome.total_damage, 262);
    assert_eq!(session.enemy().hp().current(), 738);
    assert_eq!(session.stage(), Stage::Resolving);
    assert_eq!(session.phase(), Phase::Active);
    assert_eq!(session.planner().chain_count(), 0);
}

#[test]
fn second_commit_while_resolving_is_ignored() {
    let mut session = Fixture::new(vec![Player; 4]).start();
    session.advance_to(ms(1_250)).unwrap();
    plan(&mut session, "strike", 2);
    session.commit().unwrap();

    let err = session.commit().unwrap_err();
    assert!(err.is_rejection());
    assert_eq!(session.enemy().hp().current(), 738);

    session.advance_to(ms(1_550)).unwrap();
    assert_eq!(session.queue().index(), 1);
    assert_eq!(session.stage(), Stage::Planning);
    // 3 - 2 spent + 1 regenerated
    assert_eq!(hero_of(&session).ap().current(), 2);
    assert_eq!(session.charge_level(), 1.0);

    session.advance_to(ms(5_000)).unwrap();
    assert_eq!(session.queue().index(), 1);
}

#[test]
fn empty_commit_passes_the_turn() {
    let mut session = Fixture::new(vec![Player; 4]).start();
    let outcome = session.commit().unwrap();
    assert_eq!(outcome.total_damage, 0);
    assert!(outcome.actions.is_empty());

    session.advance_to(ms(300)).unwrap();
    assert_eq!(session.queue().index(), 1);
    assert_eq!(session.enemy().hp().current(), 1_000);
}

#[test]
fn zero_settle_advances_immediately() {
    let config = BattleConfig {
        commit_settle_ms: 0,
        ..BattleConfig::default()
    };
    let mut session = Fixture::new(vec![Player; 4]).config(config).start();
    plan(&mut session, "strike", 1);
    session.commit().unwrap();
    assert_eq!(session.stage(), Stage::Planning);
    assert_eq!(session.queue().index(), 1);
}

#[test]
fn undo_restores_ap_and_chain() {
    let mut session = Fixture::new(vec![Player; 4]).start();
    plan(&mut session, "strike", 1);
    assert_eq!(hero_of(&session).ap().current(), 2);
    session.drain_events();

    session.undo_last().unwrap();
    assert_eq!(hero_of(&session).ap().current(), 3);
    assert_eq!(session.planner().chain_count(), 0);
    assert_eq!(
        session.drain_events(),
        vec![SessionEvent::PlanUndone {
            actor: ActorId::PLAYER,
            ability: AbilityId::new("strike"),
            chain: 0,
        }]
    );
    assert!(session.undo_last().unwrap_err().is_rejection());
}

#[test]
fn entry_actions_regenerate_and_tick_counters() {
    let mut session = Fixture::new(vec![Player; 4]).start();
    plan(&mut session, "rally", 1);
    session.commit().unwrap();
    assert_eq!(hero_of(&session).status.attack_buff, 2);
    assert_eq!(hero_of(&session).ap().current(), 2);

    session.advance_to(ms(300)).unwrap();
    assert_eq!(hero_of(&session).status.attack_buff, 1);
    assert_eq!(hero_of(&session).ap().current(), 3);
    assert!(session.planner().armed().is_none());
}

#[test]
fn defense_stance_ignores_charge() {
    let mut session = Fixture::new(vec![Player; 4]).start();
    assert_eq!(session.toggle_stance().unwrap(), Stance::Defense);
    session.advance_to(ms(2_000)).unwrap();
    plan(&mut session, "strike", 1);
    let outcome = session.commit().unwrap();
    assert_eq!(outcome.total_damage, 30);
    assert!(session.toggle_stance().unwrap_err().is_rejection());
}

#[test]
fn charge_keeps_building_in_defense_stance() {
    let mut session = Fixture::new(vec![Player; 4]).start();
    session.toggle_stance().unwrap();
    session.advance_to(ms(1_250)).unwrap();
    assert_eq!(session.charge_level(), 2.0);

    assert_eq!(session.toggle_stance().unwrap(), Stance::Attack);
    plan(&mut session, "strike", 1);
    assert_eq!(session.commit().unwrap().total_damage, 125);
}

#[test]
fn lethal_commit_wins_standalone() {
    let mut session = Fixture::new(vec![Player; 4]).enemy(30, 30).start();
    plan(&mut session, "strike", 1);
    session.commit().unwrap();

    assert_eq!(session.phase(), Phase::Victory);
    assert!(session.drain_events().contains(&SessionEvent::BattleEnded {
        phase: Phase::Victory
    }));
    assert!(session.select(ActorId::PLAYER, &"strike".into()).is_err());
    assert!(session.next_deadline().is_none());
}

#[test]
fn enemy_turn_runs_windup_strike_and_advance() {
    let mut session = Fixture::new(vec![Enemy, Player, Player]).start();
    assert_eq!(session.phase(), Phase::EnemyWindup);
    assert_eq!(session.strike_target(), Some(ActorId::PLAYER));
    assert!(session.commit().unwrap_err().is_rejection());

    session.advance_to(ms(1_499)).unwrap();
    assert_eq!(session.phase(), Phase::EnemyWindup);
    session.advance_to(ms(1_500)).unwrap();
    assert_eq!(session.phase(), Phase::EnemyStrike);
    assert!(session.reaction().is_some());

    // No input: every challenge mode fails once its progress runs out.
    session.advance_to(ms(10_000)).unwrap();
    assert_eq!(hero_of(&session).hp().current(), 1_200);
    let snapshot = session.snapshot();
    assert!(snapshot.flash.fail && snapshot.flash.shake);
    assert_eq!(session.phase(), Phase::EnemyStrike);

    session.drain_events();
    session.advance_to(ms(11_800)).unwrap();
    assert_eq!(session.phase(), Phase::Active);
    assert_eq!(session.queue().index(), 1);
    assert_eq!(session.strike_target(), None);
    assert_eq!(session.snapshot().flash, FlashSignals::default());
    assert_eq!(
        session.drain_events()[0],
        SessionEvent::PhaseChanged {
            from: Phase::EnemyStrike,
            to: Phase::Active,
        }
    );
}

#[test]
fn matched_sigil_negates_the_strike() {
    let mut session = Fixture::new(vec![Enemy, Player, Player]).start();
    session.advance_to(ms(1_500)).unwrap();
    force_sigil(&mut session, Sigil::Flame);

    session.advance_to(ms(1_700)).unwrap();
    assert_eq!(session.submit_parry_input(ParryInput::Sigil(Sigil::Flame)), Ok(None));

    session.advance_to(ms(2_100)).unwrap();
    let verdict = session
        .submit_parry_input(ParryInput::Sigil(Sigil::Flame))
        .unwrap();
    assert_eq!(verdict, Some(Verdict::Parried));
    assert_eq!(hero_of(&session).hp().current(), 2_000);

    let snapshot = session.snapshot();
    assert!(snapshot.flash.success);
    assert_eq!(snapshot.parry.and_then(|p| p.verdict), Some(Verdict::Parried));
    assert_eq!(session.next_deadline(), Some(ms(3_900)));
}

#[test]
fn wrong_sigil_deals_flat_damage() {
    let mut session = Fixture::new(vec![Enemy, Player]).start();
    session.advance_to(ms(1_500)).unwrap();
    force_sigil(&mut session, Sigil::Frost);
    session.advance_to(ms(2_000)).unwrap();

    let verdict = session
        .submit_parry_input(ParryInput::Sigil(Sigil::Storm))
        .unwrap();
    assert_eq!(verdict, Some(Verdict::Mismatch));
    assert_eq!(hero_of(&session).hp().current(), 1_200);
}

#[test]
fn parry_outside_strike_is_rejected() {
    let mut session = Fixture::new(vec![Player; 2]).start();
    let err = session
        .submit_parry_input(ParryInput::Release)
        .unwrap_err();
    assert_eq!(
        err,
        SessionError::NotAccepting {
            command: "parry",
            stage: Stage::Planning,
        }
    );
}

#[test]
fn fallen_party_is_defeated() {
    let mut session = Fixture::new(vec![Enemy, Player]).hero_hp(500).start();
    assert!(session.acknowledge().is_err());

    session.advance_to(ms(10_000)).unwrap();
    assert_eq!(session.phase(), Phase::Defeat);
    assert!(session.drain_events().contains(&SessionEvent::BattleEnded {
        phase: Phase::Defeat
    }));

    session.advance_to(ms(20_000)).unwrap();
    assert_eq!(session.phase(), Phase::Defeat);
    assert_eq!(session.queue().index(), 0);

    session.acknowledge().unwrap();
    assert!(session.is_finished());
}

#[test]
fn raid_kill_waits_for_the_ledger() {
    let mut session = Fixture::new(vec![Player; 4]).raid().enemy(30, 1_000).start();
    plan(&mut session, "strike", 1);
    session.commit().unwrap();

    assert_eq!(session.stage(), Stage::AwaitingConfirmation);
    assert_eq!(session.phase(), Phase::Active);
    assert!(session.snapshot().victory_provisional);
    assert!(session.commit().unwrap_err().is_rejection());

    session.apply_authoritative_hp(0).unwrap();
    assert_eq!(session.phase(), Phase::Victory);
}

#[test]
fn raid_push_above_zero_resumes() {
    let mut session = Fixture::new(vec![Player; 4]).raid().enemy(30, 1_000).start();
    plan(&mut session, "strike", 1);
    session.commit().unwrap();
    session.drain_events();

    session.apply_authoritative_hp(400).unwrap();
    assert_eq!(session.stage(), Stage::Planning);
    assert_eq!(session.enemy().hp().current(), 400);
    assert_eq!(session.queue().index(), 1);
    assert!(session.drain_events().contains(&SessionEvent::EnemyHpCorrected {
        local: 0,
        authoritative: 400,
    }));
}

#[test]
fn raid_confirmation_times_out() {
    let mut session = Fixture::new(vec![Player; 4]).raid().enemy(30, 1_000).start();
    plan(&mut session, "strike", 1);
    session.commit().unwrap();

    session.advance_to(ms(4_999)).unwrap();
    assert_eq!(session.stage(), Stage::AwaitingConfirmation);
    session.advance_to(ms(5_000)).unwrap();
    assert_eq!(session.stage(), Stage::Planning);
    assert_eq!(session.queue().index(), 1);
    assert_eq!(session.enemy().hp().current(), 30);
    assert!(!session.snapshot().victory_provisional);

    let pass = session.commit().unwrap();
    assert!(pass.actions.is_empty());
    assert!(!pass.enemy_defeated());
    assert_eq!(session.stage(), Stage::Resolving);
}

#[test]
fn optimistic_raid_wins_locally() {
    let config = BattleConfig {
        victory_policy: VictoryPolicy::Optimistic,
        ..BattleConfig::default()
    };
    let mut session = Fixture::new(vec![Player; 4])
        .raid()
        .enemy(30, 1_000)
        .config(config)
        .start();
    plan(&mut session, "strike", 1);
    session.commit().unwrap();
    assert_eq!(session.phase(), Phase::Victory);

    // Terminal sessions ignore late pushes.
    session.apply_authoritative_hp(500).unwrap();
    assert_eq!(session.enemy().hp().current(), 0);
}

#[test]
fn raid_push_corrects_hp_during_planning() {
    let mut session = Fixture::new(vec![Player; 4]).raid().start();
    session.apply_authoritative_hp(600).unwrap();
    assert_eq!(session.enemy().hp().current(), 600);
    assert_eq!(session.stage(), Stage::Planning);

    session.apply_authoritative_hp(0).unwrap();
    assert_eq!(session.phase(), Phase::Victory);
}

#[test]
fn kill_during_enemy_turn_wins_when_the_strike_resolves() {
    let mut session = Fixture::new(vec![Enemy, Player, Player]).raid().start();
    session.apply_authoritative_hp(0).unwrap();
    assert_eq!(session.phase(), Phase::EnemyWindup);

    session.advance_to(ms(10_000)).unwrap();
    assert_eq!(session.phase(), Phase::Victory);
    assert_eq!(session.queue().index(), 0);
}

#[test]
fn confirmed_kill_outranks_a_lethal_strike() {
    let mut session = Fixture::new(vec![Enemy, Player]).raid().hero_hp(500).start();
    session.apply_authoritative_hp(0).unwrap();
    session.advance_to(ms(1_500)).unwrap();
    force_sigil(&mut session, Sigil::Frost);
    session.advance_to(ms(2_000)).unwrap();
    session.drain_events();

    let verdict = session
        .submit_parry_input(ParryInput::Sigil(Sigil::Storm))
        .unwrap();
    assert_eq!(verdict, Some(Verdict::Mismatch));
    assert_eq!(hero_of(&session).hp().current(), 0);
    assert_eq!(session.phase(), Phase::Victory);
    assert!(session.drain_events().contains(&SessionEvent::BattleEnded {
        phase: Phase::Victory
    }));
}

#[test]
fn kill_after_the_strike_resolved_wins_immediately() {
    let mut session = Fixture::new(vec![Enemy, Player]).raid().start();
    session.advance_to(ms(1_500)).unwrap();
    force_sigil(&mut session, Sigil::Frost);
    session.advance_to(ms(2_000)).unwrap();
    session
        .submit_parry_input(ParryInput::Sigil(Sigil::Storm))
        .unwrap();
    assert_eq!(session.phase(), Phase::EnemyStrike);

    session.apply_authoritative_hp(0).unwrap();
    assert_eq!(session.phase(), Phase::Victory);
}

#[test]
fn standalone_rejects_authoritative_hp() {
    let mut session = Fixture::new(vec![Player; 2]).start();
    assert_eq!(session.apply_authoritative_hp(0), Err(SessionError::NotRaid));
    assert_eq!(session.enemy().hp().current(), 1_000);
}

#[test]
fn snapshot_reflects_plan_and_log() {
    let mut session = Fixture::new(vec![Player; 4]).start();
    session.select(ActorId::PLAYER, &"strike".into()).unwrap();
    let armed = session.snapshot();
    assert_eq!(armed.armed.map(|s| s.ability), Some(AbilityId::new("strike")));
    assert_eq!(armed.chain, 0);

    session.select(ActorId::PLAYER, &"strike".into()).unwrap();
    session.commit().unwrap();
    let snapshot = session.snapshot();
    assert_eq!(snapshot.log.len(), 2);
    assert_eq!(snapshot.log[1], "Hero uses strike for 62 damage.");
    assert_eq!(snapshot.current_turn(), Some(Player));
    assert!(snapshot.revision > armed.revision);
}

#[cfg(feature = "serde")]
#[test]
fn snapshot_serializes_for_the_ui() {
    let mut session = Fixture::new(vec![Enemy, Player]).start();
    session.advance_to(ms(1_600)).unwrap();
    let json = serde_json::to_value(session.snapshot()).unwrap();
    assert_eq!(json["phase"], "EnemyStrike");
    assert_eq!(json["enemy_info"]["id"], "boss");
    assert!(json["parry"].is_object());
}
