//! Battle session state machine.
//!
//! [`BattleSession`] composes the turn queue, planner, resolver and reaction
//! minigame into the phase automaton
//!
//! ```text
//! Active ──enemy turn──▶ EnemyWindup ──telegraph──▶ EnemyStrike ──▶ Active
//!   │                                                   │
//!   └──enemy HP 0──▶ Victory ◀──raid kill confirmed─────┤
//!                                                       └──party down──▶ Defeat
//! ```
//!
//! The session never reads a clock. Its owner passes the current time to
//! [`BattleSession::advance_to`], which steps continuous state (charge ramp,
//! reaction progress) and fires scheduled transitions in order. Commands are
//! validated against the current [`Stage`]; a rejected command leaves the
//! session untouched.

mod errors;
mod events;
mod log;
mod snapshot;
mod stage;
mod timer;

pub use errors::SessionError;
pub use events::SessionEvent;
pub use log::BattleLog;
pub use snapshot::{BattleSnapshot, EnemyInfo, FlashSignals};
pub use stage::Stage;
pub use timer::{PendingTransition, TransitionKind, TransitionTimer};

use std::time::Duration;

use crate::combat::{BatchOutcome, EffectOutcome, ResolveContext, apply_strike, resolve_batch};
use crate::config::{BattleConfig, VictoryPolicy};
use crate::planner::{AbilityPlanner, SelectOutcome};
use crate::ramp::ChargeRamp;
use crate::reaction::{ParryInput, ReactionMinigame, Verdict};
use crate::rng::{BattleRng, PcgRng};
use crate::state::{AbilityId, Actor, ActorId, Phase, Stance};
use crate::turn::{TurnQueue, TurnTag};

/// Whether the enemy is private to this session or a shared raid boss.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleMode {
    #[default]
    Standalone,
    Raid,
}

/// Everything needed to open a session.
#[derive(Clone, Debug)]
pub struct SessionSetup {
    pub party: Vec<Actor>,
    pub enemy: Actor,
    pub enemy_info: EnemyInfo,
    pub mode: BattleMode,
    pub seed: u64,
    /// Fixed opening turn order. Generated from `seed` when `None`.
    pub turn_order: Option<Vec<TurnTag>>,
}

pub struct BattleSession {
    config: BattleConfig,
    mode: BattleMode,
    rng: PcgRng,
    party: Vec<Actor>,
    enemy: Actor,
    enemy_info: EnemyInfo,
    queue: TurnQueue,
    planner: AbilityPlanner,
    stance: Stance,
    ramp: ChargeRamp,
    stage: Stage,
    strike_target: Option<ActorId>,
    reaction: Option<ReactionMinigame>,
    flash: FlashSignals,
    timer: TransitionTimer,
    now: Duration,
    log: BattleLog,
    events: Vec<SessionEvent>,
    revision: u64,
    finished: bool,
    /// An authoritative kill arrived while the enemy was mid-turn.
    kill_confirmed: bool,
    /// Enemy HP before the batch that provisionally killed it.
    provisional_hp: Option<u32>,
}

impl BattleSession {
    /// Opens a session in `Active` at queue index 0.
    ///
    /// No entry actions run on creation; the party starts with the AP it was
    /// built with. If the first turn belongs to the enemy the session goes
    /// straight into the windup.
    pub fn new(setup: SessionSetup, config: BattleConfig) -> Result<Self, SessionError> {
        if !setup.party.iter().any(Actor::is_alive) {
            return Err(SessionError::EmptyParty);
        }

        let mut rng = PcgRng::new(setup.seed);
        let queue_rng = rng.fork();
        let queue = match setup.turn_order {
            Some(entries) => TurnQueue::from_entries(entries, queue_rng, config.enemy_turn_weight),
            None => TurnQueue::generate(queue_rng, config.queue_length, config.enemy_turn_weight),
        };

        let mut log = BattleLog::new(config.log_capacity);
        log.push(format!("{} appears!", setup.enemy.name));

        let mut session = Self {
            ramp: ChargeRamp::from_config(&config),
            mode: setup.mode,
            rng,
            party: setup.party,
            enemy: setup.enemy,
            enemy_info: setup.enemy_info,
            queue,
            planner: AbilityPlanner::new(),
            stance: Stance::default(),
            stage: Stage::Planning,
            strike_target: None,
            reaction: None,
            flash: FlashSignals::default(),
            timer: TransitionTimer::default(),
            now: Duration::ZERO,
            log,
            events: Vec::new(),
            revision: 0,
            finished: false,
            kill_confirmed: false,
            provisional_hp: None,
            config,
        };
        session.begin_turn()?;
        Ok(session)
    }

    // ===== accessors =====

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn mode(&self) -> BattleMode {
        self.mode
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn phase(&self) -> Phase {
        self.stage.phase()
    }

    pub fn stance(&self) -> Stance {
        self.stance
    }

    pub fn charge_level(&self) -> f64 {
        self.ramp.level()
    }

    pub fn party(&self) -> &[Actor] {
        &self.party
    }

    pub fn enemy(&self) -> &Actor {
        &self.enemy
    }

    pub fn enemy_info(&self) -> &EnemyInfo {
        &self.enemy_info
    }

    pub fn queue(&self) -> &TurnQueue {
        &self.queue
    }

    pub fn planner(&self) -> &AbilityPlanner {
        &self.planner
    }

    pub fn strike_target(&self) -> Option<ActorId> {
        self.strike_target
    }

    pub fn reaction(&self) -> Option<&ReactionMinigame> {
        self.reaction.as_ref()
    }

    pub fn log(&self) -> &BattleLog {
        &self.log
    }

    /// Session-relative time reached by the last [`Self::advance_to`].
    pub fn now(&self) -> Duration {
        self.now
    }

    /// When the next scheduled transition fires, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timer.due_at()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_victory_provisional(&self) -> bool {
        self.stage == Stage::AwaitingConfirmation
    }

    /// True once a terminal outcome has been acknowledged.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Takes every event emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            revision: self.revision,
            phase: self.phase(),
            stance: self.stance,
            charge_level: self.ramp.level(),
            party: self.party.clone(),
            enemy: self.enemy.clone(),
            enemy_info: self.enemy_info.clone(),
            turn_queue: self.queue.entries().to_vec(),
            turn_index: self.queue.index(),
            chain: self.planner.chain_count(),
            armed: self.planner.armed().cloned(),
            planned: self.planner.planned().to_vec(),
            log: self.log.tail(2),
            parry: self.reaction.as_ref().map(ReactionMinigame::visual),
            flash: self.flash,
            strike_target: self.strike_target,
            victory_provisional: self.is_victory_provisional(),
            finished: self.finished,
        }
    }

    // ===== player commands =====

    /// Arms or plans an ability. See [`AbilityPlanner::select`].
    pub fn select(
        &mut self,
        actor: ActorId,
        ability: &AbilityId,
    ) -> Result<SelectOutcome, SessionError> {
        self.expect_stage("select", Stage::Planning)?;
        let outcome = self.planner.select(&mut self.party, actor, ability)?;
        match &outcome {
            SelectOutcome::Armed(selection) => self.emit(SessionEvent::AbilityArmed {
                actor: selection.actor,
                ability: selection.ability.clone(),
            }),
            SelectOutcome::Planned { chain } => self.emit(SessionEvent::AbilityPlanned {
                actor,
                ability: ability.clone(),
                chain: *chain,
            }),
        }
        self.touch();
        Ok(outcome)
    }

    pub fn undo_last(&mut self) -> Result<(), SessionError> {
        self.expect_stage("undo", Stage::Planning)?;
        let action = self.planner.undo_last(&mut self.party)?;
        self.emit(SessionEvent::PlanUndone {
            actor: action.actor,
            ability: action.ability.id,
            chain: self.planner.chain_count(),
        });
        self.touch();
        Ok(())
    }

    /// Flips between Attack and Defense. The charge ramp keeps running.
    pub fn toggle_stance(&mut self) -> Result<Stance, SessionError> {
        self.expect_stage("toggle_stance", Stage::Planning)?;
        self.stance = self.stance.toggled();
        self.emit(SessionEvent::StanceChanged {
            stance: self.stance,
        });
        self.touch();
        Ok(self.stance)
    }

    /// Resolves the planned batch and ends the player's turn.
    ///
    /// The batch resolves against copies of the party and enemy; the copies
    /// replace the live state only when the whole batch succeeds. An empty
    /// plan is a pass. While the batch settles the session sits in
    /// `Resolving` and further commits are rejected.
    pub fn commit(&mut self) -> Result<BatchOutcome, SessionError> {
        self.expect_stage("commit", Stage::Planning)?;
        self.transition(Stage::Resolving)?;

        let mut party = self.party.clone();
        let mut enemy = self.enemy.clone();
        let hp_before = enemy.hp().current();
        let ctx = ResolveContext {
            stance: self.stance,
            charge_level: self.ramp.level(),
            config: &self.config,
        };
        let resolved = resolve_batch(&mut party, &mut enemy, self.planner.planned(), ctx);
        let outcome = match resolved {
            Ok(outcome) => outcome,
            Err(err) => {
                self.transition(Stage::Planning)?;
                return Err(err.into());
            }
        };

        self.party = party;
        self.enemy = enemy;
        self.planner.clear();
        self.record_batch(&outcome);
        self.emit(SessionEvent::BatchResolved {
            turn: self.queue.index(),
            outcome: outcome.clone(),
        });

        if outcome.enemy_defeated() {
            if self.mode == BattleMode::Raid
                && self.config.victory_policy == VictoryPolicy::Authoritative
            {
                self.transition(Stage::AwaitingConfirmation)?;
                self.provisional_hp = Some(hp_before);
                self.emit(SessionEvent::VictoryProvisional);
                self.timer.schedule(
                    self.now + self.config.confirmation_timeout(),
                    TransitionKind::ConfirmationTimeout,
                );
            } else {
                self.finish_victory()?;
            }
        } else if self.config.commit_settle().is_zero() {
            self.advance_turn()?;
        } else {
            self.timer
                .schedule(self.now + self.config.commit_settle(), TransitionKind::AdvanceTurn);
        }

        self.touch();
        Ok(outcome)
    }

    /// Feeds reaction input during an enemy strike.
    ///
    /// Returns the verdict when this input resolved the challenge. Input the
    /// challenge ignores (pre-delay, wrong kind, already resolved) yields
    /// `Ok(None)`.
    pub fn submit_parry_input(&mut self, input: ParryInput) -> Result<Option<Verdict>, SessionError> {
        self.expect_stage("parry", Stage::Strike)?;
        let verdict = match self.reaction.as_mut() {
            Some(reaction) => reaction.submit(input),
            None => {
                return Err(SessionError::NotAccepting {
                    command: "parry",
                    stage: self.stage,
                });
            }
        };
        if let Some(verdict) = verdict {
            self.resolve_strike(verdict)?;
        }
        self.touch();
        Ok(verdict)
    }

    /// Overwrites the enemy HP with the value from the shared raid ledger.
    ///
    /// A zero value confirms the kill: immediately during the player's turn,
    /// or once the enemy's strike resolves if it is mid-turn. The confirmed
    /// kill wins even if that strike downs the party. A non-zero value while
    /// a local kill awaits confirmation resumes the battle.
    pub fn apply_authoritative_hp(&mut self, hp: u32) -> Result<(), SessionError> {
        if self.mode != BattleMode::Raid {
            return Err(SessionError::NotRaid);
        }
        if self.stage.is_terminal() {
            return Ok(());
        }

        let local = self.enemy.hp().current();
        self.enemy.set_hp(hp);
        let authoritative = self.enemy.hp().current();
        if local != authoritative {
            self.emit(SessionEvent::EnemyHpCorrected {
                local,
                authoritative,
            });
        }

        match self.stage {
            Stage::AwaitingConfirmation => {
                self.timer.cancel();
                self.provisional_hp = None;
                if authoritative == 0 {
                    self.finish_victory()?;
                } else {
                    self.log.push("The raid boss still stands.");
                    self.advance_turn()?;
                }
            }
            Stage::Planning | Stage::Resolving if authoritative == 0 => self.finish_victory()?,
            Stage::Strike if authoritative == 0 && self.strike_resolved() => {
                self.finish_victory()?
            }
            Stage::Windup | Stage::Strike if authoritative == 0 => self.kill_confirmed = true,
            _ => {}
        }

        self.touch();
        Ok(())
    }

    /// Marks a finished battle as seen by the player.
    pub fn acknowledge(&mut self) -> Result<(), SessionError> {
        if !self.stage.is_terminal() {
            return Err(SessionError::NotAccepting {
                command: "acknowledge",
                stage: self.stage,
            });
        }
        self.finished = true;
        self.touch();
        Ok(())
    }

    // ===== time =====

    /// Moves session time forward to `now`.
    ///
    /// Continuous state is stepped piecewise between scheduled transitions,
    /// so a single large jump behaves like many small frames. Times earlier
    /// than the current session time are ignored.
    pub fn advance_to(&mut self, now: Duration) -> Result<(), SessionError> {
        let before = self.revision;

        while self.now < now && !self.stage.is_terminal() {
            let target = match self.timer.due_at() {
                Some(due) if due < now => due.max(self.now),
                _ => now,
            };
            let dt = target - self.now;
            self.now = target;
            self.step(dt)?;
            self.fire_due()?;
        }
        self.now = self.now.max(now);
        self.fire_due()?;

        if self.revision == before && self.is_continuous() {
            self.touch();
        }
        Ok(())
    }

    fn is_continuous(&self) -> bool {
        match self.stage {
            Stage::Planning => self.stance == Stance::Attack && !self.ramp.is_full(),
            Stage::Strike => self.reaction.as_ref().is_some_and(|r| !r.is_resolved()),
            _ => false,
        }
    }

    fn step(&mut self, dt: Duration) -> Result<(), SessionError> {
        if dt.is_zero() {
            return Ok(());
        }
        match self.stage {
            Stage::Planning => self.ramp.advance(dt),
            Stage::Strike => {
                let verdict = self.reaction.as_mut().and_then(|r| r.advance(dt));
                if let Some(verdict) = verdict {
                    self.resolve_strike(verdict)?;
                    self.touch();
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn fire_due(&mut self) -> Result<(), SessionError> {
        while let Some(pending) = self.timer.take_due(self.now) {
            match (pending.kind, self.stage) {
                (TransitionKind::BeginStrike, Stage::Windup) => self.begin_strike()?,
                (TransitionKind::AdvanceTurn, Stage::Resolving | Stage::Strike) => {
                    self.advance_turn()?
                }
                (TransitionKind::ConfirmationTimeout, Stage::AwaitingConfirmation) => {
                    self.resume_unconfirmed()?
                }
                // Stale timer from a stage that has since been left.
                _ => continue,
            }
            self.touch();
        }
        Ok(())
    }

    // ===== transitions =====

    fn begin_turn(&mut self) -> Result<(), SessionError> {
        let tag = self.queue.current();
        self.emit(SessionEvent::TurnStarted {
            index: self.queue.index(),
            tag,
        });
        match tag {
            TurnTag::Player => Ok(()),
            TurnTag::Enemy => self.begin_windup(),
        }
    }

    fn advance_turn(&mut self) -> Result<(), SessionError> {
        self.queue.advance();
        self.enter_active()
    }

    fn enter_active(&mut self) -> Result<(), SessionError> {
        let regen = self.config.ap_regen_per_turn;
        for actor in &mut self.party {
            actor.restore_ap(regen);
            actor.tick_counters();
        }
        self.enemy.tick_counters();
        self.planner.clear();
        self.strike_target = None;
        self.reaction = None;
        self.flash = FlashSignals::default();
        self.ramp.reset();
        self.transition(Stage::Planning)?;
        self.begin_turn()
    }

    fn begin_windup(&mut self) -> Result<(), SessionError> {
        let living: Vec<ActorId> = self
            .party
            .iter()
            .filter(|actor| actor.is_alive())
            .map(|actor| actor.id)
            .collect();
        if living.is_empty() {
            return Err(SessionError::NoStrikeTarget);
        }
        let target = living[self.rng.below(living.len())];

        self.transition(Stage::Windup)?;
        self.strike_target = Some(target);
        let line = format!(
            "{} readies a strike at {}!",
            self.enemy.name,
            self.actor_name(target)
        );
        self.log.push(line);
        self.emit(SessionEvent::StrikeTelegraphed { target });
        self.timer
            .schedule(self.now + self.config.windup(), TransitionKind::BeginStrike);
        Ok(())
    }

    fn begin_strike(&mut self) -> Result<(), SessionError> {
        self.transition(Stage::Strike)?;
        let reaction = ReactionMinigame::start(&mut self.rng, &self.config);
        self.emit(SessionEvent::ReactionStarted {
            mode: reaction.mode(),
        });
        self.reaction = Some(reaction);
        Ok(())
    }

    fn resolve_strike(&mut self, verdict: Verdict) -> Result<(), SessionError> {
        let target_id = self.strike_target.ok_or(SessionError::NoStrikeTarget)?;
        let target = self
            .party
            .iter_mut()
            .find(|actor| actor.id == target_id)
            .ok_or(SessionError::MissingStrikeTarget(target_id))?;

        let damage = apply_strike(target, verdict.is_success(), &self.config);
        let line = if verdict.is_success() {
            format!("{verdict}! {} avoids the blow.", target.name)
        } else {
            format!("{verdict}! {} takes {damage} damage.", target.name)
        };
        self.log.push(line);
        self.flash = if verdict.is_success() {
            FlashSignals {
                success: true,
                ..FlashSignals::default()
            }
        } else {
            FlashSignals {
                fail: true,
                shake: true,
                ..FlashSignals::default()
            }
        };
        self.emit(SessionEvent::ReactionResolved {
            target: target_id,
            verdict,
            damage,
        });

        if self.kill_confirmed {
            self.finish_victory()?;
        } else if self.party.iter().all(|actor| !actor.is_alive()) {
            self.transition(Stage::Defeat)?;
            self.timer.cancel();
            self.log.push("The party has fallen.");
            self.emit(SessionEvent::BattleEnded {
                phase: Phase::Defeat,
            });
        } else {
            self.timer
                .schedule(self.now + self.config.advance_delay(), TransitionKind::AdvanceTurn);
        }
        Ok(())
    }

    /// No confirmation arrived in time: the local kill is rolled back to the
    /// HP the enemy had before that batch and the battle goes on.
    fn resume_unconfirmed(&mut self) -> Result<(), SessionError> {
        if let Some(hp) = self.provisional_hp.take() {
            self.enemy.set_hp(hp);
        }
        self.log.push(format!("{} is still standing.", self.enemy.name));
        self.advance_turn()
    }

    fn strike_resolved(&self) -> bool {
        self.reaction.as_ref().is_some_and(ReactionMinigame::is_resolved)
    }

    fn finish_victory(&mut self) -> Result<(), SessionError> {
        self.transition(Stage::Victory)?;
        self.timer.cancel();
        self.log.push(format!("{} is defeated!", self.enemy.name));
        self.emit(SessionEvent::BattleEnded {
            phase: Phase::Victory,
        });
        Ok(())
    }

    fn transition(&mut self, to: Stage) -> Result<(), SessionError> {
        let from = self.stage;
        if !from.can_transition_to(to) {
            return Err(SessionError::InvalidTransition { from, to });
        }
        self.stage = to;
        if from.phase() != to.phase() {
            self.emit(SessionEvent::PhaseChanged {
                from: from.phase(),
                to: to.phase(),
            });
        }
        Ok(())
    }

    // ===== helpers =====

    fn expect_stage(&self, command: &'static str, expected: Stage) -> Result<(), SessionError> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(SessionError::NotAccepting {
                command,
                stage: self.stage,
            })
        }
    }

    fn record_batch(&mut self, outcome: &BatchOutcome) {
        if outcome.actions.is_empty() {
            self.log.push("The party holds its ground.");
            return;
        }
        for action in &outcome.actions {
            let caster = self.actor_name(action.actor);
            let line = match &action.effect {
                EffectOutcome::Damage { amount, .. } => {
                    format!("{caster} uses {} for {amount} damage.", action.ability_name)
                }
                EffectOutcome::Heal { per_member, .. } => {
                    format!("{caster} uses {}, healing {per_member}.", action.ability_name)
                }
                EffectOutcome::Buff { turns } => {
                    format!("{caster} uses {}. Attack up for {turns} turns.", action.ability_name)
                }
                EffectOutcome::Debuff { turns } => format!(
                    "{caster} uses {}. {} is exposed for {turns} turns.",
                    action.ability_name, self.enemy.name
                ),
            };
            self.log.push(line);
        }
    }

    fn actor_name(&self, id: ActorId) -> String {
        self.party
            .iter()
            .find(|actor| actor.id == id)
            .map_or_else(|| id.to_string(), |actor| actor.name.clone())
    }

    fn emit(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests;
