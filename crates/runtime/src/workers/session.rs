//! Session worker that owns the live [`BattleSession`].
//!
//! Receives commands from [`crate::BattleHandle`], advances session time from
//! the injected [`Clock`], applies authoritative raid HP, and publishes
//! session events plus snapshot refreshes to the [`EventBus`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use battle_core::{
    AbilityId, ActorId, BatchOutcome, BattleSession, BattleSnapshot, ParryInput, SelectOutcome,
    SessionError, SessionEvent, Stance, Verdict,
};

use crate::api::{Result, RuntimeError};
use crate::clock::Clock;
use crate::events::{Event, EventBus};
use crate::raid::RaidSyncAdapter;

/// Commands that can be sent to the session worker
pub enum Command {
    Select {
        actor: ActorId,
        ability: AbilityId,
        reply: oneshot::Sender<Result<SelectOutcome>>,
    },
    UndoLast {
        reply: oneshot::Sender<Result<()>>,
    },
    ToggleStance {
        reply: oneshot::Sender<Result<Stance>>,
    },
    Commit {
        reply: oneshot::Sender<Result<BatchOutcome>>,
    },
    Parry {
        input: ParryInput,
        reply: oneshot::Sender<Result<Option<Verdict>>>,
    },
    Acknowledge {
        reply: oneshot::Sender<Result<()>>,
    },
    /// Query the current view (read-only, after syncing the clock).
    Snapshot {
        reply: oneshot::Sender<BattleSnapshot>,
    },
    Shutdown,
}

/// Raid wiring for a worker whose session fights a shared boss.
pub struct RaidLink {
    pub adapter: RaidSyncAdapter,
    pub hp_rx: mpsc::Receiver<u32>,
}

pub struct SessionWorker {
    session: BattleSession,
    clock: Arc<dyn Clock>,
    origin: Duration,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    raid: Option<RaidSyncAdapter>,
    raid_hp: Option<mpsc::Receiver<u32>>,
    tick: Duration,
    published_revision: Option<u64>,
}

impl SessionWorker {
    pub fn new(
        session: BattleSession,
        clock: Arc<dyn Clock>,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        raid: Option<RaidLink>,
        tick: Duration,
    ) -> Self {
        info!(
            target: "runtime::worker",
            mode = %session.mode(),
            enemy = %session.enemy().name,
            party = session.party().len(),
            "session worker initialized"
        );

        let (raid, raid_hp) = match raid {
            Some(link) => (Some(link.adapter), Some(link.hp_rx)),
            None => (None, None),
        };

        Self {
            session,
            origin: clock.now(),
            clock,
            command_rx,
            event_bus,
            raid,
            raid_hp,
            tick: tick.max(Duration::from_millis(1)),
            published_revision: None,
        }
    }

    /// Main worker loop.
    ///
    /// Exits on `Shutdown`, when every handle is dropped, or once a finished
    /// battle has been acknowledged.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        self.flush();

        loop {
            // Authoritative HP is applied before any queued player command.
            tokio::select! {
                biased;
                hp = next_hp(&mut self.raid_hp) => match hp {
                    Some(hp) => self.apply_authoritative_hp(hp),
                    None => {
                        warn!(target: "runtime::worker", "raid hp stream closed");
                        self.raid_hp = None;
                    }
                },
                cmd = self.command_rx.recv() => match cmd {
                    Some(Command::Shutdown) | None => break,
                    Some(cmd) => self.handle_command(cmd),
                },
                _ = ticker.tick() => self.sync_clock(),
            }

            self.flush();

            if self.session.is_finished() {
                debug!(target: "runtime::worker", "battle acknowledged, stopping worker");
                break;
            }
        }

        self.teardown();
    }

    fn handle_command(&mut self, cmd: Command) {
        self.sync_clock();

        match cmd {
            Command::Select {
                actor,
                ability,
                reply,
            } => {
                let result = self.session.select(actor, &ability);
                respond(reply, "Select", self.settle("select", result));
            }
            Command::UndoLast { reply } => {
                let result = self.session.undo_last();
                respond(reply, "UndoLast", self.settle("undo_last", result));
            }
            Command::ToggleStance { reply } => {
                let result = self.session.toggle_stance();
                respond(reply, "ToggleStance", self.settle("toggle_stance", result));
            }
            Command::Commit { reply } => {
                let result = self.session.commit();
                respond(reply, "Commit", self.settle("commit", result));
            }
            Command::Parry { input, reply } => {
                let result = self.session.submit_parry_input(input);
                respond(reply, "Parry", self.settle("parry", result));
            }
            Command::Acknowledge { reply } => {
                let result = self.session.acknowledge();
                respond(reply, "Acknowledge", self.settle("acknowledge", result));
            }
            Command::Snapshot { reply } => {
                respond(reply, "Snapshot", self.session.snapshot());
            }
            Command::Shutdown => {}
        }
    }

    /// Logs a session error and converts it for the caller.
    ///
    /// Rejections are routine (wrong phase, not enough AP) and stay at debug.
    fn settle<T>(&self, command: &str, result: std::result::Result<T, SessionError>) -> Result<T> {
        result.map_err(|err| {
            if err.is_rejection() {
                debug!(target: "runtime::worker", command, error = %err, "command rejected");
            } else {
                warn!(target: "runtime::worker", command, error = %err, "command failed");
            }
            RuntimeError::from(err)
        })
    }

    fn apply_authoritative_hp(&mut self, hp: u32) {
        self.sync_clock();
        if let Err(err) = self.session.apply_authoritative_hp(hp) {
            warn!(target: "runtime::worker", hp, error = %err, "failed to apply raid hp");
        }
    }

    /// Advances the session to the clock's current time.
    fn sync_clock(&mut self) {
        let now = self.clock.now().saturating_sub(self.origin);
        if let Err(err) = self.session.advance_to(now) {
            // The session stays usable; the loop keeps running.
            warn!(target: "runtime::worker", error = %err, "failed to advance session");
        }
    }

    /// Publishes buffered session events and, if anything changed, a snapshot.
    fn flush(&mut self) {
        for event in self.session.drain_events() {
            self.observe(&event);
            self.event_bus.publish(Event::Session(event));
        }

        let revision = self.session.revision();
        if self.published_revision != Some(revision) {
            self.published_revision = Some(revision);
            self.event_bus
                .publish(Event::Snapshot(Box::new(self.session.snapshot())));
        }
    }

    fn observe(&self, event: &SessionEvent) {
        match event {
            SessionEvent::BatchResolved { turn, outcome } => {
                debug!(
                    target: "runtime::worker",
                    turn,
                    damage = outcome.total_damage,
                    healed = outcome.total_healed,
                    "batch resolved"
                );
                if let Some(raid) = &self.raid {
                    raid.report(outcome.total_damage);
                }
            }
            SessionEvent::BattleEnded { phase } => {
                info!(target: "runtime::worker", %phase, "battle ended");
            }
            SessionEvent::EnemyHpCorrected {
                local,
                authoritative,
            } => {
                debug!(target: "runtime::worker", local, authoritative, "enemy hp corrected");
            }
            other => debug!(target: "runtime::worker", event = ?other, "session event"),
        }
    }

    fn teardown(&mut self) {
        if let Some(raid) = self.raid.take() {
            debug!(target: "runtime::worker", raid = raid.raid_id(), "leaving raid");
        }
        self.raid_hp = None;
    }
}

async fn next_hp(rx: &mut Option<mpsc::Receiver<u32>>) -> Option<u32> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

fn respond<T>(reply: oneshot::Sender<T>, command: &str, value: T) {
    if reply.send(value).is_err() {
        debug!(target: "runtime::worker", "{command} reply channel closed (caller dropped)");
    }
}
