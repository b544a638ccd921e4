//! High-level runtime orchestrator.
//!
//! The runtime fetches everything a battle needs through the injected
//! providers, opens the [`BattleSession`], and spawns the worker that drives
//! it. Clients talk to the battle through the cloneable [`BattleHandle`].

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::info;

use battle_core::{AbilityCatalog, BattleMode, BattleSession, SessionSetup, TurnTag};

use crate::api::{
    BattleHandle, EncounterProvider, RaidChannel, Result, RuntimeError, SetupError,
};
use crate::clock::{Clock, SystemClock};
use crate::config::RuntimeConfig;
use crate::events::{Event, EventBus, Topic};
use crate::raid::RaidSyncAdapter;
use crate::setup;
use crate::workers::{Command, RaidLink, SessionWorker};

/// What the player is fighting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encounter {
    Standalone { encounter_id: String },
    Raid { raid_id: String },
}

impl Encounter {
    pub fn standalone(encounter_id: impl Into<String>) -> Self {
        Self::Standalone {
            encounter_id: encounter_id.into(),
        }
    }

    pub fn raid(raid_id: impl Into<String>) -> Self {
        Self::Raid {
            raid_id: raid_id.into(),
        }
    }

    pub fn mode(&self) -> BattleMode {
        match self {
            Self::Standalone { .. } => BattleMode::Standalone,
            Self::Raid { .. } => BattleMode::Raid,
        }
    }
}

/// One running battle.
///
/// Design: the runtime owns the worker task; [`BattleHandle`] is the façade
/// clients clone and share.
pub struct BattleRuntime {
    handle: BattleHandle,
    worker_handle: JoinHandle<()>,
}

impl BattleRuntime {
    /// Create a new runtime builder
    pub fn builder() -> BattleRuntimeBuilder {
        BattleRuntimeBuilder::new()
    }

    /// Get a cloneable handle to this battle
    pub fn handle(&self) -> BattleHandle {
        self.handle.clone()
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Whether the worker has stopped (battle acknowledged or shut down).
    pub fn is_finished(&self) -> bool {
        self.worker_handle.is_finished()
    }

    /// Stops the worker and waits for it. Pending timers die with the session.
    pub async fn shutdown(self) -> Result<()> {
        self.handle.shutdown().await;
        drop(self.handle);

        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`BattleRuntime`].
pub struct BattleRuntimeBuilder {
    config: RuntimeConfig,
    provider: Option<Arc<dyn EncounterProvider>>,
    raid_channel: Option<Arc<dyn RaidChannel>>,
    clock: Arc<dyn Clock>,
    catalog: AbilityCatalog,
    user_id: String,
    encounter: Option<Encounter>,
    turn_order: Option<Vec<TurnTag>>,
}

impl BattleRuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            provider: None,
            raid_channel: None,
            clock: Arc::new(SystemClock::new()),
            catalog: AbilityCatalog::new(),
            user_id: "local".to_owned(),
            encounter: None,
            turn_order: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the required encounter provider
    pub fn provider(mut self, provider: impl EncounterProvider + 'static) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Required for raid encounters.
    pub fn raid_channel(mut self, channel: Arc<dyn RaidChannel>) -> Self {
        self.raid_channel = Some(channel);
        self
    }

    /// Replace the wall clock, e.g. with a [`crate::ManualClock`] in tests.
    pub fn clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Catalog used to resolve the player's loadout. Defaults to empty, which
    /// leaves only the basic attack.
    pub fn catalog(mut self, catalog: AbilityCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn encounter(mut self, encounter: Encounter) -> Self {
        self.encounter = Some(encounter);
        self
    }

    /// Fix the opening turn order instead of drawing it from the seed.
    pub fn turn_order(mut self, order: Vec<TurnTag>) -> Self {
        self.turn_order = Some(order);
        self
    }

    /// Build the runtime and start the battle.
    pub async fn build(self) -> Result<BattleRuntime> {
        let provider = self.provider.ok_or(RuntimeError::MissingProvider)?;
        let encounter = self.encounter.ok_or(RuntimeError::MissingEncounter)?;
        if matches!(encounter, Encounter::Raid { .. }) && self.raid_channel.is_none() {
            return Err(RuntimeError::MissingRaidChannel);
        }

        let descriptor = match &encounter {
            Encounter::Standalone { encounter_id } => provider
                .fetch_enemy(encounter_id)
                .await?
                .ok_or_else(|| SetupError::EnemyNotFound(encounter_id.clone()))?,
            Encounter::Raid { raid_id } => provider
                .fetch_raid_boss(raid_id)
                .await?
                .ok_or_else(|| SetupError::RaidNotFound(raid_id.clone()))?,
        };
        let identity = provider.identity(&self.user_id).await?;
        let loadout = provider.fetch_loadout(&self.user_id).await?;

        let player = setup::player_actor(&identity, &loadout, &self.catalog);
        let (enemy, enemy_info) = setup::enemy_actor(&descriptor)?;

        let seed = self.config.seed.unwrap_or_else(rand::random);
        let session = BattleSession::new(
            SessionSetup {
                party: vec![player],
                enemy,
                enemy_info,
                mode: encounter.mode(),
                seed,
                turn_order: self.turn_order,
            },
            self.config.battle.clone(),
        )
        .map_err(SetupError::Session)?;

        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let raid = match (&encounter, self.raid_channel) {
            (Encounter::Raid { raid_id }, Some(channel)) => {
                let (adapter, hp_rx) = RaidSyncAdapter::connect(
                    channel,
                    raid_id.clone(),
                    self.user_id.clone(),
                    event_bus.clone(),
                )
                .await?;
                Some(RaidLink { adapter, hp_rx })
            }
            _ => None,
        };

        info!(
            target: "runtime",
            encounter = ?encounter,
            seed,
            "battle starting"
        );

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let handle = BattleHandle::new(command_tx, event_bus.clone());

        let worker = SessionWorker::new(
            session,
            self.clock,
            command_rx,
            event_bus,
            raid,
            self.config.tick_interval,
        );
        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(BattleRuntime {
            handle,
            worker_handle,
        })
    }
}
