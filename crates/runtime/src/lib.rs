//! Async shell around the deterministic battle rules.
//!
//! A [`BattleRuntime`] owns one session worker task that drives a
//! [`battle_core::BattleSession`] from an injected [`Clock`], applies commands
//! sent through [`BattleHandle`], and publishes what happened on a topic-based
//! [`EventBus`]. Raid battles additionally bridge the session to a shared
//! [`RaidChannel`] through the [`RaidSyncAdapter`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`providers`] adapts content tables to the setup provider trait
//! - [`raid`] holds the raid bridge and an in-process ledger
//! - [`clock`] abstracts wall time so tests can drive it by hand
pub mod api;
pub mod clock;
pub mod config;
pub mod events;
pub mod providers;
pub mod raid;
pub mod runtime;

mod setup;
mod workers;

pub use api::{
    BattleHandle, EncounterProvider, EnemyDescriptor, IdentitySnapshot, RaidChannel, RaidError,
    Result, RuntimeError, SetupError,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::RuntimeConfig;
pub use events::{Event, EventBus, RaidEvent, Topic};
pub use providers::ContentProvider;
pub use raid::{DamageReport, LocalRaidLedger, RaidSyncAdapter};
pub use runtime::{BattleRuntime, BattleRuntimeBuilder, Encounter};
