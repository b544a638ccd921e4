//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration, workers, or infrastructure.

pub mod errors;
pub mod handle;
pub mod providers;
pub mod raid;

pub use errors::{RaidError, Result, RuntimeError, SetupError};
pub use handle::BattleHandle;
pub use providers::{EncounterProvider, EnemyDescriptor, IdentitySnapshot};
pub use raid::RaidChannel;
