//! Data-driven battle content.
//!
//! Loaders for the RON/TOML data files that feed the battle rules:
//! - Ability catalog (RON)
//! - Encounters, raid bosses and local player profiles (RON)
//! - Battle tuning (TOML)
//!
//! The files under `data/` are also embedded at build time so binaries can run
//! without a data directory; see [`loaders::embedded`].

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilityCatalogLoader, ConfigLoader, ContentFactory, EncounterLoader, EncounterTable,
    EnemyDefinition, LoadResult, ProfileDefinition,
};
