//! Content factory for loading every battle data file from one directory.

use std::path::{Path, PathBuf};

use battle_core::{AbilityCatalog, BattleConfig};

use crate::loaders::{
    AbilityCatalogLoader, ConfigLoader, EncounterLoader, EncounterTable, LoadResult,
};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── battle.toml
/// ├── abilities.ron
/// └── encounters.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle tuning from `battle.toml`.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        ConfigLoader::load(&self.data_dir.join("battle.toml"))
    }

    /// Load the ability catalog from `abilities.ron`.
    pub fn load_abilities(&self) -> LoadResult<AbilityCatalog> {
        AbilityCatalogLoader::load(&self.data_dir.join("abilities.ron"))
    }

    /// Load encounters, raids and profiles from `encounters.ron`.
    pub fn load_encounters(&self) -> LoadResult<EncounterTable> {
        EncounterLoader::load(&self.data_dir.join("encounters.ron"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
