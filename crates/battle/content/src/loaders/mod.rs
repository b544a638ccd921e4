//! Content loaders for reading battle data from files.

pub mod abilities;
pub mod config;
pub mod embedded;
pub mod encounters;
pub mod factory;

pub use abilities::AbilityCatalogLoader;
pub use config::ConfigLoader;
pub use encounters::{EncounterLoader, EncounterTable, EnemyDefinition, ProfileDefinition};
pub use factory::ContentFactory;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
