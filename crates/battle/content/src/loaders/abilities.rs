//! Ability catalog loader.

use std::collections::HashSet;
use std::path::Path;

use battle_core::{AbilityCatalog, AbilityDefinition};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Ability catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityCatalogFile {
    pub abilities: Vec<AbilityDefinition>,
}

/// Loader for the ability catalog from RON files.
pub struct AbilityCatalogLoader;

impl AbilityCatalogLoader {
    /// Load the ability catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<AbilityCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse catalog RON text.
    ///
    /// Duplicate ids are rejected rather than silently overwritten.
    pub fn parse(content: &str) -> LoadResult<AbilityCatalog> {
        let file: AbilityCatalogFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse ability catalog RON: {}", e))?;

        let mut seen = HashSet::new();
        for definition in &file.abilities {
            anyhow::ensure!(
                seen.insert(definition.id.clone()),
                "Duplicate ability id '{}' in catalog",
                definition.id
            );
            anyhow::ensure!(
                !definition.name.trim().is_empty(),
                "Ability '{}' has an empty name",
                definition.id
            );
        }

        Ok(AbilityCatalog::from_definitions(file.abilities))
    }
}
