//! Battle configuration loader.

use std::path::Path;

use battle_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for battle configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Keys missing from the file keep their [`BattleConfig::default`] values.
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        let config: BattleConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse battle config TOML: {}", e))?;
        Self::validate(&config)?;
        Ok(config)
    }

    fn validate(config: &BattleConfig) -> LoadResult<()> {
        anyhow::ensure!(config.queue_length > 0, "queue_length must be positive");
        anyhow::ensure!(
            (0.0..=1.0).contains(&config.enemy_turn_weight),
            "enemy_turn_weight must be within [0, 1], got {}",
            config.enemy_turn_weight
        );
        anyhow::ensure!(
            config.charge_max >= config.charge_start,
            "charge_max ({}) is below charge_start ({})",
            config.charge_max,
            config.charge_start
        );
        anyhow::ensure!(
            config.slider_band_start < config.slider_success_at
                && config.slider_success_at <= BattleConfig::REACTION_PROGRESS_MAX,
            "slider band [{}, {}) is not inside the progress range",
            config.slider_band_start,
            config.slider_success_at
        );
        anyhow::ensure!(
            config.sigil_rate_per_sec > 0.0 && config.slider_rate_per_sec > 0.0,
            "reaction rates must be positive"
        );
        Ok(())
    }
}
