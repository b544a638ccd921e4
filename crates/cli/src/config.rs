//! Simulator configuration.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// What to fight and how the scripted player behaves.
#[derive(Clone, Debug)]
pub struct CliConfig {
    /// Directory holding `abilities.ron`, `encounters.ron` and `battle.toml`.
    /// Embedded content is used when unset.
    pub data_dir: Option<PathBuf>,
    pub user_id: String,
    pub encounter: String,
    /// Fight this raid boss against a local ledger instead of `encounter`.
    pub raid: Option<String>,
    pub autoplay: AutoplayConfig,
}

#[derive(Clone, Debug)]
pub struct AutoplayConfig {
    pub poll_interval: Duration,
    /// Chance that the scripted player answers a strike correctly.
    pub parry_rate: f64,
    /// Give up once the turn queue index passes this.
    pub max_turns: usize,
    /// Heal when any party member drops below this fraction of max HP.
    pub heal_threshold: f64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            user_id: "local".to_owned(),
            encounter: "slime_glade".to_owned(),
            raid: None,
            autoplay: AutoplayConfig::default(),
        }
    }
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(50),
            parry_rate: 0.75,
            max_turns: 200,
            heal_threshold: 0.4,
        }
    }
}

impl CliConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `BATTLE_DATA_DIR` - Content directory (default: embedded content)
    /// - `BATTLE_USER` - Profile to play as (default: local)
    /// - `BATTLE_ENCOUNTER` - Standalone encounter id (default: slime_glade)
    /// - `BATTLE_RAID` - Raid boss id; switches to raid mode when set
    /// - `BATTLE_POLL_MS` - Scripted player poll interval (default: 50)
    /// - `BATTLE_PARRY_RATE` - Parry success chance in [0, 1] (default: 0.75)
    /// - `BATTLE_MAX_TURNS` - Turn limit before giving up (default: 200)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = read_env::<PathBuf>("BATTLE_DATA_DIR") {
            config.data_dir = Some(dir);
        }
        if let Some(user) = read_env::<String>("BATTLE_USER") {
            config.user_id = user;
        }
        if let Some(encounter) = read_env::<String>("BATTLE_ENCOUNTER") {
            config.encounter = encounter;
        }
        config.raid = read_env::<String>("BATTLE_RAID").filter(|raid| !raid.is_empty());

        if let Some(ms) = read_env::<u64>("BATTLE_POLL_MS") {
            config.autoplay.poll_interval = Duration::from_millis(ms.max(5));
        }
        if let Some(rate) = read_env::<f64>("BATTLE_PARRY_RATE") {
            config.autoplay.parry_rate = rate.clamp(0.0, 1.0);
        }
        if let Some(turns) = read_env::<usize>("BATTLE_MAX_TURNS") {
            config.autoplay.max_turns = turns.max(1);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
