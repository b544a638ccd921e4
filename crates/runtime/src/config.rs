//! Runtime configuration.
use std::env;
use std::time::Duration;

use battle_core::BattleConfig;

/// Runtime configuration shared across the orchestrator and the worker.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub battle: BattleConfig,
    /// How often the worker advances session time without a command.
    pub tick_interval: Duration,
    pub command_buffer_size: usize,
    pub event_buffer_size: usize,
    /// Fixed session seed. A random one is drawn per battle when `None`.
    pub seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            battle: BattleConfig::default(),
            tick_interval: Duration::from_millis(16),
            command_buffer_size: 32,
            event_buffer_size: 100,
            seed: None,
        }
    }
}

impl RuntimeConfig {
    pub fn with_battle(mut self, battle: BattleConfig) -> Self {
        self.battle = battle;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BATTLE_TICK_MS` - Worker tick interval in milliseconds (default: 16)
    /// - `BATTLE_COMMAND_BUFFER` - Command queue size (default: 32)
    /// - `BATTLE_EVENT_BUFFER` - Per-topic event capacity (default: 100)
    /// - `BATTLE_SEED` - Fixed session seed (default: random)
    pub fn from_env() -> Self {
        Self::default().apply_overrides(|key| env::var(key).ok())
    }

    fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(ms) = parse::<u64>(lookup("BATTLE_TICK_MS")) {
            self.tick_interval = Duration::from_millis(ms.max(1));
        }
        if let Some(size) = parse::<usize>(lookup("BATTLE_COMMAND_BUFFER")) {
            self.command_buffer_size = size.max(1);
        }
        if let Some(size) = parse::<usize>(lookup("BATTLE_EVENT_BUFFER")) {
            self.event_buffer_size = size.max(1);
        }
        if let Some(seed) = parse::<u64>(lookup("BATTLE_SEED")) {
            self.seed = Some(seed);
        }

        self
    }
}

fn parse<T>(value: Option<String>) -> Option<T>
where
    T: std::str::FromStr,
{
    value?.trim().parse().ok()
}
