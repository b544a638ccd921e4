use std::time::Duration;

/// How a raid session decides that the boss has fallen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VictoryPolicy {
    /// Local HP reaching zero after a commit ends the battle immediately.
    Optimistic,
    /// Local HP reaching zero is provisional until the shared ledger confirms it.
    #[default]
    Authoritative,
}

/// Battle tuning constants.
///
/// Every number the rules depend on lives here so content tables (TOML) can
/// override them without touching code. Delays are stored in milliseconds and
/// rates in units per second.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    // ===== turn queue =====
    /// Number of entries generated per queue block.
    pub queue_length: usize,
    /// Probability that a generated entry is an enemy turn.
    pub enemy_turn_weight: f64,

    // ===== phase timing =====
    /// Telegraph delay between the enemy winding up and striking.
    pub windup_ms: u64,
    /// Pause after a strike resolves before the next turn starts.
    pub advance_delay_ms: u64,
    /// Pause after a committed batch before the next turn starts.
    /// Further commits are ignored while it runs.
    pub commit_settle_ms: u64,
    /// How long a raid session waits for the ledger to confirm a local kill.
    pub confirmation_timeout_ms: u64,

    // ===== resources =====
    pub ap_regen_per_turn: u32,
    /// Turns that buff/debuff counters last once applied.
    pub status_duration: u8,

    // ===== attack stance charge =====
    pub charge_start: f64,
    pub charge_rate_per_sec: f64,
    pub charge_max: f64,

    // ===== multipliers =====
    pub attack_stance_factor: f64,
    pub defense_stance_multiplier: f64,
    pub defense_heal_multiplier: f64,
    pub chain_step: f64,
    pub attack_buff_multiplier: f64,
    pub defense_down_multiplier: f64,

    // ===== enemy strike =====
    /// Flat damage dealt to the strike target when the reaction fails.
    /// Independent of enemy stats.
    pub strike_fail_damage: u32,

    // ===== reaction minigame =====
    pub sigil_pre_delay_ms: u64,
    pub sigil_rate_per_sec: f64,
    pub slider_pre_delay_ms: u64,
    pub slider_rate_per_sec: f64,
    /// Progress at which the slider's unsafe band starts.
    pub slider_band_start: f64,
    /// Progress at which an engaged slider succeeds. Also the end of the band.
    pub slider_success_at: f64,
    /// Maximum pointer distance from the path before sync is lost.
    pub slider_sync_tolerance: f64,
    pub slider_checkpoints: usize,

    // ===== raid =====
    pub victory_policy: VictoryPolicy,

    // ===== presentation =====
    pub log_capacity: usize,
}

impl BattleConfig {
    pub const DEFAULT_QUEUE_LENGTH: usize = 50;
    pub const DEFAULT_ENEMY_TURN_WEIGHT: f64 = 0.4;
    pub const DEFAULT_WINDUP_MS: u64 = 1_500;
    pub const DEFAULT_ADVANCE_DELAY_MS: u64 = 1_800;
    pub const DEFAULT_COMMIT_SETTLE_MS: u64 = 300;
    pub const DEFAULT_CONFIRMATION_TIMEOUT_MS: u64 = 5_000;
    pub const DEFAULT_STRIKE_FAIL_DAMAGE: u32 = 800;

    /// Progress value at which every reaction challenge expires.
    pub const REACTION_PROGRESS_MAX: f64 = 100.0;

    pub fn new() -> Self {
        Self {
            queue_length: Self::DEFAULT_QUEUE_LENGTH,
            enemy_turn_weight: Self::DEFAULT_ENEMY_TURN_WEIGHT,
            windup_ms: Self::DEFAULT_WINDUP_MS,
            advance_delay_ms: Self::DEFAULT_ADVANCE_DELAY_MS,
            commit_settle_ms: Self::DEFAULT_COMMIT_SETTLE_MS,
            confirmation_timeout_ms: Self::DEFAULT_CONFIRMATION_TIMEOUT_MS,
            ap_regen_per_turn: 1,
            status_duration: 2,
            charge_start: 1.0,
            charge_rate_per_sec: 0.8,
            charge_max: 2.0,
            attack_stance_factor: 1.25,
            defense_stance_multiplier: 0.6,
            defense_heal_multiplier: 1.5,
            chain_step: 0.1,
            attack_buff_multiplier: 1.5,
            defense_down_multiplier: 1.5,
            strike_fail_damage: Self::DEFAULT_STRIKE_FAIL_DAMAGE,
            sigil_pre_delay_ms: 500,
            sigil_rate_per_sec: 50.0,
            slider_pre_delay_ms: 1_200,
            slider_rate_per_sec: 35.0,
            slider_band_start: 2.0,
            slider_success_at: 95.0,
            slider_sync_tolerance: 0.15,
            slider_checkpoints: 5,
            victory_policy: VictoryPolicy::default(),
            log_capacity: 32,
        }
    }

    pub fn windup(&self) -> Duration {
        Duration::from_millis(self.windup_ms)
    }

    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }

    pub fn commit_settle(&self) -> Duration {
        Duration::from_millis(self.commit_settle_ms)
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_millis(self.confirmation_timeout_ms)
    }

    pub fn sigil_pre_delay(&self) -> Duration {
        Duration::from_millis(self.sigil_pre_delay_ms)
    }

    pub fn slider_pre_delay(&self) -> Duration {
        Duration::from_millis(self.slider_pre_delay_ms)
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
