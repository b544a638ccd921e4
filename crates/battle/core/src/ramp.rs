use std::time::Duration;

use crate::config::BattleConfig;

/// Attack-stance charge level.
///
/// Rises linearly with elapsed Active-phase time and saturates at the
/// configured maximum. The level is recomputed from total elapsed time rather
/// than accumulated per frame, so uneven frame deltas land on the same value.
#[derive(Clone, Debug, PartialEq)]
pub struct ChargeRamp {
    elapsed: Duration,
    start: f64,
    rate_per_sec: f64,
    max: f64,
}

impl ChargeRamp {
    pub fn new(start: f64, rate_per_sec: f64, max: f64) -> Self {
        Self {
            elapsed: Duration::ZERO,
            start,
            rate_per_sec,
            max,
        }
    }

    pub fn from_config(config: &BattleConfig) -> Self {
        Self::new(
            config.charge_start,
            config.charge_rate_per_sec,
            config.charge_max,
        )
    }

    pub fn advance(&mut self, dt: Duration) {
        if self.is_full() {
            return;
        }
        self.elapsed += dt;
    }

    pub fn level(&self) -> f64 {
        (self.start + self.rate_per_sec * self.elapsed.as_secs_f64()).min(self.max)
    }

    pub fn is_full(&self) -> bool {
        self.level() >= self.max
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}
