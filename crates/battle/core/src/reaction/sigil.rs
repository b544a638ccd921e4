use std::time::Duration;

use crate::config::BattleConfig;
use crate::rng::BattleRng;

use super::{Verdict, consume_pre_delay};

/// The three symbols a sigil challenge can ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sigil {
    Flame,
    Frost,
    Storm,
}

impl Sigil {
    pub const ALL: [Sigil; 3] = [Sigil::Flame, Sigil::Frost, Sigil::Storm];
}

/// Match the target symbol once while the window is open.
///
/// The window opens when the pre-delay has elapsed and closes when progress
/// reaches 100. Input outside the window is ignored.
#[derive(Clone, Debug, PartialEq)]
pub struct SigilChallenge {
    target: Sigil,
    progress: f64,
    pre_delay: Duration,
    rate_per_sec: f64,
    verdict: Option<Verdict>,
}

impl SigilChallenge {
    pub fn new(target: Sigil, config: &BattleConfig) -> Self {
        Self {
            target,
            progress: 0.0,
            pre_delay: config.sigil_pre_delay(),
            rate_per_sec: config.sigil_rate_per_sec,
            verdict: None,
        }
    }

    pub fn random(rng: &mut impl BattleRng, config: &BattleConfig) -> Self {
        Self::new(Sigil::ALL[rng.below(Sigil::ALL.len())], config)
    }

    pub fn target(&self) -> Sigil {
        self.target
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn pre_delay_remaining(&self) -> Duration {
        self.pre_delay
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.verdict
    }

    pub fn window_active(&self) -> bool {
        self.verdict.is_none()
            && self.pre_delay.is_zero()
            && self.progress < BattleConfig::REACTION_PROGRESS_MAX
    }

    pub(super) fn advance(&mut self, dt: Duration) -> Option<Verdict> {
        let dt = consume_pre_delay(&mut self.pre_delay, dt);
        if dt.is_zero() {
            return None;
        }

        self.progress = (self.progress + self.rate_per_sec * dt.as_secs_f64())
            .min(BattleConfig::REACTION_PROGRESS_MAX);

        if self.progress >= BattleConfig::REACTION_PROGRESS_MAX {
            return self.resolve(Verdict::Expired);
        }
        None
    }

    pub(super) fn submit(&mut self, sigil: Sigil) -> Option<Verdict> {
        if !self.window_active() {
            return None;
        }
        if sigil == self.target {
            self.resolve(Verdict::Parried)
        } else {
            self.resolve(Verdict::Mismatch)
        }
    }

    fn resolve(&mut self, verdict: Verdict) -> Option<Verdict> {
        self.verdict = Some(verdict);
        Some(verdict)
    }
}
