use std::time::Duration;

use crate::config::BattleConfig;
use crate::rng::BattleRng;

use super::{Verdict, consume_pre_delay};

/// A point on the slider path: at `at` progress the target sits at `position`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Checkpoint {
    pub at: f64,
    pub position: f64,
}

/// Hold an engaged pointer on a moving path.
///
/// Inside the unsafe band `[band_start, success_at)` the pointer must stay
/// engaged and within `tolerance` of the path. Reaching `success_at` while in
/// sync is a `Perfect`; reaching 100 otherwise is `Expired`.
#[derive(Clone, Debug, PartialEq)]
pub struct SliderChallenge {
    path: Vec<Checkpoint>,
    progress: f64,
    pre_delay: Duration,
    rate_per_sec: f64,
    band_start: f64,
    success_at: f64,
    tolerance: f64,
    engaged: bool,
    pointer: f64,
    verdict: Option<Verdict>,
}

impl SliderChallenge {
    /// Creates a challenge over `path`. Checkpoints are sorted by progress.
    pub fn with_path(mut path: Vec<Checkpoint>, config: &BattleConfig) -> Self {
        path.sort_by(|a, b| a.at.total_cmp(&b.at));
        Self {
            path,
            progress: 0.0,
            pre_delay: config.slider_pre_delay(),
            rate_per_sec: config.slider_rate_per_sec,
            band_start: config.slider_band_start,
            success_at: config.slider_success_at,
            tolerance: config.slider_sync_tolerance,
            engaged: false,
            pointer: 0.0,
            verdict: None,
        }
    }

    /// Random path through evenly spaced checkpoints, starting at the centre.
    pub fn random(rng: &mut impl BattleRng, config: &BattleConfig) -> Self {
        let count = config.slider_checkpoints.max(2);
        let step = BattleConfig::REACTION_PROGRESS_MAX / (count - 1) as f64;
        let path = (0..count)
            .map(|i| Checkpoint {
                at: step * i as f64,
                position: if i == 0 { 0.5 } else { rng.range_f64(0.1, 0.9) },
            })
            .collect();
        Self::with_path(path, config)
    }

    pub fn path(&self) -> &[Checkpoint] {
        &self.path
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn pre_delay_remaining(&self) -> Duration {
        self.pre_delay
    }

    pub fn engaged(&self) -> bool {
        self.engaged
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.verdict
    }

    pub fn in_band(&self) -> bool {
        self.progress >= self.band_start && self.progress < self.success_at
    }

    /// Target position at `progress`, linearly interpolated between checkpoints.
    pub fn path_position(&self, progress: f64) -> f64 {
        interpolate(&self.path, progress)
    }

    fn in_sync(&self) -> bool {
        self.in_sync_at(self.progress)
    }

    fn in_sync_at(&self, progress: f64) -> bool {
        self.engaged && (self.pointer - self.path_position(progress)).abs() <= self.tolerance
    }

    /// First point of `[from, to]` inside the band where the pointer is out of sync.
    ///
    /// The pointer is fixed for the step and the path is linear between
    /// checkpoints, so sampling at every checkpoint inside the clipped range
    /// brackets the first desync. The crossing is solved on that segment.
    fn first_desync(&self, from: f64, to: f64) -> Option<f64> {
        let lo = from.max(self.band_start);
        let hi = to.min(self.success_at);
        if lo > hi || lo >= self.success_at {
            return None;
        }
        if !self.in_sync_at(lo) {
            return Some(lo);
        }

        let samples = self
            .path
            .iter()
            .map(|checkpoint| checkpoint.at)
            .filter(|&at| at > lo && at < hi)
            .chain(std::iter::once(hi));
        let mut prev = lo;
        for at in samples {
            if !self.in_sync_at(at) {
                return Some(self.crossing(prev, at));
            }
            prev = at;
        }
        None
    }

    /// Progress in `(synced, broken]` where the path leaves the tolerance band.
    fn crossing(&self, synced: f64, broken: f64) -> f64 {
        let start = self.path_position(synced);
        let end = self.path_position(broken);
        let edge = if end > self.pointer {
            self.pointer + self.tolerance
        } else {
            self.pointer - self.tolerance
        };
        let t = ((edge - start) / (end - start)).clamp(0.0, 1.0);
        synced + (broken - synced) * t
    }

    pub(super) fn advance(&mut self, dt: Duration) -> Option<Verdict> {
        let dt = consume_pre_delay(&mut self.pre_delay, dt);
        if dt.is_zero() {
            return None;
        }
        let from = self.progress;
        let to = (from + self.rate_per_sec * dt.as_secs_f64())
            .min(BattleConfig::REACTION_PROGRESS_MAX);

        let verdict = if let Some(at) = self.first_desync(from, to) {
            self.progress = at;
            Verdict::Broken
        } else {
            self.progress = to;
            if to >= self.success_at
                && (self.in_sync_at(from.max(self.success_at)) || self.in_sync_at(to))
            {
                Verdict::Perfect
            } else if to >= BattleConfig::REACTION_PROGRESS_MAX {
                Verdict::Expired
            } else {
                return None;
            }
        };
        self.verdict = Some(verdict);
        Some(verdict)
    }

    pub(super) fn hold(&mut self, position: f64) -> Option<Verdict> {
        self.engaged = true;
        self.pointer = position.clamp(0.0, 1.0);
        self.evaluate()
    }

    pub(super) fn release(&mut self) -> Option<Verdict> {
        self.engaged = false;
        self.evaluate()
    }

    fn evaluate(&mut self) -> Option<Verdict> {
        let verdict = if self.progress >= self.success_at && self.in_sync() {
            Verdict::Perfect
        } else if self.progress >= BattleConfig::REACTION_PROGRESS_MAX {
            Verdict::Expired
        } else if self.in_band() && !self.in_sync() {
            Verdict::Broken
        } else {
            return None;
        };
        self.verdict = Some(verdict);
        Some(verdict)
    }
}

/// Position along a sorted checkpoint path. Empty paths sit at the centre.
pub(crate) fn interpolate(path: &[Checkpoint], progress: f64) -> f64 {
    let Some(first) = path.first() else {
        return 0.5;
    };
    if progress <= first.at {
        return first.position;
    }
    for pair in path.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if progress <= b.at {
            let span = b.at - a.at;
            if span <= f64::EPSILON {
                return b.position;
            }
            let t = (progress - a.at) / span;
            return a.position + (b.position - a.position) * t;
        }
    }
    path.last().map_or(0.5, |last| last.position)
}
