//! Timed reaction minigame resolving enemy strikes.
//!
//! A challenge runs in one of two modes:
//! - [`SigilChallenge`]: match one of three symbols once while the window is open
//! - [`SliderChallenge`]: hold an engaged pointer on a moving path through the
//!   unsafe band
//!
//! Both advance from wall-clock deltas passed to [`ReactionMinigame::advance`].
//! A challenge resolves exactly once; later input and time are ignored.

mod sigil;
mod slider;

pub use sigil::{Sigil, SigilChallenge};
pub use slider::{Checkpoint, SliderChallenge};

use std::time::Duration;

use crate::config::BattleConfig;
use crate::rng::BattleRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReactionMode {
    Sigil,
    Slider,
}

/// Player input during an enemy strike.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParryInput {
    /// Sigil mode: the symbol the player traced.
    Sigil(Sigil),
    /// Slider mode: pointer engaged at `position` (0.0 to 1.0 across the lane).
    Hold { position: f64 },
    /// Slider mode: pointer released.
    Release,
}

/// How a challenge ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// Sigil matched inside the window.
    Parried,
    /// Slider carried through the band while engaged.
    Perfect,
    /// Wrong sigil.
    Mismatch,
    /// Slider released or out of sync inside the band.
    Broken,
    /// Progress reached the end without success.
    Expired,
}

impl Verdict {
    pub fn is_success(self) -> bool {
        matches!(self, Verdict::Parried | Verdict::Perfect)
    }
}

/// Target pattern shown to the player.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParryPattern {
    Sigil(Sigil),
    Path(Vec<Checkpoint>),
}

impl ParryPattern {
    /// Where the slider target sits at `progress`. `None` for sigils.
    pub fn position_at(&self, progress: f64) -> Option<f64> {
        match self {
            ParryPattern::Sigil(_) => None,
            ParryPattern::Path(path) => Some(slider::interpolate(path, progress)),
        }
    }
}

/// Presentation state of the running (or just resolved) challenge.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParryVisual {
    pub mode: ReactionMode,
    pub pattern: ParryPattern,
    pub progress: f64,
    pub pre_delay_remaining_ms: u64,
    pub window_active: bool,
    pub engaged: bool,
    pub verdict: Option<Verdict>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ReactionChallenge {
    Sigil(SigilChallenge),
    Slider(SliderChallenge),
}

/// One enemy strike's reaction challenge.
#[derive(Clone, Debug, PartialEq)]
pub struct ReactionMinigame {
    challenge: ReactionChallenge,
}

impl ReactionMinigame {
    /// Starts a challenge, picking the mode uniformly at random.
    pub fn start(rng: &mut impl BattleRng, config: &BattleConfig) -> Self {
        let challenge = if rng.below(2) == 0 {
            ReactionChallenge::Sigil(SigilChallenge::random(rng, config))
        } else {
            ReactionChallenge::Slider(SliderChallenge::random(rng, config))
        };
        Self { challenge }
    }

    pub fn from_challenge(challenge: ReactionChallenge) -> Self {
        Self { challenge }
    }

    pub fn mode(&self) -> ReactionMode {
        match self.challenge {
            ReactionChallenge::Sigil(_) => ReactionMode::Sigil,
            ReactionChallenge::Slider(_) => ReactionMode::Slider,
        }
    }

    pub fn challenge(&self) -> &ReactionChallenge {
        &self.challenge
    }

    pub fn verdict(&self) -> Option<Verdict> {
        match &self.challenge {
            ReactionChallenge::Sigil(c) => c.verdict(),
            ReactionChallenge::Slider(c) => c.verdict(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.verdict().is_some()
    }

    /// Advances by `dt`. Returns the verdict if this step resolved the challenge.
    pub fn advance(&mut self, dt: Duration) -> Option<Verdict> {
        if self.is_resolved() {
            return None;
        }
        match &mut self.challenge {
            ReactionChallenge::Sigil(c) => c.advance(dt),
            ReactionChallenge::Slider(c) => c.advance(dt),
        }
    }

    /// Feeds player input. Returns the verdict if this input resolved the challenge.
    pub fn submit(&mut self, input: ParryInput) -> Option<Verdict> {
        if self.is_resolved() {
            return None;
        }
        match (&mut self.challenge, input) {
            (ReactionChallenge::Sigil(c), ParryInput::Sigil(sigil)) => c.submit(sigil),
            (ReactionChallenge::Slider(c), ParryInput::Hold { position }) => c.hold(position),
            (ReactionChallenge::Slider(c), ParryInput::Release) => c.release(),
            _ => None,
        }
    }

    pub fn visual(&self) -> ParryVisual {
        match &self.challenge {
            ReactionChallenge::Sigil(c) => ParryVisual {
                mode: ReactionMode::Sigil,
                pattern: ParryPattern::Sigil(c.target()),
                progress: c.progress(),
                pre_delay_remaining_ms: c.pre_delay_remaining().as_millis() as u64,
                window_active: c.window_active(),
                engaged: false,
                verdict: c.verdict(),
            },
            ReactionChallenge::Slider(c) => ParryVisual {
                mode: ReactionMode::Slider,
                pattern: ParryPattern::Path(c.path().to_vec()),
                progress: c.progress(),
                pre_delay_remaining_ms: c.pre_delay_remaining().as_millis() as u64,
                window_active: c.in_band(),
                engaged: c.engaged(),
                verdict: c.verdict(),
            },
        }
    }
}

/// Consumes pre-delay from `dt`, returning the part of `dt` left for progress.
pub(crate) fn consume_pre_delay(pre_delay: &mut Duration, dt: Duration) -> Duration {
    let used = (*pre_delay).min(dt);
    *pre_delay -= used;
    dt - used
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::PcgRng;

    #[test]
    fn mode_selection_uses_both_modes() {
        let config = BattleConfig::default();
        let mut rng = PcgRng::new(11);
        let modes: Vec<ReactionMode> = (0..32)
            .map(|_| ReactionMinigame::start(&mut rng, &config).mode())
            .collect();
        assert!(modes.contains(&ReactionMode::Sigil));
        assert!(modes.contains(&ReactionMode::Slider));
    }

    #[test]
    fn resolved_challenge_ignores_further_input() {
        let config = BattleConfig::default();
        let mut game = ReactionMinigame::from_challenge(ReactionChallenge::Sigil(
            SigilChallenge::new(Sigil::Flame, &config),
        ));
        game.advance(config.sigil_pre_delay());
        assert_eq!(game.submit(ParryInput::Sigil(Sigil::Frost)), Some(Verdict::Mismatch));
        assert_eq!(game.submit(ParryInput::Sigil(Sigil::Flame)), None);
        assert_eq!(game.advance(Duration::from_secs(10)), None);
        assert_eq!(game.verdict(), Some(Verdict::Mismatch));
    }

    #[test]
    fn wrong_input_kind_is_ignored() {
        let config = BattleConfig::default();
        let mut game = ReactionMinigame::from_challenge(ReactionChallenge::Sigil(
            SigilChallenge::new(Sigil::Storm, &config),
        ));
        game.advance(config.sigil_pre_delay());
        assert_eq!(game.submit(ParryInput::Release), None);
        assert!(!game.is_resolved());
    }

    #[test]
    fn verdict_labels() {
        assert_eq!(Verdict::Broken.to_string(), "BROKEN");
        assert_eq!(Verdict::Perfect.to_string(), "PERFECT");
        assert_eq!(Verdict::Expired.to_string(), "EXPIRED");
    }

    #[test]
    fn path_pattern_reports_target_position() {
        let pattern = ParryPattern::Path(vec![
            Checkpoint { at: 0.0, position: 0.5 },
            Checkpoint { at: 50.0, position: 0.9 },
        ]);
        assert_eq!(pattern.position_at(0.0), Some(0.5));
        assert!((pattern.position_at(25.0).unwrap() - 0.7).abs() < 1e-9);
        assert_eq!(pattern.position_at(80.0), Some(0.9));
        assert_eq!(ParryPattern::Sigil(Sigil::Storm).position_at(10.0), None);
    }
}
