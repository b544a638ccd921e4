use crate::config::BattleConfig;

/// Combat posture selected by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stance {
    /// Damage scales with the charge ramp.
    #[default]
    Attack,
    /// Flat reduced damage, boosted healing.
    Defense,
}

impl Stance {
    pub fn toggled(self) -> Self {
        match self {
            Stance::Attack => Stance::Defense,
            Stance::Defense => Stance::Attack,
        }
    }

    /// Damage multiplier for the given charge level.
    ///
    /// Attack stance: `attack_stance_factor × charge_level`.
    /// Defense stance: fixed `defense_stance_multiplier`, charge is ignored.
    pub fn damage_multiplier(self, charge_level: f64, config: &BattleConfig) -> f64 {
        match self {
            Stance::Attack => config.attack_stance_factor * charge_level,
            Stance::Defense => config.defense_stance_multiplier,
        }
    }

    pub fn heal_multiplier(self, config: &BattleConfig) -> f64 {
        match self {
            Stance::Attack => 1.0,
            Stance::Defense => config.defense_heal_multiplier,
        }
    }
}
