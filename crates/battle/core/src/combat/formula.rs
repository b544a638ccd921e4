//! Damage and heal formulas.

use crate::config::BattleConfig;
use crate::state::Stance;

/// Chain bonus for the action at batch position `position` (0-indexed).
///
/// ```text
/// chain_multiplier(k) = 1 + step × k
/// ```
pub fn chain_multiplier(position: usize, step: f64) -> f64 {
    1.0 + step * position as f64
}

/// Inputs to a single damage roll besides the ability's power.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageModifiers {
    pub stance_multiplier: f64,
    pub attack_buff: bool,
    pub defense_down: bool,
    pub chain_position: usize,
}

/// Calculate damage for one action.
///
/// # Formula
///
/// ```text
/// damage = floor(power × stance × buff × defense_down × chain)
///
/// buff         = attack_buff_multiplier if the caster's attack buff is active, else 1
/// defense_down = defense_down_multiplier if the enemy's defense is down, else 1
/// chain        = chain_multiplier(position)
/// ```
///
/// Intermediate math is floating point; only the final value is floored.
pub fn calculate_damage(power: u32, modifiers: DamageModifiers, config: &BattleConfig) -> u32 {
    let buff = if modifiers.attack_buff {
        config.attack_buff_multiplier
    } else {
        1.0
    };
    let exposed = if modifiers.defense_down {
        config.defense_down_multiplier
    } else {
        1.0
    };
    let chain = chain_multiplier(modifiers.chain_position, config.chain_step);

    let raw = f64::from(power) * modifiers.stance_multiplier * buff * exposed * chain;
    to_amount(raw)
}

/// Calculate the heal applied to each living party member.
///
/// ```text
/// heal = floor(power × heal_multiplier(stance))
/// ```
pub fn calculate_heal(power: u32, stance: Stance, config: &BattleConfig) -> u32 {
    to_amount(f64::from(power) * stance.heal_multiplier(config))
}

fn to_amount(raw: f64) -> u32 {
    if raw.is_finite() && raw > 0.0 {
        raw.floor().min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modifiers(stance_multiplier: f64, chain_position: usize) -> DamageModifiers {
        DamageModifiers {
            stance_multiplier,
            attack_buff: false,
            defense_down: false,
            chain_position,
        }
    }

    #[test]
    fn chain_multiplier_is_linear() {
        for k in 0..10 {
            assert_eq!(chain_multiplier(k, 0.1), 1.0 + 0.1 * k as f64);
        }
        assert_eq!(chain_multiplier(0, 0.1), 1.0);
    }

    #[test]
    fn full_charge_attack_chain() {
        let config = BattleConfig::default();
        let stance = Stance::Attack.damage_multiplier(2.0, &config);
        assert_eq!(calculate_damage(50, modifiers(stance, 0), &config), 125);
        assert_eq!(calculate_damage(50, modifiers(stance, 1), &config), 137);
    }

    #[test]
    fn buff_and_debuff_stack() {
        let config = BattleConfig::default();
        let damage = calculate_damage(
            100,
            DamageModifiers {
                stance_multiplier: 1.0,
                attack_buff: true,
                defense_down: true,
                chain_position: 0,
            },
            &config,
        );
        assert_eq!(damage, 225);
    }

    #[test]
    fn defense_stance_damage_and_heal() {
        let config = BattleConfig::default();
        let stance = Stance::Defense.damage_multiplier(2.0, &config);
        assert_eq!(calculate_damage(50, modifiers(stance, 0), &config), 30);
        assert_eq!(calculate_heal(50, Stance::Defense, &config), 75);
        assert_eq!(calculate_heal(50, Stance::Attack, &config), 50);
    }
}
