//! Batch resolution.

use crate::config::BattleConfig;
use crate::planner::PlannedAction;
use crate::state::{Actor, ActorId, EffectType, Stance};

use super::formula::{DamageModifiers, calculate_damage, calculate_heal};
use super::result::{ActionOutcome, BatchOutcome, EffectOutcome};

/// Errors that abort a batch. The caller discards its working copy.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("planned action references unknown actor {0}")]
    UnknownActor(ActorId),
}

/// Battle-wide inputs frozen at the moment of commit.
#[derive(Clone, Copy, Debug)]
pub struct ResolveContext<'a> {
    pub stance: Stance,
    pub charge_level: f64,
    pub config: &'a BattleConfig,
}

impl ResolveContext<'_> {
    fn stance_multiplier(&self) -> f64 {
        self.stance.damage_multiplier(self.charge_level, self.config)
    }
}

/// Applies `plan` in order to `party` and `enemy`.
///
/// Each action at position `k` sees the state left by actions `0..k`, so a
/// debuff planned first boosts the damage planned after it. On error the
/// inputs may be partially modified; callers resolve against copies.
pub fn resolve_batch(
    party: &mut [Actor],
    enemy: &mut Actor,
    plan: &[PlannedAction],
    ctx: ResolveContext<'_>,
) -> Result<BatchOutcome, ResolveError> {
    let mut outcome = BatchOutcome::default();

    for (position, action) in plan.iter().enumerate() {
        let caster_index = party
            .iter()
            .position(|actor| actor.id == action.actor)
            .ok_or(ResolveError::UnknownActor(action.actor))?;

        let power = action.ability.base_power;
        let effect = match action.ability.effect {
            EffectType::Damage => {
                let modifiers = DamageModifiers {
                    stance_multiplier: ctx.stance_multiplier(),
                    attack_buff: party[caster_index].status.attack_buff_active(),
                    defense_down: enemy.status.defense_down_active(),
                    chain_position: position,
                };
                let amount = calculate_damage(power, modifiers, ctx.config);
                let dealt = enemy.take_damage(amount);
                outcome.total_damage += dealt;
                EffectOutcome::Damage {
                    amount,
                    enemy_hp: enemy.hp().current(),
                }
            }
            EffectType::Heal => {
                let per_member = calculate_heal(power, ctx.stance, ctx.config);
                let healed: Vec<(ActorId, u32)> = party
                    .iter_mut()
                    .filter(|member| member.is_alive())
                    .map(|member| (member.id, member.heal(per_member)))
                    .collect();
                outcome.total_healed += healed.iter().map(|(_, gained)| gained).sum::<u32>();
                EffectOutcome::Heal { per_member, healed }
            }
            EffectType::Buff => {
                party[caster_index].status.attack_buff = ctx.config.status_duration;
                EffectOutcome::Buff {
                    turns: ctx.config.status_duration,
                }
            }
            EffectType::Debuff => {
                enemy.status.defense_down = ctx.config.status_duration;
                EffectOutcome::Debuff {
                    turns: ctx.config.status_duration,
                }
            }
        };

        party[caster_index].start_cooldown(&action.ability);

        outcome.actions.push(ActionOutcome {
            position,
            actor: action.actor,
            ability: action.ability.id.clone(),
            ability_name: action.ability.name.clone(),
            effect,
        });
    }

    outcome.enemy_hp = enemy.hp().current();
    Ok(outcome)
}

/// Applies an enemy strike outcome to its target and returns the HP lost.
///
/// A successful reaction negates the strike entirely; a failed one deals the
/// flat `strike_fail_damage`.
pub fn apply_strike(target: &mut Actor, reaction_succeeded: bool, config: &BattleConfig) -> u32 {
    if reaction_succeeded {
        0
    } else {
        target.take_damage(config.strike_fail_damage)
    }
}
