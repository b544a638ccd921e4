//! Scripted player that drives a battle through the handle.
//!
//! Polls snapshots and reacts like a reasonably careful human: it lets the
//! attack charge fill before committing, heals when the party is hurt, and
//! answers enemy strikes with a configurable success rate.

use anyhow::Result;
use tracing::debug;

use battle_core::{
    Ability, Actor, BattleConfig, BattleSnapshot, EffectType, ParryInput, ParryPattern, Phase,
    Sigil, Stance,
};
use battle_runtime::BattleHandle;

use crate::config::AutoplayConfig;

pub struct AutoPlayer {
    handle: BattleHandle,
    config: AutoplayConfig,
    charge_target: f64,
    planned_turn: Option<usize>,
    /// Turn index of the strike being answered and whether to answer it well.
    strike_plan: Option<(usize, bool)>,
    seen_log: Vec<String>,
}

impl AutoPlayer {
    pub fn new(handle: BattleHandle, config: AutoplayConfig, battle: &BattleConfig) -> Self {
        Self {
            handle,
            config,
            charge_target: battle.charge_max,
            planned_turn: None,
            strike_plan: None,
            seen_log: Vec::new(),
        }
    }

    /// Plays until the battle ends and returns the final phase.
    pub async fn run(mut self) -> Result<Phase> {
        let mut ticker = tokio::time::interval(self.config.poll_interval);

        loop {
            ticker.tick().await;
            let snapshot = self.handle.snapshot().await?;
            self.print_new_log_lines(&snapshot);

            match snapshot.phase {
                Phase::Victory | Phase::Defeat => {
                    self.handle.acknowledge().await?;
                    return Ok(snapshot.phase);
                }
                Phase::Active if !snapshot.victory_provisional => self.play_turn(&snapshot).await?,
                Phase::EnemyStrike => self.react(&snapshot).await?,
                _ => {}
            }

            anyhow::ensure!(
                snapshot.turn_index < self.config.max_turns,
                "battle did not finish within {} turns",
                self.config.max_turns
            );
        }
    }

    async fn play_turn(&mut self, snapshot: &BattleSnapshot) -> Result<()> {
        if self.planned_turn == Some(snapshot.turn_index) {
            return Ok(());
        }

        let hurt = snapshot.party.iter().any(|member| {
            member.is_alive()
                && f64::from(member.hp().current())
                    < f64::from(member.hp().maximum()) * self.config.heal_threshold
        });
        let desired = if hurt { Stance::Defense } else { Stance::Attack };
        if snapshot.stance != desired {
            tolerate(self.handle.toggle_stance().await)?;
            return Ok(());
        }
        if desired == Stance::Attack && snapshot.charge_level < self.charge_target {
            return Ok(());
        }

        for member in snapshot.party.iter().filter(|member| member.is_alive()) {
            for ability in choose_abilities(member, &snapshot.enemy, hurt) {
                // First select arms, second plans.
                for _ in 0..2 {
                    if tolerate(self.handle.select(member.id, ability.id.clone()).await)?
                        .is_none()
                    {
                        break;
                    }
                }
            }
        }

        self.planned_turn = Some(snapshot.turn_index);
        if let Some(outcome) = tolerate(self.handle.commit().await)? {
            debug!(
                damage = outcome.total_damage,
                healed = outcome.total_healed,
                "batch committed"
            );
        }
        Ok(())
    }

    async fn react(&mut self, snapshot: &BattleSnapshot) -> Result<()> {
        let Some(parry) = &snapshot.parry else {
            return Ok(());
        };
        if parry.verdict.is_some() {
            return Ok(());
        }

        let skilled = match self.strike_plan {
            Some((turn, skilled)) if turn == snapshot.turn_index => skilled,
            _ => {
                let skilled = rand::random::<f64>() < self.config.parry_rate;
                self.strike_plan = Some((snapshot.turn_index, skilled));
                skilled
            }
        };

        let input = match &parry.pattern {
            ParryPattern::Sigil(target) => {
                if !parry.window_active {
                    return Ok(());
                }
                ParryInput::Sigil(if skilled { *target } else { wrong_sigil(*target) })
            }
            ParryPattern::Path(_) if !skilled => {
                // Let go halfway through the band.
                if parry.progress < 50.0 {
                    ParryInput::Hold { position: 0.5 }
                } else {
                    ParryInput::Release
                }
            }
            ParryPattern::Path(_) => {
                let position = parry.pattern.position_at(parry.progress).unwrap_or(0.5);
                ParryInput::Hold { position }
            }
        };

        if let Some(Some(verdict)) = tolerate(self.handle.submit_parry_input(input).await)? {
            debug!(%verdict, "strike answered");
        }
        Ok(())
    }

    fn print_new_log_lines(&mut self, snapshot: &BattleSnapshot) {
        let fresh = &snapshot.log;
        // Longest prefix of the new window that the old window already ends with.
        let overlap = (0..=fresh.len().min(self.seen_log.len()))
            .rev()
            .find(|&k| self.seen_log.ends_with(&fresh[..k]))
            .unwrap_or(0);
        for line in &fresh[overlap..] {
            println!("{line}");
        }
        self.seen_log = fresh.clone();
    }
}

/// Picks this turn's abilities in planning order, within the actor's AP.
///
/// Setup effects go first so the damage planned after them benefits.
fn choose_abilities(actor: &Actor, enemy: &Actor, hurt: bool) -> Vec<Ability> {
    let usable = |ability: &&Ability| actor.cooldown_remaining(&ability.id) == 0;
    let mut picks: Vec<Ability> = Vec::new();
    let mut ap = actor.ap().current();

    let take = |ability: &Ability, ap: &mut u32, picks: &mut Vec<Ability>| {
        if ability.ap_cost <= *ap {
            *ap -= ability.ap_cost;
            picks.push(ability.clone());
        }
    };

    if hurt {
        if let Some(heal) = actor
            .abilities
            .iter()
            .filter(usable)
            .find(|a| a.effect == EffectType::Heal)
        {
            take(heal, &mut ap, &mut picks);
        }
    }
    if !actor.status.attack_buff_active() {
        if let Some(buff) = actor
            .abilities
            .iter()
            .filter(usable)
            .find(|a| a.effect == EffectType::Buff)
        {
            take(buff, &mut ap, &mut picks);
        }
    }
    if !enemy.status.defense_down_active() {
        if let Some(debuff) = actor
            .abilities
            .iter()
            .filter(usable)
            .find(|a| a.effect == EffectType::Debuff)
        {
            take(debuff, &mut ap, &mut picks);
        }
    }

    let mut damage: Vec<&Ability> = actor
        .abilities
        .iter()
        .filter(usable)
        .filter(|a| a.effect == EffectType::Damage)
        .collect();
    damage.sort_by_key(|a| std::cmp::Reverse(a.base_power));

    loop {
        let before = picks.len();
        for ability in &damage {
            let repeatable = ability.cooldown == 0 || !picks.iter().any(|p| p.id == ability.id);
            if repeatable {
                take(ability, &mut ap, &mut picks);
            }
        }
        if picks.len() == before {
            break;
        }
    }
    picks
}

fn wrong_sigil(target: Sigil) -> Sigil {
    match target {
        Sigil::Flame => Sigil::Frost,
        Sigil::Frost => Sigil::Storm,
        Sigil::Storm => Sigil::Flame,
    }
}

/// Treats rejected commands as no-ops. Anything else is a real failure.
fn tolerate<T>(result: battle_runtime::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_rejection() => {
            debug!(error = %err, "command rejected");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{ActorId, Element};

    fn ability(id: &str, effect: EffectType, cost: u32, power: u32, cooldown: u8) -> Ability {
        Ability {
            id: id.into(),
            name: id.into(),
            description: String::new(),
            ap_cost: cost,
            base_power: power,
            effect,
            element: Element::Physical,
            cooldown,
            rank: 1,
        }
    }

    fn actor(ap: u32) -> Actor {
        let mut actor = Actor::player(ActorId::PLAYER, "Hero", 100, 5).with_abilities(vec![
            ability("basic_attack", EffectType::Damage, 1, 40, 0),
            ability("fireball", EffectType::Damage, 2, 110, 2),
            ability("war_cry", EffectType::Buff, 1, 0, 3),
            ability("mend", EffectType::Heal, 2, 180, 1),
        ]);
        actor.spend_ap(5 - ap);
        actor
    }

    fn ids(picks: &[Ability]) -> Vec<&str> {
        picks.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn buffs_before_damage_and_spends_all_ap() {
        let enemy = Actor::enemy("Boss", 100, 100);
        let picks = choose_abilities(&actor(5), &enemy, false);
        assert_eq!(ids(&picks), vec!["war_cry", "fireball", "basic_attack", "basic_attack"]);
    }

    #[test]
    fn heals_first_when_hurt() {
        let enemy = Actor::enemy("Boss", 100, 100);
        let picks = choose_abilities(&actor(3), &enemy, true);
        assert_eq!(ids(&picks), vec!["mend", "war_cry"]);
    }

    #[test]
    fn wrong_sigil_never_matches() {
        for sigil in [Sigil::Flame, Sigil::Frost, Sigil::Storm] {
            assert_ne!(wrong_sigil(sigil), sigil);
        }
    }
}
