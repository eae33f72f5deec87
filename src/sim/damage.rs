use crate::model::{DamageClass, Move};
use crate::sim::state::Battler;
use crate::sim::stats::StatsSet;
use crate::types::type_effectiveness;
use serde::Serialize;

pub const MIN_ROLL: f64 = 0.85;
pub const CRIT_MULTIPLIER: f64 = 1.5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageResult {
    pub min: u32,
    pub max: u32,
    pub average: u32,
    pub effectiveness: f64,
    pub is_stab: bool,
}

impl DamageResult {
    pub fn crit_max(&self) -> u32 {
        (self.max as f64 * CRIT_MULTIPLIER).floor() as u32
    }
}

/// Min and max rolls are floored independently; the average is the floored
/// mean of those two, not a 92.5% roll.
pub fn calculate_damage(
    attacker: &Battler,
    defender: &Battler,
    mv: &Move,
    attacker_stats: &StatsSet,
    defender_stats: &StatsSet,
) -> DamageResult {
    if mv.power == 0 {
        return DamageResult {
            effectiveness: 1.0,
            ..DamageResult::default()
        };
    }

    let (attack, defense) = match mv.damage_class {
        DamageClass::Physical => (attacker_stats.atk, defender_stats.def),
        _ => (attacker_stats.spa, defender_stats.spd),
    };
    let level_factor = ((2 * attacker.level) as f64 / 5.0 + 2.0).floor();
    let base = (level_factor * mv.power as f64 * attack as f64 / defense.max(1) as f64 / 50.0 + 2.0).floor();

    let is_stab = attacker
        .types
        .iter()
        .any(|t| t.eq_ignore_ascii_case(&mv.move_type));
    let stab = if is_stab { 1.5 } else { 1.0 };
    let effectiveness = type_effectiveness(&mv.move_type, &defender.types);

    let min = (base * stab * effectiveness * MIN_ROLL).floor() as u32;
    let max = (base * stab * effectiveness).floor() as u32;
    DamageResult {
        min,
        max,
        average: (min + max) / 2,
        effectiveness,
        is_stab,
    }
}

/// Player attacks take the min roll; opponent attacks take a max-roll crit.
pub fn calculate_worst_case_damage(
    attacker: &Battler,
    defender: &Battler,
    mv: &Move,
    attacker_stats: &StatsSet,
    defender_stats: &StatsSet,
    is_player_attacking: bool,
) -> u32 {
    let damage = calculate_damage(attacker, defender, mv, attacker_stats, defender_stats);
    if is_player_attacking {
        damage.min
    } else {
        damage.crit_max()
    }
}

/// Shorthand for the common case of both sides attacking with their own stats.
pub fn damage_between(attacker: &Battler, defender: &Battler, mv: &Move) -> DamageResult {
    calculate_damage(attacker, defender, mv, &attacker.stats, &defender.stats)
}
