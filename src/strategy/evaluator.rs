use crate::sim::damage::damage_between;
use crate::sim::state::{BattleState, Battler, Side};
use crate::sim::switching::switch_in_score;

pub const ALIVE_WEIGHT: f64 = 5000.0;
pub const GUARANTEED_KO_BONUS: f64 = 10000.0;
pub const KO_THREAT_PENALTY: f64 = 3000.0;
pub const HP_WEIGHT: f64 = 500.0;
pub const MATCHUP_WEIGHT: f64 = 100.0;

/// Scores a position from the player's point of view; larger is better.
/// Weights are ordered so that alive counts and KO threats dominate HP and
/// matchup quality.
pub fn evaluate_position(state: &BattleState) -> f64 {
    let player_alive = state.alive_count(Side::Player);
    let opponent_alive = state.alive_count(Side::Opponent);
    let mut score = (player_alive as f64 - opponent_alive as f64) * ALIVE_WEIGHT;

    let player = state.active(Side::Player);
    let opponent = state.active(Side::Opponent);
    let both_standing = player_alive > 0 && opponent_alive > 0 && !player.is_fainted() && !opponent.is_fainted();

    if both_standing {
        if can_guarantee_ko(player, opponent) {
            score += GUARANTEED_KO_BONUS;
        }
        if can_threaten_ko(opponent, player) {
            score -= KO_THREAT_PENALTY;
        }
    }

    score += (hp_fraction(state, Side::Player) - hp_fraction(state, Side::Opponent)) * HP_WEIGHT;

    if both_standing {
        score += switch_in_score(Some(player), opponent) as f64 * MATCHUP_WEIGHT;
    }

    score
}

/// Some damaging move's min roll covers the defender's remaining HP.
pub fn can_guarantee_ko(attacker: &Battler, defender: &Battler) -> bool {
    attacker
        .moves
        .iter()
        .filter(|mv| !mv.is_status())
        .any(|mv| damage_between(attacker, defender, mv).min >= defender.current_hp)
}

/// Some damaging move's max roll, crit included, covers the defender's HP.
pub fn can_threaten_ko(attacker: &Battler, defender: &Battler) -> bool {
    attacker.moves.iter().filter(|mv| !mv.is_status()).any(|mv| {
        let damage = damage_between(attacker, defender, mv);
        damage.max >= defender.current_hp || damage.crit_max() >= defender.current_hp
    })
}

fn hp_fraction(state: &BattleState, side: Side) -> f64 {
    let (current, max) = state
        .team(side)
        .iter()
        .fold((0u64, 0u64), |(c, m), b| (c + b.current_hp as u64, m + b.stats.hp as u64));
    if max == 0 {
        0.0
    } else {
        current as f64 / max as f64
    }
}
