use crate::model::normalize_move_id;
use crate::sim::actions::Action;
use crate::sim::damage::{damage_between, DamageResult};
use crate::sim::state::{BattleState, Battler, Side};
use phf::phf_set;
use rand::Rng;

pub const STATUS_MOVE_SCORE: i32 = 6;
pub const HIGHEST_DAMAGE_SCORE: i32 = 6;
pub const HIGHEST_DAMAGE_LUCKY_SCORE: i32 = 8;
pub const FAST_KILL_BONUS: i32 = 6;
pub const SLOW_KILL_BONUS: i32 = 3;
pub const PRIORITY_EMERGENCY_BONUS: i32 = 11;

static HIGH_CRIT_MOVES: phf::Set<&'static str> = phf_set! {
    "stone-edge",
    "shadow-claw",
    "razor-leaf",
    "crabhammer",
    "slash",
    "cross-poison",
    "night-slash",
    "spacial-rend",
    "attack-order",
    "leaf-blade",
    "psycho-cut",
    "blaze-kick",
};

static KO_BOOST_ABILITIES: phf::Set<&'static str> = phf_set! {
    "moxie",
    "beast-boost",
    "chilling-neigh",
    "grim-neigh",
};

pub fn is_high_crit_move(name: &str) -> bool {
    let id = normalize_move_id(name);
    HIGH_CRIT_MOVES.contains(id.as_str()) || id.contains("crit")
}

pub fn is_listed_high_crit_move(name: &str) -> bool {
    HIGH_CRIT_MOVES.contains(normalize_move_id(name).as_str())
}

fn has_ko_boost_ability(battler: &Battler) -> bool {
    battler
        .ability
        .as_deref()
        .is_some_and(|a| KO_BOOST_ABILITIES.contains(normalize_move_id(a).as_str()))
}

#[derive(Clone, Debug)]
pub struct ScoredMove {
    pub move_index: usize,
    pub score: i32,
    pub rolled_damage: u32,
    pub damage: Option<DamageResult>,
}

/// One damage roll picked uniformly from 16 steps between min and max.
pub fn roll_damage(damage: &DamageResult, rng: &mut impl Rng) -> u32 {
    let range = damage.max - damage.min;
    let roll = rng.gen_range(0..16u32);
    damage.min + range * roll / 15
}

/// Scores every move of `attacker` against `target` the way the trainer AI
/// does. Each call draws fresh damage rolls and bonus chances.
pub fn score_moves(attacker: &Battler, target: &Battler, rng: &mut impl Rng) -> Vec<ScoredMove> {
    // the AI treats speed ties as being faster
    let attacker_is_faster = attacker.stats.spe >= target.stats.spe;
    let dies_to_target = !attacker_is_faster
        && target
            .moves
            .iter()
            .filter(|mv| !mv.is_status())
            .any(|mv| damage_between(target, attacker, mv).average >= attacker.current_hp);

    let mut scored: Vec<ScoredMove> = attacker
        .moves
        .iter()
        .enumerate()
        .map(|(move_index, mv)| {
            if mv.is_status() {
                ScoredMove {
                    move_index,
                    score: STATUS_MOVE_SCORE,
                    rolled_damage: 0,
                    damage: None,
                }
            } else {
                let damage = damage_between(attacker, target, mv);
                ScoredMove {
                    move_index,
                    score: 0,
                    rolled_damage: roll_damage(&damage, rng),
                    damage: Some(damage),
                }
            }
        })
        .collect();

    let max_rolled = scored.iter().map(|s| s.rolled_damage).max().unwrap_or(0);

    for entry in scored.iter_mut() {
        let Some(damage) = entry.damage else {
            continue;
        };
        let mv = &attacker.moves[entry.move_index];
        let has_priority = mv.priority > 0;

        if max_rolled > 0 && entry.rolled_damage == max_rolled {
            entry.score = if rng.gen::<f64>() < 0.8 {
                HIGHEST_DAMAGE_SCORE
            } else {
                HIGHEST_DAMAGE_LUCKY_SCORE
            };
        }

        if entry.rolled_damage >= target.current_hp {
            entry.score += if attacker_is_faster || has_priority {
                FAST_KILL_BONUS
            } else {
                SLOW_KILL_BONUS
            };
            if has_ko_boost_ability(attacker) {
                entry.score += 1;
            }
        }

        if has_priority && dies_to_target {
            entry.score += PRIORITY_EMERGENCY_BONUS;
        }

        if is_high_crit_move(&mv.name) && damage.effectiveness > 1.0 && rng.gen::<f64>() < 0.5 {
            entry.score += 1;
        }
    }

    scored
}

/// Index of a top-scoring move, ties broken uniformly at random.
pub fn pick_best(scored: &[ScoredMove], rng: &mut impl Rng) -> Option<usize> {
    let max_score = scored.iter().map(|s| s.score).max()?;
    let best: Vec<usize> = scored
        .iter()
        .filter(|s| s.score == max_score)
        .map(|s| s.move_index)
        .collect();
    Some(best[rng.gen_range(0..best.len())])
}

/// Trainer AI move choice for the opponent's active. Never switches;
/// `None` when the active has no moves.
pub fn select_enemy_action(state: &BattleState, rng: &mut impl Rng) -> Option<Action> {
    let enemy = state.active(Side::Opponent);
    let target = state.active(Side::Player);
    let scored = score_moves(enemy, target, rng);
    let move_index = pick_best(&scored, rng)?;
    Some(Action::Move {
        move_index,
        mv: enemy.moves[move_index].clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DamageClass, Move, Pokemon, Stats};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn mv(name: &str, power: u32, priority: i32) -> Move {
        Move {
            name: name.to_string(),
            move_type: "normal".to_string(),
            power,
            accuracy: 100,
            damage_class: if power == 0 { DamageClass::Status } else { DamageClass::Physical },
            priority,
            effect_chance: None,
            effect: None,
        }
    }

    fn mon(name: &str, speed: u32, hp: u32, moves: Vec<Move>) -> Pokemon {
        Pokemon {
            name: name.to_string(),
            species: None,
            level: 50,
            types: vec!["normal".to_string()],
            base_stats: Stats { hp, atk: 100, def: 100, spa: 100, spd: 100, spe: speed },
            ivs: Stats::max_ivs(),
            evs: Stats::default(),
            nature: None,
            ability: None,
            moves: moves.into_iter().map(Into::into).collect(),
        }
    }

    fn chosen_name(state: &BattleState, rng: &mut SmallRng) -> String {
        match select_enemy_action(state, rng) {
            Some(Action::Move { mv, .. }) => mv.name,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn roll_stays_within_range() {
        let mut rng = SmallRng::seed_from_u64(0);
        let damage = DamageResult { min: 68, max: 81, average: 74, effectiveness: 1.0, is_stab: true };
        for _ in 0..500 {
            let r = roll_damage(&damage, &mut rng);
            assert!((68..=81).contains(&r));
        }
    }

    #[test]
    fn killing_blow_is_always_chosen() {
        let mut rng = SmallRng::seed_from_u64(1);
        let state = BattleState::new(
            &[mon("target", 50, 20, vec![mv("tackle", 40, 0)])],
            &[mon("ai", 100, 100, vec![mv("pound", 10, 0), mv("giga-impact", 250, 0), mv("growl", 0, 0)])],
            0,
            0,
        )
        .unwrap();
        for _ in 0..200 {
            assert_eq!(chosen_name(&state, &mut rng), "giga-impact");
        }
    }

    #[test]
    fn slower_ai_in_danger_reaches_for_priority() {
        let mut rng = SmallRng::seed_from_u64(2);
        let state = BattleState::new(
            &[mon("threat", 150, 255, vec![mv("giga-impact", 250, 0)])],
            &[mon("ai", 20, 30, vec![mv("quick-attack", 40, 1), mv("double-edge", 120, 0)])],
            0,
            0,
        )
        .unwrap();
        for _ in 0..200 {
            assert_eq!(chosen_name(&state, &mut rng), "quick-attack");
        }
    }

    #[test]
    fn ties_are_broken_between_all_candidates() {
        let mut rng = SmallRng::seed_from_u64(3);
        let state = BattleState::new(
            &[mon("target", 50, 100, vec![mv("tackle", 40, 0)])],
            &[mon("ai", 100, 100, vec![mv("growl", 0, 0), mv("leer", 0, 0)])],
            0,
            0,
        )
        .unwrap();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(chosen_name(&state, &mut rng));
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn no_moves_means_no_action() {
        let mut rng = SmallRng::seed_from_u64(4);
        let state = BattleState::new(
            &[mon("target", 50, 100, vec![mv("tackle", 40, 0)])],
            &[mon("ai", 100, 100, Vec::new())],
            0,
            0,
        )
        .unwrap();
        assert!(select_enemy_action(&state, &mut rng).is_none());
    }

    #[test]
    fn high_crit_lookup() {
        assert!(is_high_crit_move("Stone Edge"));
        assert!(is_high_crit_move("crit-smash"));
        assert!(!is_high_crit_move("tackle"));
        assert!(!is_listed_high_crit_move("crit-smash"));
    }
}
