use crate::sim::actions::{generate_possible_actions, Action};
use crate::sim::damage::damage_between;
use crate::sim::state::{BattleState, Side};
use crate::sim::switching::{resolve_faints, ForcedSwitchResolver};
use crate::sim::turn::simulate_turn;
use crate::strategy::evaluator::evaluate_position;
use rand::Rng;

pub const DEFAULT_LOOKAHEAD_DEPTH: u32 = 2;

#[derive(Clone, Debug)]
pub struct LookaheadResult {
    pub action: Option<Action>,
    pub score: f64,
}

/// Fixed-depth lookahead for `side`. The other side always answers with its
/// first damaging move, so this ranks `side`'s own action sequences rather
/// than solving the game. Scores are from the player's point of view: the
/// player maximises, the opponent minimises.
pub fn find_best_action_with_lookahead(
    state: &BattleState,
    side: Side,
    depth: u32,
    resolver: Option<&dyn ForcedSwitchResolver>,
    rng: &mut impl Rng,
) -> LookaheadResult {
    if depth == 0 {
        return LookaheadResult {
            action: None,
            score: evaluate_position(state),
        };
    }

    let actions = generate_possible_actions(state, side);
    let Some(first) = actions.first().cloned() else {
        return LookaheadResult {
            action: None,
            score: evaluate_position(state),
        };
    };
    let Some(response) = greedy_response(state, side.opponent()) else {
        return LookaheadResult {
            action: Some(first),
            score: evaluate_position(state),
        };
    };

    let mut best_action = first;
    let mut best_score = if side.is_player() {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    };

    for action in actions {
        let mut next = state.clone();
        let (player_action, opponent_action) = match side {
            Side::Player => (&action, &response),
            Side::Opponent => (&response, &action),
        };
        simulate_turn(&mut next, player_action, opponent_action, rng);
        if let Some(resolver) = resolver {
            resolve_faints(&mut next, resolver);
        }

        let score = find_best_action_with_lookahead(&next, side, depth - 1, resolver, rng).score;
        let improves = match side {
            Side::Player => score > best_score,
            Side::Opponent => score < best_score,
        };
        if improves {
            best_score = score;
            best_action = action;
        }
    }

    LookaheadResult {
        action: Some(best_action),
        score: best_score,
    }
}

/// First damaging move with a positive average against the other active,
/// falling back to the first legal action.
pub fn greedy_response(state: &BattleState, side: Side) -> Option<Action> {
    let actions = generate_possible_actions(state, side);
    let attacker = state.active(side);
    let target = state.active(side.opponent());
    actions
        .iter()
        .find(|action| match action {
            Action::Move { mv, .. } => !mv.is_status() && damage_between(attacker, target, mv).average > 0,
            Action::Switch { .. } => false,
        })
        .or_else(|| actions.first())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DamageClass, Move, Pokemon, Stats};
    use crate::sim::switching::DefaultForcedSwitch;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn mv(name: &str, move_type: &str, power: u32) -> Move {
        Move {
            name: name.to_string(),
            move_type: move_type.to_string(),
            power,
            accuracy: 100,
            damage_class: if power == 0 { DamageClass::Status } else { DamageClass::Special },
            priority: 0,
            effect_chance: None,
            effect: None,
        }
    }

    fn mon(name: &str, types: &[&str], speed: u32, moves: Vec<Move>) -> Pokemon {
        Pokemon {
            name: name.to_string(),
            species: None,
            level: 50,
            types: types.iter().map(|t| t.to_string()).collect(),
            base_stats: Stats { hp: 80, atk: 80, def: 80, spa: 80, spd: 80, spe: speed },
            ivs: Stats::max_ivs(),
            evs: Stats::default(),
            nature: None,
            ability: None,
            moves: moves.into_iter().map(Into::into).collect(),
        }
    }

    #[test]
    fn depth_zero_only_evaluates() {
        let mut rng = SmallRng::seed_from_u64(0);
        let state = BattleState::new(
            &[mon("a", &["water"], 80, vec![mv("surf", "water", 90)])],
            &[mon("b", &["fire"], 80, vec![mv("ember", "fire", 40)])],
            0,
            0,
        )
        .unwrap();
        let result = find_best_action_with_lookahead(&state, Side::Player, 0, None, &mut rng);
        assert!(result.action.is_none());
        assert_eq!(result.score, evaluate_position(&state));
    }

    #[test]
    fn prefers_the_super_effective_move() {
        let mut rng = SmallRng::seed_from_u64(1);
        let state = BattleState::new(
            &[mon("a", &["normal"], 100, vec![mv("ember", "fire", 40), mv("surf", "water", 90)])],
            &[mon("b", &["fire"], 50, vec![mv("ember", "fire", 40)])],
            0,
            0,
        )
        .unwrap();
        let result = find_best_action_with_lookahead(
            &state,
            Side::Player,
            DEFAULT_LOOKAHEAD_DEPTH,
            Some(&DefaultForcedSwitch),
            &mut rng,
        );
        match result.action {
            Some(Action::Move { mv, .. }) => assert_eq!(mv.name, "surf"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn greedy_response_skips_status_moves() {
        let state = BattleState::new(
            &[mon("a", &["normal"], 100, vec![mv("tackle", "normal", 40)])],
            &[mon("b", &["fire"], 50, vec![mv("growl", "normal", 0), mv("ember", "fire", 40)])],
            0,
            0,
        )
        .unwrap();
        match greedy_response(&state, Side::Opponent) {
            Some(Action::Move { move_index, .. }) => assert_eq!(move_index, 1),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn original_state_is_untouched() {
        let mut rng = SmallRng::seed_from_u64(2);
        let state = BattleState::new(
            &[mon("a", &["normal"], 100, vec![mv("tackle", "normal", 40)])],
            &[mon("b", &["fire"], 50, vec![mv("ember", "fire", 40)])],
            0,
            0,
        )
        .unwrap();
        let before = state.opponent[0].current_hp;
        find_best_action_with_lookahead(&state, Side::Player, 2, Some(&DefaultForcedSwitch), &mut rng);
        assert_eq!(state.opponent[0].current_hp, before);
        assert_eq!(state.turn, 0);
    }
}
