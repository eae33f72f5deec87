use crate::model::{DamageClass, Move};
use crate::sim::actions::Action;
use crate::sim::damage::{calculate_damage, calculate_worst_case_damage};
use crate::sim::events::{BattleEvent, BattleLog, EventKind};
use crate::sim::state::{BattleState, Side, Status};
use crate::sim::status::{
    apply_end_of_turn_status, apply_status_effect, can_act, status_move_effect, StatusMoveEffect,
};
use rand::Rng;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SimMode {
    /// Average damage rolls and realistic status chances.
    Average,
    /// Min rolls for the player, crit max rolls for the opponent, and the
    /// worst status outcome whenever the player is the one acting.
    WorstCase,
}

pub fn simulate_turn(
    state: &mut BattleState,
    player_action: &Action,
    opponent_action: &Action,
    rng: &mut impl Rng,
) -> Vec<BattleEvent> {
    resolve_turn(state, player_action, opponent_action, SimMode::Average, rng)
}

pub fn simulate_turn_worst_case(
    state: &mut BattleState,
    player_action: &Action,
    opponent_action: &Action,
    rng: &mut impl Rng,
) -> Vec<BattleEvent> {
    resolve_turn(state, player_action, opponent_action, SimMode::WorstCase, rng)
}

pub fn resolve_turn(
    state: &mut BattleState,
    player_action: &Action,
    opponent_action: &Action,
    mode: SimMode,
    rng: &mut impl Rng,
) -> Vec<BattleEvent> {
    state.turn += 1;
    let mut log = BattleLog::new();

    let order = if player_moves_first(state, player_action, opponent_action, mode) {
        [(Side::Player, player_action), (Side::Opponent, opponent_action)]
    } else {
        [(Side::Opponent, opponent_action), (Side::Player, player_action)]
    };

    for (side, action) in order {
        execute_action(state, side, action, mode, &mut log, rng);
    }

    apply_end_of_turn_status(state.active_mut(Side::Player), Side::Player, &mut log);
    apply_end_of_turn_status(state.active_mut(Side::Opponent), Side::Opponent, &mut log);

    log.into_events()
}

/// Higher priority first, then higher speed. Exact speed ties go to the
/// player in average mode and to the opponent in worst-case mode.
pub fn player_moves_first(
    state: &BattleState,
    player_action: &Action,
    opponent_action: &Action,
    mode: SimMode,
) -> bool {
    let (player_priority, opponent_priority) = (player_action.priority(), opponent_action.priority());
    if player_priority != opponent_priority {
        return player_priority > opponent_priority;
    }
    let player_speed = state.active(Side::Player).stats.spe;
    let opponent_speed = state.active(Side::Opponent).stats.spe;
    match mode {
        SimMode::Average => player_speed >= opponent_speed,
        SimMode::WorstCase => player_speed > opponent_speed,
    }
}

fn execute_action(
    state: &mut BattleState,
    side: Side,
    action: &Action,
    mode: SimMode,
    log: &mut BattleLog,
    rng: &mut impl Rng,
) {
    if state.active(side).is_fainted() {
        return;
    }

    match action {
        Action::Switch {
            switch_to_index,
            name,
        } => {
            if *switch_to_index >= state.team(side).len() {
                return;
            }
            state.set_active_index(side, *switch_to_index);
            log.log_switch(side, name);
        }
        Action::Move { mv, .. } => {
            let worst_for_actor = mode == SimMode::WorstCase && side.is_player();
            if !can_act(state.active_mut(side), side, log, worst_for_actor, rng) {
                return;
            }
            let user = state.active(side).name.clone();
            log.log_move_use(side, &user, &mv.name);
            if mv.is_status() {
                use_status_move(state, side, mv, mode, log, rng);
            } else {
                use_damaging_move(state, side, mv, mode, log);
            }
        }
    }
}

fn use_status_move(
    state: &mut BattleState,
    side: Side,
    mv: &Move,
    mode: SimMode,
    log: &mut BattleLog,
    rng: &mut impl Rng,
) {
    let (_, defender) = state.actives_mut(side);
    match status_move_effect(&mv.id()) {
        Some(StatusMoveEffect::Inflict(status)) => {
            apply_status_effect(defender, status, log, rng);
        }
        Some(StatusMoveEffect::Confuse) => {
            if defender.confusion == 0 {
                defender.confusion = match mode {
                    SimMode::Average => rng.gen_range(1..=4),
                    SimMode::WorstCase if side.is_player() => 1,
                    SimMode::WorstCase => 4,
                };
                log.log(
                    EventKind::Confusion,
                    format!("{} became confused!", defender.display_name()),
                );
            }
        }
        None => {}
    }
}

fn use_damaging_move(state: &mut BattleState, side: Side, mv: &Move, mode: SimMode, log: &mut BattleLog) {
    let (attacker, defender) = state.actives_mut(side);

    let mut attacker_stats = attacker.stats;
    if attacker.status == Some(Status::Burn) && mv.damage_class == DamageClass::Physical {
        attacker_stats.atk /= 2;
    }
    if defender.is_fainted() {
        return;
    }
    let damage = calculate_damage(attacker, defender, mv, &attacker_stats, &defender.stats);

    let rolled = match mode {
        SimMode::Average => damage.average,
        SimMode::WorstCase => {
            if side.is_player() && mv.accuracy > 0 && mv.accuracy < 100 {
                log.log_accuracy_risk(side, &mv.name, mv.accuracy);
            }
            calculate_worst_case_damage(
                attacker,
                defender,
                mv,
                &attacker_stats,
                &defender.stats,
                side.is_player(),
            )
        }
    };

    let dealt = defender.take_damage(rolled);
    log.log_damage(side, &mv.name, dealt, damage.effectiveness);
    if defender.is_fainted() {
        log.log_faint(side.opponent(), &defender.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Pokemon, Stats};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn attack(name: &str, power: u32, priority: i32) -> Move {
        Move {
            name: name.to_string(),
            move_type: "normal".to_string(),
            power,
            accuracy: 100,
            damage_class: DamageClass::Physical,
            priority,
            effect_chance: None,
            effect: None,
        }
    }

    fn mon(name: &str, speed: u32, moves: Vec<Move>) -> Pokemon {
        Pokemon {
            name: name.to_string(),
            species: None,
            level: 50,
            types: vec!["normal".to_string()],
            base_stats: Stats { hp: 100, atk: 100, def: 100, spa: 100, spd: 100, spe: speed },
            ivs: Stats::max_ivs(),
            evs: Stats::default(),
            nature: None,
            ability: None,
            moves: moves.into_iter().map(Into::into).collect(),
        }
    }

    fn state(player_speed: u32, opponent_speed: u32) -> BattleState {
        BattleState::new(
            &[mon("player", player_speed, vec![attack("tackle", 40, 0), attack("quick-attack", 40, 1)])],
            &[mon("enemy", opponent_speed, vec![attack("tackle", 40, 0)])],
            0,
            0,
        )
        .unwrap()
    }

    fn move_action(state: &BattleState, side: Side, idx: usize) -> Action {
        Action::Move {
            move_index: idx,
            mv: state.active(side).moves[idx].clone(),
        }
    }

    #[test]
    fn speed_ties_depend_on_mode() {
        let s = state(80, 80);
        let p = move_action(&s, Side::Player, 0);
        let o = move_action(&s, Side::Opponent, 0);
        assert!(player_moves_first(&s, &p, &o, SimMode::Average));
        assert!(!player_moves_first(&s, &p, &o, SimMode::WorstCase));
    }

    #[test]
    fn priority_beats_speed() {
        let s = state(10, 150);
        let quick = move_action(&s, Side::Player, 1);
        let o = move_action(&s, Side::Opponent, 0);
        assert!(player_moves_first(&s, &quick, &o, SimMode::WorstCase));
        assert!(!player_moves_first(&s, &move_action(&s, Side::Player, 0), &o, SimMode::Average));
    }

    #[test]
    fn turn_counter_advances_once() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut s = state(90, 60);
        let p = move_action(&s, Side::Player, 0);
        let o = move_action(&s, Side::Opponent, 0);
        simulate_turn(&mut s, &p, &o, &mut rng);
        simulate_turn_worst_case(&mut s, &p, &o, &mut rng);
        assert_eq!(s.turn, 2);
    }

    #[test]
    fn burn_halves_physical_damage() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut healthy = state(90, 60);
        let mut burned = healthy.clone();
        burned.player[0].status = Some(Status::Burn);
        let p = move_action(&healthy, Side::Player, 0);
        let o = move_action(&healthy, Side::Opponent, 0);
        let a = simulate_turn(&mut healthy, &p, &o, &mut rng);
        let b = simulate_turn(&mut burned, &p, &o, &mut rng);
        let dealt = |events: &[BattleEvent]| {
            events
                .iter()
                .find(|e| e.kind == EventKind::Move && e.side == Some(Side::Player))
                .and_then(|e| e.damage)
                .unwrap()
        };
        assert!(dealt(&b) < dealt(&a));
    }

    #[test]
    fn fainted_battler_forfeits_its_action() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut s = state(150, 10);
        s.opponent[0].current_hp = 1;
        let p = move_action(&s, Side::Player, 0);
        let o = move_action(&s, Side::Opponent, 0);
        let events = simulate_turn(&mut s, &p, &o, &mut rng);
        assert!(s.opponent[0].is_fainted());
        assert_eq!(s.player[0].current_hp, s.player[0].stats.hp);
        assert!(events.iter().all(|e| e.side != Some(Side::Opponent) || e.kind == EventKind::Faint));
    }

    #[test]
    fn worst_case_player_confusion_lasts_one_turn() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut s = BattleState::new(
            &[mon("player", 150, vec![Move {
                damage_class: DamageClass::Status,
                power: 0,
                ..attack("confuse-ray", 0, 0)
            }])],
            &[mon("enemy", 10, vec![attack("tackle", 40, 0)])],
            0,
            0,
        )
        .unwrap();
        let p = move_action(&s, Side::Player, 0);
        let o = move_action(&s, Side::Opponent, 0);
        simulate_turn_worst_case(&mut s, &p, &o, &mut rng);
        // the opponent used its one turn of confusion on the same turn
        assert_eq!(s.opponent[0].confusion, 0);
    }
}
