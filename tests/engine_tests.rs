use pokemon_battle_planner::ai::enemy::select_enemy_action;
use pokemon_battle_planner::model::{DamageClass, Move, Pokemon, Stats};
use pokemon_battle_planner::sim::actions::{generate_possible_actions, Action};
use pokemon_battle_planner::sim::damage::damage_between;
use pokemon_battle_planner::sim::events::EventKind;
use pokemon_battle_planner::sim::state::{BattleState, Side, Status};
use pokemon_battle_planner::sim::switching::{resolve_faints, DefaultForcedSwitch};
use pokemon_battle_planner::sim::turn::{simulate_turn, simulate_turn_worst_case};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn make_move(name: &str, move_type: &str, damage_class: DamageClass, power: u32, priority: i32) -> Move {
    Move {
        name: name.to_string(),
        move_type: move_type.to_string(),
        power,
        accuracy: 100,
        damage_class,
        priority,
        effect_chance: None,
        effect: None,
    }
}

fn make_mon(name: &str, types: &[&str], base: Stats, level: u32, moves: Vec<Move>) -> Pokemon {
    Pokemon {
        name: name.to_string(),
        species: None,
        level,
        types: types.iter().map(|t| t.to_string()).collect(),
        base_stats: base,
        ivs: Stats::max_ivs(),
        evs: Stats::default(),
        nature: None,
        ability: None,
        moves: moves.into_iter().map(Into::into).collect(),
    }
}

const TYPES: [&str; 6] = ["normal", "fire", "water", "grass", "electric", "ground"];

fn random_mon(rng: &mut SmallRng, name: String) -> Pokemon {
    let moves = (0..4)
        .map(|i| {
            let move_type = TYPES[rng.gen_range(0..TYPES.len())];
            match rng.gen_range(0..5) {
                0 => make_move(
                    ["thunder-wave", "will-o-wisp", "toxic", "confuse-ray", "hypnosis"][rng.gen_range(0..5)],
                    "normal",
                    DamageClass::Status,
                    0,
                    0,
                ),
                1 => make_move(&format!("quick-{i}"), move_type, DamageClass::Physical, 40, 1),
                2 => make_move(&format!("phys-{i}"), move_type, DamageClass::Physical, rng.gen_range(20..=150), 0),
                _ => make_move(&format!("special-{i}"), move_type, DamageClass::Special, rng.gen_range(20..=150), 0),
            }
        })
        .collect();
    let base = Stats {
        hp: rng.gen_range(30..=150),
        atk: rng.gen_range(30..=150),
        def: rng.gen_range(30..=150),
        spa: rng.gen_range(30..=150),
        spd: rng.gen_range(30..=150),
        spe: rng.gen_range(30..=150),
    };
    let mut types = vec![TYPES[rng.gen_range(0..TYPES.len())]];
    if rng.gen_bool(0.5) {
        types.push(TYPES[rng.gen_range(0..TYPES.len())]);
    }
    make_mon(&name, &types, base, rng.gen_range(30..=100), moves)
}

fn random_state(rng: &mut SmallRng) -> BattleState {
    let player: Vec<Pokemon> = (0..3).map(|i| random_mon(rng, format!("p{i}"))).collect();
    let opponent: Vec<Pokemon> = (0..3).map(|i| random_mon(rng, format!("o{i}"))).collect();
    BattleState::new(&player, &opponent, 0, 0).unwrap()
}

fn assert_hp_invariants(state: &BattleState) {
    for b in state.player.iter().chain(state.opponent.iter()) {
        assert!(b.current_hp <= b.stats.hp, "{} over max hp", b.name);
        assert_eq!(b.current_hp == 0, b.fainted, "{} hp/fainted mismatch", b.name);
    }
}

#[test]
fn rattata_damage_is_deterministic_and_spread() {
    let base = Stats { hp: 30, atk: 56, def: 35, spa: 25, spd: 35, spe: 72 };
    let tackle = make_move("tackle", "normal", DamageClass::Physical, 40, 0);
    let mut mon = make_mon("rattata", &["normal"], base, 100, vec![tackle.clone()]);
    mon.ivs = Stats::default();
    let state = BattleState::new(&[mon.clone()], &[mon], 0, 0).unwrap();
    let damage = damage_between(state.active(Side::Player), state.active(Side::Opponent), &tackle);
    assert_eq!((damage.min, damage.max), (68, 81));
    assert!(damage.max > damage.min);
    assert_eq!(damage.average, (damage.min + damage.max) / 2);
}

#[test]
fn random_battles_keep_hp_invariants() {
    for seed in 0..40u64 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut state = random_state(&mut rng);
        let worst_case = seed % 2 == 1;

        for _ in 0..40 {
            if state.is_wiped(Side::Player) || state.is_wiped(Side::Opponent) {
                break;
            }
            let player_actions = generate_possible_actions(&state, Side::Player);
            let player_action = player_actions[rng.gen_range(0..player_actions.len())].clone();
            let Some(enemy_action) = select_enemy_action(&state, &mut rng) else {
                break;
            };
            if worst_case {
                simulate_turn_worst_case(&mut state, &player_action, &enemy_action, &mut rng);
            } else {
                simulate_turn(&mut state, &player_action, &enemy_action, &mut rng);
            }
            assert_hp_invariants(&state);
            resolve_faints(&mut state, &DefaultForcedSwitch);
        }
    }
}

#[test]
fn enemy_policy_never_switches() {
    for seed in 0..200u64 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let state = random_state(&mut rng);
        match select_enemy_action(&state, &mut rng) {
            Some(Action::Move { move_index, mv }) => {
                assert_eq!(state.active(Side::Opponent).moves[move_index], mv);
            }
            other => panic!("seed {seed}: unexpected {other:?}"),
        }
    }
}

#[test]
fn mutating_a_clone_leaves_the_original_alone() {
    let mut rng = SmallRng::seed_from_u64(99);
    let state = random_state(&mut rng);
    let mut copy = state.clone();
    copy.player[0].take_damage(u32::MAX);
    copy.opponent[1].status = Some(Status::Burn);
    copy.set_active_index(Side::Player, 2);
    copy.turn = 7;

    assert_eq!(state.player[0].current_hp, state.player[0].stats.hp);
    assert!(!state.player[0].fainted);
    assert!(state.opponent[1].status.is_none());
    assert_eq!(state.active_index(Side::Player), 0);
    assert_eq!(state.turn, 0);
}

#[test]
fn forced_switch_brings_in_a_healthy_member() {
    let strong = make_move("overheat", "fire", DamageClass::Special, 250, 0);
    let weak = make_move("pound", "normal", DamageClass::Physical, 10, 0);
    let base = Stats::uniform(80);
    let mut rng = SmallRng::seed_from_u64(3);
    let mut state = BattleState::new(
        &[
            make_mon("leaf", &["grass"], base, 50, vec![weak.clone()]),
            make_mon("rock", &["water"], base, 50, vec![weak.clone()]),
        ],
        &[make_mon("torch", &["fire"], Stats { spe: 150, ..base }, 50, vec![strong])],
        0,
        0,
    )
    .unwrap();

    let player_action = generate_possible_actions(&state, Side::Player)[0].clone();
    let enemy_action = select_enemy_action(&state, &mut rng).unwrap();
    simulate_turn(&mut state, &player_action, &enemy_action, &mut rng);
    assert!(state.player[0].fainted);

    let resolution = resolve_faints(&mut state, &DefaultForcedSwitch);
    assert!(!resolution.player_out);
    assert_eq!(state.active_index(Side::Player), 1);
    assert_eq!(resolution.events.len(), 1);
}

#[test]
fn worst_case_turn_uses_min_rolls_for_us_and_crits_for_them() {
    let mut rng = SmallRng::seed_from_u64(11);
    let tackle = make_move("tackle", "normal", DamageClass::Physical, 40, 0);
    let base = Stats::uniform(80);
    let mut state = BattleState::new(
        &[make_mon("ours", &["normal"], base, 50, vec![tackle.clone()])],
        &[make_mon("theirs", &["normal"], base, 50, vec![tackle.clone()])],
        0,
        0,
    )
    .unwrap();
    let damage = damage_between(state.active(Side::Player), state.active(Side::Opponent), &tackle);
    let hp = state.player[0].stats.hp;
    assert!(damage.crit_max() < hp);

    let action = generate_possible_actions(&state, Side::Player)[0].clone();
    let events = simulate_turn_worst_case(&mut state, &action, &action, &mut rng);

    assert_eq!(state.opponent[0].current_hp, hp - damage.min);
    assert_eq!(state.player[0].current_hp, hp - damage.crit_max());
    // equal speed: the opponent acts first
    let first_mover = events.iter().find(|e| e.kind == EventKind::MoveUse).and_then(|e| e.side);
    assert_eq!(first_mover, Some(Side::Opponent));
}

#[test]
fn worst_case_speed_tie_lets_the_opponent_strike_first() {
    let tackle = make_move("tackle", "normal", DamageClass::Physical, 40, 0);
    let crush = make_move("crush", "normal", DamageClass::Physical, 200, 0);
    let base = Stats::uniform(80);
    let initial = BattleState::new(
        &[make_mon("ours", &["normal"], base, 50, vec![tackle])],
        &[make_mon("theirs", &["normal"], base, 50, vec![crush])],
        0,
        0,
    )
    .unwrap();
    let heavy = damage_between(initial.active(Side::Opponent), initial.active(Side::Player), &initial.opponent[0].moves[0]);
    let hp = initial.player[0].stats.hp;
    assert!(heavy.average < hp && heavy.crit_max() >= hp);

    let player_action = generate_possible_actions(&initial, Side::Player)[0].clone();
    let enemy_action = Action::Move {
        move_index: 0,
        mv: initial.opponent[0].moves[0].clone(),
    };

    let mut rng = SmallRng::seed_from_u64(12);
    let mut average = initial.clone();
    simulate_turn(&mut average, &player_action, &enemy_action, &mut rng);
    assert!(!average.player[0].fainted);
    assert!(average.opponent[0].current_hp < hp);

    let mut worst = initial.clone();
    simulate_turn_worst_case(&mut worst, &player_action, &enemy_action, &mut rng);
    assert!(worst.player[0].fainted);
    assert_eq!(worst.opponent[0].current_hp, hp);
}
