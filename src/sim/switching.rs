use crate::sim::damage::damage_between;
use crate::sim::events::BattleEvent;
use crate::sim::state::{BattleState, Battler, Side};

pub const INVALID_SWITCH_SCORE: i32 = -999;

/// Scores how well `candidate` matches up against `opponent`, from 5 (faster
/// and can OHKO) down to -1 (slower and gets OHKO'd). Absent or fainted
/// candidates score `INVALID_SWITCH_SCORE`.
pub fn switch_in_score(candidate: Option<&Battler>, opponent: &Battler) -> i32 {
    let candidate = match candidate {
        Some(c) if !c.is_fainted() => c,
        _ => return INVALID_SWITCH_SCORE,
    };

    let is_faster = candidate.stats.spe > opponent.stats.spe;
    let dealt = best_max_damage(candidate, opponent);
    let taken = best_max_damage(opponent, candidate);

    let target_hp = opponent.current_hp.max(1);
    let can_ohko = dealt >= opponent.current_hp;
    let can_2hko = dealt * 2 >= opponent.current_hp;
    let gets_ohkod = taken >= candidate.current_hp;
    let survives_hit = !gets_ohkod;
    let damage_percent = dealt as f64 / target_hp as f64 * 100.0;

    if is_faster && can_ohko {
        5
    } else if is_faster && can_2hko {
        4
    } else if is_faster && survives_hit && damage_percent > 30.0 {
        3
    } else if !is_faster && can_ohko {
        2
    } else if !is_faster && survives_hit && damage_percent > 20.0 {
        1
    } else if !is_faster && gets_ohkod {
        -1
    } else {
        0
    }
}

fn best_max_damage(attacker: &Battler, defender: &Battler) -> u32 {
    attacker
        .moves
        .iter()
        .map(|mv| damage_between(attacker, defender, mv).max)
        .max()
        .unwrap_or(0)
}

/// Highest-scoring healthy bench member; the first one seen wins ties.
pub fn find_best_switch_in(team: &[Battler], active_index: usize, opponent: &Battler) -> Option<(usize, i32)> {
    let mut best: Option<(usize, i32)> = None;
    for (idx, candidate) in team.iter().enumerate() {
        if idx == active_index || candidate.is_fainted() {
            continue;
        }
        let score = switch_in_score(Some(candidate), opponent);
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((idx, score));
        }
    }
    best
}

/// Replaces `side`'s fainted active. The player sends the first healthy
/// bench member; the opponent sends its best matchup. `None` means the side
/// has nobody left.
pub fn handle_forced_switch(state: &mut BattleState, side: Side) -> Option<BattleEvent> {
    let current = state.active_index(side);
    let next = match side {
        Side::Player => state
            .team(side)
            .iter()
            .enumerate()
            .find(|(idx, b)| *idx != current && !b.is_fainted())
            .map(|(idx, _)| idx),
        Side::Opponent => {
            find_best_switch_in(state.team(side), current, state.active(side.opponent())).map(|(idx, _)| idx)
        }
    }?;
    state.set_active_index(side, next);
    Some(BattleEvent::switch(side, &state.team(side)[next].name, true))
}

/// Hook the search routines call after every simulated turn.
pub trait ForcedSwitchResolver {
    fn resolve(&self, state: &mut BattleState, side: Side) -> Option<BattleEvent>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultForcedSwitch;

impl ForcedSwitchResolver for DefaultForcedSwitch {
    fn resolve(&self, state: &mut BattleState, side: Side) -> Option<BattleEvent> {
        handle_forced_switch(state, side)
    }
}

/// Outcome of replacing fainted actives after a turn.
#[derive(Debug, Default)]
pub struct FaintResolution {
    pub events: Vec<BattleEvent>,
    /// The player's active fainted and nobody could replace it.
    pub player_out: bool,
}

/// Runs the resolver for each side whose active has fainted, player first.
pub fn resolve_faints(state: &mut BattleState, resolver: &dyn ForcedSwitchResolver) -> FaintResolution {
    let mut resolution = FaintResolution::default();
    if state.active(Side::Player).is_fainted() {
        match resolver.resolve(state, Side::Player) {
            Some(event) => resolution.events.push(event),
            None => resolution.player_out = true,
        }
    }
    if state.active(Side::Opponent).is_fainted() {
        if let Some(event) = resolver.resolve(state, Side::Opponent) {
            resolution.events.push(event);
        }
    }
    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DamageClass, Move, Pokemon, Stats};

    fn mon(name: &str, types: &[&str], speed: u32, mv: (&str, &str, u32)) -> Pokemon {
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
            moves: vec![Move {
                name: mv.0.to_string(),
                move_type: mv.1.to_string(),
                power: mv.2,
                accuracy: 100,
                damage_class: DamageClass::Special,
                priority: 0,
                effect_chance: None,
                effect: None,
            }
            .into()],
        }
    }

    #[test]
    fn invalid_candidates_score_sentinel() {
        let opp = Battler::from_pokemon(&mon("geodude", &["rock"], 20, ("tackle", "normal", 40)));
        let mut fainted = Battler::from_pokemon(&mon("squirtle", &["water"], 40, ("surf", "water", 90)));
        fainted.take_damage(u32::MAX);
        assert_eq!(switch_in_score(None, &opp), INVALID_SWITCH_SCORE);
        assert_eq!(switch_in_score(Some(&fainted), &opp), INVALID_SWITCH_SCORE);
    }

    #[test]
    fn fast_ohko_scores_top() {
        let opp = Battler::from_pokemon(&mon("charmander", &["fire"], 20, ("ember", "fire", 40)));
        let mut candidate = Battler::from_pokemon(&mon("blastoise", &["water"], 120, ("hydro-cannon", "water", 150)));
        candidate.stats.spa = 400;
        assert_eq!(switch_in_score(Some(&candidate), &opp), 5);
    }

    #[test]
    fn opponent_picks_best_matchup_player_picks_first() {
        let team = vec![
            mon("fainted", &["normal"], 50, ("tackle", "normal", 40)),
            mon("weak", &["grass"], 50, ("vine-whip", "grass", 20)),
            mon("strong", &["water"], 200, ("hydro-pump", "water", 250)),
        ];
        let foe = vec![mon("arcanine", &["fire"], 100, ("ember", "fire", 40))];
        let mut state = BattleState::new(&foe, &team, 0, 0).unwrap();
        state.opponent[0].take_damage(u32::MAX);
        let event = handle_forced_switch(&mut state, Side::Opponent).unwrap();
        assert_eq!(state.opponent_active, 2);
        assert_eq!(event.text, "Enemy sent out Strong!");

        let mut state = BattleState::new(&team, &foe, 0, 0).unwrap();
        state.player[0].take_damage(u32::MAX);
        handle_forced_switch(&mut state, Side::Player).unwrap();
        assert_eq!(state.player_active, 1);
    }

    #[test]
    fn no_replacement_means_side_is_out() {
        let team = vec![mon("solo", &["normal"], 50, ("tackle", "normal", 40))];
        let mut state = BattleState::new(&team, &team, 0, 0).unwrap();
        state.player[0].take_damage(u32::MAX);
        assert!(handle_forced_switch(&mut state, Side::Player).is_none());
        let resolution = resolve_faints(&mut state, &DefaultForcedSwitch);
        assert!(resolution.player_out);
        assert!(resolution.events.is_empty());
    }
}
