use crate::ai::enemy::select_enemy_action;
use crate::ai::lookahead::find_best_action_with_lookahead;
use crate::sim::state::{BattleState, Side};
use crate::sim::switching::{resolve_faints, ForcedSwitchResolver};
use crate::sim::turn::{simulate_turn, simulate_turn_worst_case};
use crate::strategy::analysis::grade_action;
use crate::strategy::explain::explain_action;
use crate::strategy::plan::{AliveCounts, PlanStep};
use crate::strategy::risk::calculate_action_risk;
use rand::Rng;
use serde::Serialize;
use std::fmt;

/// Greedy turn-by-turn plan: the player follows the lookahead, the opponent
/// follows the trainer AI. Each step carries a risk report and reasoning.
pub fn find_optimal_strategy(
    initial: &BattleState,
    max_depth: usize,
    lookahead_depth: u32,
    odds_trials: usize,
    resolver: &dyn ForcedSwitchResolver,
    rng: &mut impl Rng,
) -> Vec<PlanStep> {
    let mut state = initial.clone();
    let mut steps = Vec::new();

    for _ in 0..max_depth {
        if state.is_wiped(Side::Player) || state.is_wiped(Side::Opponent) {
            break;
        }
        let Some(action) =
            find_best_action_with_lookahead(&state, Side::Player, lookahead_depth, Some(resolver), rng).action
        else {
            break;
        };
        let reasoning = explain_action(&state, &action, Side::Player);
        let grade = grade_action(&state, &action);
        let Some(enemy_action) = select_enemy_action(&state, rng) else {
            break;
        };
        let risk = calculate_action_risk(&state, &action, Side::Player, odds_trials, rng);

        let before = AliveCounts::of(&state);
        let mut events = simulate_turn(&mut state, &action, &enemy_action, rng);
        events.extend(resolve_faints(&mut state, resolver).events);

        let mut step = PlanStep::record(&state, before, action, Some(enemy_action), events);
        step.risk = Some(risk);
        step.reasoning = Some(reasoning);
        step.grade = grade;
        steps.push(step);
    }

    steps
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WorstCaseOutcome {
    LossRisk,
    Inconclusive,
    Riskless,
    Risky(usize),
}

impl fmt::Display for WorstCaseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorstCaseOutcome::LossRisk => write!(f, "LOSS RISK - Can lose the battle in worst case"),
            WorstCaseOutcome::Inconclusive => write!(f, "INCONCLUSIVE - Battle may not complete"),
            WorstCaseOutcome::Riskless => {
                write!(f, "RISKLESS - Perfect, zero deaths even with max bad luck")
            }
            WorstCaseOutcome::Risky(1) => write!(f, "RISKY 1 DEATH - Guaranteed win, possible 1 casualty"),
            WorstCaseOutcome::Risky(n) => {
                write!(f, "RISKY {n} DEATHS - Guaranteed win, possible {n} casualties")
            }
        }
    }
}

impl Serialize for WorstCaseOutcome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorstCaseReport {
    pub steps: Vec<PlanStep>,
    pub player_deaths: usize,
    pub opponent_deaths: usize,
    pub we_win: bool,
    pub we_lose: bool,
    pub risk_tier: WorstCaseOutcome,
}

/// Same loop as [`find_optimal_strategy`] with every turn resolved worst
/// case, counting deaths on both sides.
pub fn calculate_worst_case_strategy(
    initial: &BattleState,
    max_depth: usize,
    lookahead_depth: u32,
    resolver: &dyn ForcedSwitchResolver,
    rng: &mut impl Rng,
) -> WorstCaseReport {
    let mut state = initial.clone();
    let mut steps: Vec<PlanStep> = Vec::new();

    for _ in 0..max_depth {
        if state.is_wiped(Side::Player) || state.is_wiped(Side::Opponent) {
            break;
        }
        let Some(action) =
            find_best_action_with_lookahead(&state, Side::Player, lookahead_depth, Some(resolver), rng).action
        else {
            break;
        };
        let Some(enemy_action) = select_enemy_action(&state, rng) else {
            break;
        };

        let before = AliveCounts::of(&state);
        let mut events = simulate_turn_worst_case(&mut state, &action, &enemy_action, rng);
        events.extend(resolve_faints(&mut state, resolver).events);
        steps.push(PlanStep::record(&state, before, action, Some(enemy_action), events));
    }

    let player_deaths = steps.iter().map(|s| s.player_deaths).sum();
    let opponent_deaths = steps.iter().map(|s| s.opponent_deaths).sum();
    let we_lose = state.is_wiped(Side::Player);
    let we_win = state.is_wiped(Side::Opponent) && !we_lose;

    let risk_tier = if we_lose {
        WorstCaseOutcome::LossRisk
    } else if !we_win {
        WorstCaseOutcome::Inconclusive
    } else if player_deaths == 0 {
        WorstCaseOutcome::Riskless
    } else {
        WorstCaseOutcome::Risky(player_deaths)
    };

    WorstCaseReport {
        steps,
        player_deaths,
        opponent_deaths,
        we_win,
        we_lose,
        risk_tier,
    }
}
