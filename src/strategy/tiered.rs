use crate::ai::enemy::select_enemy_action;
use crate::config::SearchLimits;
use crate::sim::actions::{generate_possible_actions, Action};
use crate::sim::damage::damage_between;
use crate::sim::state::{BattleState, Battler, Side};
use crate::sim::switching::{resolve_faints, ForcedSwitchResolver};
use crate::sim::turn::{resolve_turn, simulate_turn, SimMode};
use crate::strategy::plan::{AliveCounts, PlanStep};
use log::{debug, info};
use rand::Rng;
use serde::{Serialize, Serializer};
use std::collections::VecDeque;
use std::fmt;
use std::time::Instant;

pub const KEEP_DAMAGE_RATIO: f64 = 0.95;
pub const DEFENSIVE_SWITCH_RATIO: f64 = 0.7;
pub const RISKY_SWITCH_PERCENT: f64 = 90.0;
pub const SAFE_SWITCH_PERCENT: f64 = 70.0;
pub const THREATEN_RATIO: f64 = 0.25;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RiskTier {
    /// No deaths even in the worst case.
    Riskless,
    /// No deaths on average, `n` when unlucky.
    Risky(usize),
    /// `n` deaths either way.
    Sacrifice(usize),
    HighRisk { average: usize, worst: usize },
    UnlikelyWin,
    GuaranteedLoss,
}

impl RiskTier {
    pub fn classify(average_deaths: usize, worst_case_deaths: usize) -> Self {
        if worst_case_deaths == 0 {
            RiskTier::Riskless
        } else if average_deaths == 0 {
            RiskTier::Risky(worst_case_deaths)
        } else if average_deaths == worst_case_deaths {
            RiskTier::Sacrifice(average_deaths)
        } else {
            RiskTier::HighRisk {
                average: average_deaths,
                worst: worst_case_deaths,
            }
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskTier::Riskless => write!(f, "RISKLESS - Zero deaths guaranteed"),
            RiskTier::Risky(n) => write!(f, "RISKY {n} - Might lose {n} if unlucky"),
            RiskTier::Sacrifice(n) => write!(f, "SACRIFICE {n} - Guaranteed to lose {n}"),
            RiskTier::HighRisk { average, worst } => {
                write!(f, "HIGH RISK - Average {average}, worst {worst}")
            }
            RiskTier::UnlikelyWin => write!(f, "UNLIKELY WIN - Requires luck"),
            RiskTier::GuaranteedLoss => write!(f, "GUARANTEED LOSS"),
        }
    }
}

impl Serialize for RiskTier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TieredResult {
    pub strategy: Vec<PlanStep>,
    pub worst_case_strategy: Vec<PlanStep>,
    pub risk_tier: RiskTier,
    pub average_deaths: usize,
    pub worst_case_deaths: usize,
    pub turns_to_win: Option<usize>,
    /// Loss tier the plan was accepted under; `None` for the fallback plan.
    pub acceptable_losses: Option<usize>,
}

/// Player turn paired with the opponent's predicted answer.
#[derive(Clone, Debug)]
pub struct PlannedTurn {
    pub action: Action,
    pub enemy_action: Action,
}

#[derive(Clone, Debug)]
pub struct PathReplay {
    pub victory: bool,
    pub deaths: usize,
    pub steps: Vec<PlanStep>,
}

#[derive(Clone, Debug)]
pub struct PathValidation {
    pub risk_tier: RiskTier,
    pub average: PathReplay,
    pub worst_case: PathReplay,
}

struct SearchNode {
    state: BattleState,
    path: Vec<PlannedTurn>,
    depth: usize,
}

pub fn find_tiered_strategy(
    initial: &BattleState,
    max_depth: usize,
    resolver: &dyn ForcedSwitchResolver,
    rng: &mut impl Rng,
) -> TieredResult {
    let limits = SearchLimits {
        max_depth,
        ..SearchLimits::default()
    };
    find_tiered_strategy_with(initial, &limits, resolver, rng)
}

/// Tries each acceptable-loss tier in ascending order and returns the first
/// validated winning plan, or a best-effort plan when every tier fails.
pub fn find_tiered_strategy_with(
    initial: &BattleState,
    limits: &SearchLimits,
    resolver: &dyn ForcedSwitchResolver,
    rng: &mut impl Rng,
) -> TieredResult {
    info!("starting tiered strategy search (max depth {})", limits.max_depth);

    for acceptable in 0..=limits.max_acceptable_losses {
        debug!("searching for a plan with at most {acceptable} losses");
        if let Some(result) = search_tier(initial, limits, acceptable, resolver, rng) {
            info!("found strategy: {}", result.risk_tier);
            return result;
        }
    }

    info!("no winning strategy found, building a loss mitigation plan");
    loss_strategy(initial, limits.max_depth, resolver, rng)
}

fn search_tier(
    initial: &BattleState,
    limits: &SearchLimits,
    acceptable: usize,
    resolver: &dyn ForcedSwitchResolver,
    rng: &mut impl Rng,
) -> Option<TieredResult> {
    let start = Instant::now();
    let mut explored = 0usize;
    let mut queue = VecDeque::new();
    queue.push_back(SearchNode {
        state: initial.clone(),
        path: Vec::new(),
        depth: 0,
    });

    while let Some(node) = queue.pop_front() {
        explored += 1;
        if start.elapsed() > limits.time_budget {
            info!("tier {acceptable}: timeout after {explored} nodes");
            return None;
        }
        if limits.node_limit.is_some_and(|cap| explored > cap) {
            info!("tier {acceptable}: node limit reached after {explored} nodes");
            return None;
        }

        if node.state.is_wiped(Side::Opponent) {
            if let Some(validation) = validate_path(initial, &node.path, acceptable, resolver, rng) {
                debug!(
                    "tier {acceptable}: valid plan after {explored} nodes ({:?})",
                    start.elapsed()
                );
                let turns_to_win = node.path.len();
                return Some(TieredResult {
                    average_deaths: validation.average.deaths,
                    worst_case_deaths: validation.worst_case.deaths,
                    strategy: validation.average.steps,
                    worst_case_strategy: validation.worst_case.steps,
                    risk_tier: validation.risk_tier,
                    turns_to_win: Some(turns_to_win),
                    acceptable_losses: Some(acceptable),
                });
            }
            // min rolls can need extra turns against an already fainted foe
        }

        if node.depth >= limits.max_depth || node.state.is_wiped(Side::Player) {
            continue;
        }

        for action in prune_actions(&node.state) {
            let Some(enemy_action) = select_enemy_action(&node.state, rng) else {
                continue;
            };
            let mut next = node.state.clone();
            simulate_turn(&mut next, &action, &enemy_action, rng);
            if resolve_faints(&mut next, resolver).player_out {
                continue;
            }

            let mut path = node.path.clone();
            path.push(PlannedTurn { action, enemy_action });
            queue.push_back(SearchNode {
                state: next,
                path,
                depth: node.depth + 1,
            });
        }
    }

    debug!("tier {acceptable}: exhausted after {explored} nodes");
    None
}

/// Player actions worth expanding. Status moves always survive; damaging
/// moves must be near the best average or a guaranteed kill; switches are
/// screened against the opponent's crit-inclusive damage.
pub fn prune_actions(state: &BattleState) -> Vec<Action> {
    let all = generate_possible_actions(state, Side::Player);
    let active = state.active(Side::Player);
    let enemy = state.active(Side::Opponent);

    let best_average = all
        .iter()
        .filter_map(Action::as_move)
        .filter(|mv| !mv.is_status())
        .map(|mv| damage_between(active, enemy, mv).average)
        .max()
        .unwrap_or(0);

    let worst_percent_against = |target: &Battler| -> (f64, f64) {
        let hp = target.current_hp.max(1) as f64;
        enemy
            .moves
            .iter()
            .filter(|mv| !mv.is_status())
            .map(|mv| damage_between(enemy, target, mv))
            .fold((0.0f64, 0.0f64), |(worst, best), damage| {
                (
                    worst.max(damage.crit_max() as f64 / hp * 100.0),
                    best.max(damage.max as f64 / hp * 100.0),
                )
            })
    };
    let (current_worst, _) = worst_percent_against(active);

    all.into_iter()
        .filter(|action| match action {
            Action::Move { mv, .. } => {
                if mv.is_status() {
                    return true;
                }
                let damage = damage_between(active, enemy, mv);
                damage.average as f64 >= best_average as f64 * KEEP_DAMAGE_RATIO
                    || damage.min >= enemy.current_hp
            }
            Action::Switch { switch_to_index, .. } => {
                let Some(switch_in) = state.player.get(*switch_to_index) else {
                    return false;
                };
                let (worst, best) = worst_percent_against(switch_in);
                let mut can_kill = false;
                let mut can_threaten = false;
                for mv in switch_in.moves.iter().filter(|mv| !mv.is_status()) {
                    let damage = damage_between(switch_in, enemy, mv);
                    can_kill |= damage.min >= enemy.current_hp;
                    can_threaten |= damage.average as f64 > enemy.current_hp as f64 * THREATEN_RATIO;
                }
                let defensive = worst < current_worst * DEFENSIVE_SWITCH_RATIO;

                if can_kill || defensive {
                    true
                } else if worst > RISKY_SWITCH_PERCENT {
                    false
                } else {
                    best < SAFE_SWITCH_PERCENT || can_threaten
                }
            }
        })
        .collect()
}

/// Replays `path` once with average rolls and once worst case. The plan is
/// accepted only if both replays wipe the opponent and the worst case loses
/// at most `acceptable` combatants.
pub fn validate_path(
    initial: &BattleState,
    path: &[PlannedTurn],
    acceptable: usize,
    resolver: &dyn ForcedSwitchResolver,
    rng: &mut impl Rng,
) -> Option<PathValidation> {
    let average = replay_path(initial, path, SimMode::Average, resolver, rng);
    let worst_case = replay_path(initial, path, SimMode::WorstCase, resolver, rng);

    if !average.victory || !worst_case.victory || worst_case.deaths > acceptable {
        return None;
    }

    Some(PathValidation {
        risk_tier: RiskTier::classify(average.deaths, worst_case.deaths),
        average,
        worst_case,
    })
}

pub fn replay_path(
    initial: &BattleState,
    path: &[PlannedTurn],
    mode: SimMode,
    resolver: &dyn ForcedSwitchResolver,
    rng: &mut impl Rng,
) -> PathReplay {
    let mut state = initial.clone();
    let mut steps = Vec::with_capacity(path.len());
    let mut deaths = 0;

    for turn in path {
        let before = AliveCounts::of(&state);
        let mut events = resolve_turn(&mut state, &turn.action, &turn.enemy_action, mode, rng);
        events.extend(resolve_faints(&mut state, resolver).events);
        let step = PlanStep::record(
            &state,
            before,
            turn.action.clone(),
            Some(turn.enemy_action.clone()),
            events,
        );
        deaths += step.player_deaths;
        steps.push(step);
    }

    PathReplay {
        victory: state.is_wiped(Side::Opponent),
        deaths,
        steps,
    }
}

/// Plays the first surviving pruned action each turn until the battle ends.
fn loss_strategy(
    initial: &BattleState,
    max_depth: usize,
    resolver: &dyn ForcedSwitchResolver,
    rng: &mut impl Rng,
) -> TieredResult {
    let mut state = initial.clone();
    let mut steps = Vec::new();

    for _ in 0..max_depth {
        if state.is_wiped(Side::Player) || state.is_wiped(Side::Opponent) {
            break;
        }
        let Some(action) = prune_actions(&state).into_iter().next() else {
            break;
        };
        let Some(enemy_action) = select_enemy_action(&state, rng) else {
            break;
        };

        let before = AliveCounts::of(&state);
        let mut events = simulate_turn(&mut state, &action, &enemy_action, rng);
        let faints = resolve_faints(&mut state, resolver);
        events.extend(faints.events);
        steps.push(PlanStep::record(&state, before, action, Some(enemy_action), events));
        if faints.player_out {
            break;
        }
    }

    let deaths = state.player.iter().filter(|b| b.is_fainted()).count();
    let risk_tier = if state.is_wiped(Side::Opponent) {
        RiskTier::UnlikelyWin
    } else {
        RiskTier::GuaranteedLoss
    };

    TieredResult {
        strategy: steps,
        worst_case_strategy: Vec::new(),
        risk_tier,
        average_deaths: deaths,
        worst_case_deaths: deaths,
        turns_to_win: None,
        acceptable_losses: None,
    }
}
