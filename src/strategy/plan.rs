use crate::sim::actions::Action;
use crate::sim::events::BattleEvent;
use crate::sim::state::{ActiveSnapshot, BattleState, Side};
use crate::strategy::analysis::MoveGrade;
use crate::strategy::risk::ActionRisk;
use serde::Serialize;

/// One resolved turn of a plan.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanStep {
    pub turn: u32,
    pub action: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enemy_action: Option<Action>,
    pub events: Vec<BattleEvent>,
    pub player_deaths: usize,
    pub opponent_deaths: usize,
    pub active: ActiveSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk: Option<ActionRisk>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<MoveGrade>,
}

/// Alive counts taken before a turn, used to attribute deaths to it.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AliveCounts {
    player: usize,
    opponent: usize,
}

impl AliveCounts {
    pub(crate) fn of(state: &BattleState) -> Self {
        AliveCounts {
            player: state.alive_count(Side::Player),
            opponent: state.alive_count(Side::Opponent),
        }
    }
}

impl PlanStep {
    pub(crate) fn record(
        state: &BattleState,
        before: AliveCounts,
        action: Action,
        enemy_action: Option<Action>,
        events: Vec<BattleEvent>,
    ) -> Self {
        let after = AliveCounts::of(state);
        PlanStep {
            turn: state.turn,
            action,
            enemy_action,
            events,
            player_deaths: before.player.saturating_sub(after.player),
            opponent_deaths: before.opponent.saturating_sub(after.opponent),
            active: state.snapshot(),
            risk: None,
            reasoning: None,
            grade: None,
        }
    }
}
