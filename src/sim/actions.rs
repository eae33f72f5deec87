use crate::model::Move;
use crate::sim::state::{BattleState, Side};
use serde::Serialize;
use std::fmt;

pub const SWITCH_PRIORITY: i32 = 6;

/// A single side's choice for one turn. Indices refer to the roster as it
/// stands this turn only.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    #[serde(rename_all = "camelCase")]
    Move {
        move_index: usize,
        #[serde(rename = "move")]
        mv: Move,
    },
    #[serde(rename_all = "camelCase")]
    Switch { switch_to_index: usize, name: String },
}

impl Action {
    pub fn priority(&self) -> i32 {
        match self {
            Action::Move { mv, .. } => mv.priority,
            Action::Switch { .. } => SWITCH_PRIORITY,
        }
    }

    pub fn is_switch(&self) -> bool {
        matches!(self, Action::Switch { .. })
    }

    pub fn as_move(&self) -> Option<&Move> {
        match self {
            Action::Move { mv, .. } => Some(mv),
            Action::Switch { .. } => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move { mv, .. } => write!(f, "use {}", mv.name),
            Action::Switch { name, .. } => write!(f, "switch to {name}"),
        }
    }
}

/// Every move of the active battler, then every switch to a healthy bench
/// member, in roster order.
pub fn generate_possible_actions(state: &BattleState, side: Side) -> Vec<Action> {
    let active_idx = state.active_index(side);
    let team = state.team(side);
    let mut actions: Vec<Action> = team[active_idx]
        .moves
        .iter()
        .enumerate()
        .map(|(move_index, mv)| Action::Move {
            move_index,
            mv: mv.clone(),
        })
        .collect();
    actions.extend(
        team.iter()
            .enumerate()
            .filter(|(idx, b)| *idx != active_idx && !b.is_fainted())
            .map(|(idx, b)| Action::Switch {
                switch_to_index: idx,
                name: b.name.clone(),
            }),
    );
    actions
}
