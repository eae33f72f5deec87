//! Move quality grading: ranks every option of the active battler on a
//! 0-100ish scale and grades a chosen option by its distance to the best.

use crate::model::Move;
use crate::sim::actions::Action;
use crate::sim::damage::damage_between;
use crate::sim::state::{BattleState, Battler, Side};
use crate::types::type_effectiveness;
use serde::Serialize;

const DAMAGE_WEIGHT: f64 = 0.3;
const SPEED_WEIGHT: f64 = 0.15;
const TYPE_WEIGHT: f64 = 0.2;
const SURVIVAL_WEIGHT: f64 = 0.35;

const SWITCH_BASELINE: f64 = 50.0;
const TEMPO_PENALTY: f64 = 15.0;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionEvaluation {
    pub action: Action,
    pub score: i32,
    pub reasons: Vec<String>,
}

/// Scores every move of `attacker` and every healthy bench switch in
/// `team`, best first. Equal scores keep generation order.
pub fn evaluate_all_actions(
    attacker: &Battler,
    defender: &Battler,
    team: &[Battler],
    active_index: usize,
) -> Vec<ActionEvaluation> {
    let mut evaluations: Vec<ActionEvaluation> = attacker
        .moves
        .iter()
        .enumerate()
        .map(|(move_index, mv)| {
            let (score, reasons) = evaluate_move(attacker, defender, mv);
            ActionEvaluation {
                action: Action::Move {
                    move_index,
                    mv: mv.clone(),
                },
                score,
                reasons,
            }
        })
        .collect();

    for (idx, candidate) in team.iter().enumerate() {
        if idx == active_index || candidate.current_hp == 0 {
            continue;
        }
        let (score, reasons) = evaluate_switch(attacker, defender, candidate);
        evaluations.push(ActionEvaluation {
            action: Action::Switch {
                switch_to_index: idx,
                name: candidate.name.clone(),
            },
            score,
            reasons,
        });
    }

    evaluations.sort_by(|a, b| b.score.cmp(&a.score));
    evaluations
}

fn evaluate_move(attacker: &Battler, defender: &Battler, mv: &Move) -> (i32, Vec<String>) {
    let mut reasons = Vec::new();
    let mut score = 0.0;

    let parts = [
        (damage_component(attacker, defender, mv), DAMAGE_WEIGHT),
        (speed_component(attacker, defender), SPEED_WEIGHT),
        (type_component(attacker, defender), TYPE_WEIGHT),
        (survival_component(attacker, defender), SURVIVAL_WEIGHT),
    ];
    for ((part, reason), weight) in parts {
        score += part * weight;
        if let Some(reason) = reason {
            reasons.push(reason);
        }
    }

    (score.round() as i32, reasons)
}

fn evaluate_switch(current: &Battler, defender: &Battler, target: &Battler) -> (i32, Vec<String>) {
    let mut score = SWITCH_BASELINE;
    let mut reasons = Vec::new();

    if threat_level(defender, current) > 70.0 {
        score += 30.0;
        reasons.push("Current Pokémon is in danger".to_string());
    }

    let advantage = type_advantage(target, defender);
    score += advantage * 0.5;
    if advantage > 50.0 {
        reasons.push("Better type matchup".to_string());
    }

    let target_hp = target.hp_fraction() * 100.0;
    if target_hp < 30.0 {
        score -= 40.0;
        reasons.push("Switch target is low on HP".to_string());
    } else if target.current_hp == target.stats.hp {
        score += 10.0;
        reasons.push("Switch target at full HP".to_string());
    }

    if current.hp_fraction() * 100.0 > 70.0 {
        score -= 20.0;
        reasons.push("Current Pokémon still healthy".to_string());
    }

    score -= TEMPO_PENALTY;
    reasons.push("Loses tempo".to_string());

    (score.round() as i32, reasons)
}

type Component = (f64, Option<String>);

fn average_percent(attacker: &Battler, defender: &Battler, mv: &Move) -> (f64, f64) {
    let damage = damage_between(attacker, defender, mv);
    let average = (damage.min + damage.max) as f64 / 2.0;
    (average, average / defender.current_hp.max(1) as f64 * 100.0)
}

fn damage_component(attacker: &Battler, defender: &Battler, mv: &Move) -> Component {
    if mv.power == 0 {
        return if mv.is_status() {
            (40.0, Some("Status move (utility)".to_string()))
        } else {
            (0.0, None)
        };
    }

    let (average, percent) = average_percent(attacker, defender, mv);
    let shown = percent.round();
    let (score, reason) = if percent >= 100.0 {
        (100.0, format!("Guaranteed KO ({} damage)", average.round()))
    } else if percent >= 80.0 {
        (95.0, format!("Near KO ({shown}% of HP)"))
    } else if percent >= 50.0 {
        (80.0, format!("Heavy damage ({shown}% of HP)"))
    } else if percent >= 30.0 {
        (60.0, format!("Solid damage ({shown}% of HP)"))
    } else if percent >= 15.0 {
        (40.0, format!("Moderate damage ({shown}% of HP)"))
    } else {
        (20.0, format!("Low damage ({shown}% of HP)"))
    };
    (score, Some(reason))
}

fn speed_component(attacker: &Battler, defender: &Battler) -> Component {
    let ours = attacker.stats.spe as f64;
    let theirs = defender.stats.spe as f64;
    let (score, reason) = if ours > theirs * 1.1 {
        (80.0, "Outspeeds opponent")
    } else if ours > theirs {
        (65.0, "Slightly faster")
    } else if ours * 1.1 < theirs {
        (20.0, "Much slower")
    } else {
        (35.0, "Slower")
    };
    (score, Some(reason.to_string()))
}

fn type_component(attacker: &Battler, defender: &Battler) -> Component {
    let advantage = type_advantage(attacker, defender);
    let (score, reason) = if advantage > 70.0 {
        (80.0, "Favorable type matchup")
    } else if advantage > 50.0 {
        (60.0, "Decent type matchup")
    } else if advantage < 30.0 {
        (20.0, "Poor type matchup")
    } else {
        (40.0, "Neutral type matchup")
    };
    (score, Some(reason.to_string()))
}

fn survival_component(attacker: &Battler, defender: &Battler) -> Component {
    let hp = attacker.hp_fraction() * 100.0;
    let threat = threat_level(defender, attacker);
    let (score, reason) = if hp < 25.0 && threat > 70.0 {
        (10.0, "Critical HP - high risk of KO")
    } else if hp < 50.0 && threat > 80.0 {
        (30.0, "Low HP - vulnerable position")
    } else if hp > 75.0 && threat < 50.0 {
        (90.0, "Safe position - good HP")
    } else if threat < 30.0 {
        (80.0, "Opponent poses little threat")
    } else {
        (50.0, "Moderate risk")
    };
    (score, Some(reason.to_string()))
}

/// Bucketed threat of `attacker`'s strongest average hit on `target`.
fn threat_level(attacker: &Battler, target: &Battler) -> f64 {
    let strongest = attacker
        .moves
        .iter()
        .filter(|mv| mv.power > 0)
        .map(|mv| average_percent(attacker, target, mv).1)
        .fold(0.0, f64::max);

    if strongest >= 100.0 {
        100.0
    } else if strongest >= 75.0 {
        90.0
    } else if strongest >= 50.0 {
        70.0
    } else if strongest >= 30.0 {
        50.0
    } else {
        30.0
    }
}

/// How well `battler` resists the move types `opponent` carries, 0-100.
fn type_advantage(battler: &Battler, opponent: &Battler) -> f64 {
    if opponent.moves.is_empty() {
        return 50.0;
    }
    let total: f64 = opponent
        .moves
        .iter()
        .map(|mv| type_effectiveness(&mv.move_type, &battler.types))
        .sum();
    let average = total / opponent.moves.len() as f64;

    if average < 0.5 {
        90.0
    } else if average < 1.0 {
        70.0
    } else if average > 2.0 {
        20.0
    } else if average > 1.0 {
        35.0
    } else {
        50.0
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum MoveQuality {
    Best,
    Excellent,
    Good,
    Inaccuracy,
    Mistake,
    Blunder,
}

impl MoveQuality {
    pub fn from_gap(gap: i32) -> Self {
        match gap {
            i32::MIN..=3 => MoveQuality::Best,
            4..=10 => MoveQuality::Excellent,
            11..=20 => MoveQuality::Good,
            21..=35 => MoveQuality::Inaccuracy,
            36..=50 => MoveQuality::Mistake,
            _ => MoveQuality::Blunder,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MoveQuality::Best => "Best Move",
            MoveQuality::Excellent => "Excellent Move",
            MoveQuality::Good => "Good Move",
            MoveQuality::Inaccuracy => "Inaccuracy",
            MoveQuality::Mistake => "Mistake",
            MoveQuality::Blunder => "Blunder",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            MoveQuality::Best => "!!",
            MoveQuality::Excellent => "!",
            MoveQuality::Good => "",
            MoveQuality::Inaccuracy => "?!",
            MoveQuality::Mistake => "?",
            MoveQuality::Blunder => "??",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveGrade {
    pub quality: MoveQuality,
    pub score_diff: i32,
    pub chosen_score: i32,
    pub best_score: i32,
}

/// Grades `chosen` against the best entry of an already sorted evaluation
/// list. `None` when there is nothing to compare against.
pub fn classify_move(chosen: &ActionEvaluation, all: &[ActionEvaluation]) -> Option<MoveGrade> {
    let best_score = all.first()?.score;
    let score_diff = best_score - chosen.score;
    Some(MoveGrade {
        quality: MoveQuality::from_gap(score_diff),
        score_diff,
        chosen_score: chosen.score,
        best_score,
    })
}

/// Grades the player's `action` against every option of the current turn.
pub fn grade_action(state: &BattleState, action: &Action) -> Option<MoveGrade> {
    let evaluations = evaluate_all_actions(
        state.active(Side::Player),
        state.active(Side::Opponent),
        &state.player,
        state.active_index(Side::Player),
    );
    let chosen = evaluations.iter().find(|e| &e.action == action)?;
    classify_move(chosen, &evaluations)
}
