use crate::ai::enemy::{is_listed_high_crit_move, pick_best, score_moves};
use crate::sim::actions::Action;
use crate::sim::damage::damage_between;
use crate::sim::state::{capitalize, BattleState, Battler, Side};
use rand::Rng;
use serde::Serialize;

pub const DEFAULT_ODDS_TRIALS: usize = 1000;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 5.0 {
            RiskLevel::High
        } else if score >= 3.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MoveOdds {
    pub name: String,
    pub percent: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiMoveAnalysis {
    pub most_likely: Option<String>,
    pub odds: Vec<MoveOdds>,
    pub influence: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRisk {
    pub level: RiskLevel,
    pub reasons: Vec<String>,
    pub score: f64,
    pub probability: f64,
    pub crit_risks: Vec<String>,
    pub status_risks: Vec<String>,
    pub ai_move_analysis: AiMoveAnalysis,
}

#[derive(Default)]
struct RiskAccumulator {
    score: f64,
    reasons: Vec<String>,
    crit_risks: Vec<String>,
    status_risks: Vec<String>,
}

impl RiskAccumulator {
    fn reason(&mut self, weight: f64, text: String) {
        self.score += weight;
        self.reasons.push(text);
    }
}

/// Risk profile of `side` taking `action` this turn. Opponent move odds are
/// only estimated when the player is acting.
pub fn calculate_action_risk(
    state: &BattleState,
    action: &Action,
    side: Side,
    odds_trials: usize,
    rng: &mut impl Rng,
) -> ActionRisk {
    let attacker = state.active(side);
    let defender = state.active(side.opponent());
    let mut acc = RiskAccumulator::default();
    let mut analysis = AiMoveAnalysis::default();

    match action {
        Action::Move { mv, .. } if !mv.is_status() => {
            if side.is_player() {
                analysis = calculate_ai_move_odds(defender, attacker, odds_trials, rng);
            }
            retaliation_risks(&mut acc, defender, attacker);
            status_exposure(&mut acc, defender, attacker);

            let damage = damage_between(attacker, defender, mv);
            let min_kills = damage.min >= defender.current_hp;
            let max_kills = damage.max >= defender.current_hp;
            if max_kills && !min_kills {
                let chance = calculate_kill_probability(damage.min, damage.max, defender.current_hp);
                acc.reason(
                    1.0,
                    format!("Kill depends on damage roll ({}% chance)", (chance * 100.0).round()),
                );
            }

            if damage.effectiveness == 0.0 {
                acc.reason(5.0, "Immune to attack".to_string());
            } else if damage.effectiveness < 1.0 {
                acc.reason(1.0, "Resisted attack".to_string());
            }

            if defender.stats.spe > attacker.stats.spe && !min_kills {
                acc.reason(1.0, "Opponent moves first".to_string());
            }

            if let (Some(chance), Some(effect)) = (mv.effect_chance, mv.effect.as_deref()) {
                if effect.to_ascii_lowercase().contains("flinch") && attacker.stats.spe > defender.stats.spe {
                    acc.reason(-0.5, format!("Flinch chance ({chance}%) - prevents enemy move"));
                }
            }
        }
        Action::Move { .. } => {}
        Action::Switch { switch_to_index, .. } => {
            if let Some(switch_in) = state.team(side).get(*switch_to_index) {
                if side.is_player() {
                    analysis = calculate_ai_move_odds(defender, switch_in, odds_trials, rng);
                }
                switch_in_risks(&mut acc, defender, switch_in);
            }
            acc.reason(1.0, "Free attack for opponent".to_string());
        }
    }

    ActionRisk {
        level: RiskLevel::from_score(acc.score),
        reasons: acc.reasons,
        score: acc.score,
        probability: (1.0 - acc.score * 0.15).max(0.0),
        crit_risks: acc.crit_risks,
        status_risks: acc.status_risks,
        ai_move_analysis: analysis,
    }
}

fn retaliation_risks(acc: &mut RiskAccumulator, foe: &Battler, target: &Battler) {
    let mut best: Option<(u32, &str)> = None;
    for mv in foe.moves.iter().filter(|mv| !mv.is_status()) {
        let damage = damage_between(foe, target, mv);
        if best.map_or(true, |(max, _)| damage.max > max) && damage.max > 0 {
            best = Some((damage.max, mv.name.as_str()));
        }

        let crit = damage.crit_max();
        if crit >= target.current_hp && damage.max < target.current_hp {
            let high_crit = is_listed_high_crit_move(&mv.name);
            let chance = if high_crit { 12.5 } else { 6.25 };
            acc.crit_risks.push(format!(
                "{} crit OHKO ({chance}% chance, {crit} dmg)",
                capitalize(&mv.name)
            ));
            acc.score += if high_crit { 2.0 } else { 1.0 };
        }
    }

    if let Some((max, name)) = best {
        if max >= target.current_hp {
            acc.reason(3.0, format!("OHKO risk from {} ({max} dmg)", capitalize(name)));
        } else if max * 2 >= target.current_hp {
            acc.reason(2.0, format!("2HKO risk from {} ({max} dmg)", capitalize(name)));
        }
    }
}

/// Secondary-effect exposure, read from each foe move's declared effect text.
fn status_exposure(acc: &mut RiskAccumulator, foe: &Battler, target: &Battler) {
    for mv in &foe.moves {
        let (Some(chance), Some(effect)) = (mv.effect_chance, mv.effect.as_deref()) else {
            continue;
        };
        let effect = effect.to_ascii_lowercase();
        let (weight, text) = if effect.contains("burn") || mv.id().contains("will-o-wisp") {
            (1.0, format!("Burn risk ({chance}% chance) - halves attack"))
        } else if effect.contains("paralyze") || effect.contains("paralysis") {
            (1.0, format!("Paralyze risk ({chance}% chance) - 25% full paralysis"))
        } else if effect.contains("poison") {
            (0.5, format!("Poison risk ({chance}% chance) - ongoing damage"))
        } else if effect.contains("confus") {
            (1.0, format!("Confusion risk ({chance}% chance) - 33% self-hit"))
        } else if effect.contains("flinch") && foe.stats.spe > target.stats.spe {
            (1.0, format!("Flinch risk ({chance}% chance) - can't move"))
        } else if effect.contains("freeze") {
            (1.5, format!("Freeze risk ({chance}% chance) - can't move"))
        } else {
            continue;
        };
        acc.score += weight;
        acc.status_risks.push(text);
    }
}

fn switch_in_risks(acc: &mut RiskAccumulator, foe: &Battler, switch_in: &Battler) {
    let mut best: Option<(u32, &str)> = None;
    for mv in foe.moves.iter().filter(|mv| !mv.is_status()) {
        let damage = damage_between(foe, switch_in, mv);
        if best.map_or(true, |(max, _)| damage.max > max) && damage.max > 0 {
            best = Some((damage.max, mv.name.as_str()));
        }
        let crit = damage.crit_max();
        if crit >= switch_in.current_hp && damage.max < switch_in.current_hp {
            acc.crit_risks.push(format!(
                "{} crit can OHKO switch-in ({crit} dmg)",
                capitalize(&mv.name)
            ));
            acc.score += 1.0;
        }
    }

    if let Some((max, name)) = best {
        if max >= switch_in.current_hp {
            acc.reason(4.0, format!("Switch-in OHKO'd by {} ({max} dmg)", capitalize(name)));
        } else if max * 2 >= switch_in.current_hp {
            acc.reason(2.0, format!("Switch-in 2HKO'd by {} ({max} dmg)", capitalize(name)));
        }
    }
}

/// Monte-Carlo estimate of which move the trainer AI picks with `enemy`
/// against `target`, plus hints on how the player can sway that choice.
pub fn calculate_ai_move_odds(
    enemy: &Battler,
    target: &Battler,
    trials: usize,
    rng: &mut impl Rng,
) -> AiMoveAnalysis {
    if enemy.moves.is_empty() || trials == 0 {
        return AiMoveAnalysis::default();
    }

    let mut counts = vec![0usize; enemy.moves.len()];
    for _ in 0..trials {
        let scored = score_moves(enemy, target, rng);
        if let Some(idx) = pick_best(&scored, rng) {
            counts[idx] += 1;
        }
    }

    let odds: Vec<MoveOdds> = enemy
        .moves
        .iter()
        .zip(&counts)
        .map(|(mv, count)| MoveOdds {
            name: mv.name.clone(),
            percent: (*count as f64 / trials as f64 * 1000.0).round() / 10.0,
        })
        .collect();

    let mut ranked: Vec<&MoveOdds> = odds.iter().collect();
    ranked.sort_by(|a, b| b.percent.total_cmp(&a.percent));

    let mut influence = Vec::new();
    let top = ranked[0];
    if top.percent > 70.0 {
        influence.push(format!(
            "{} is highly likely ({}%) - AI sees it as strongest",
            top.name, top.percent
        ));
    } else if ranked.len() > 1 && (ranked[0].percent - ranked[1].percent).abs() < 10.0 {
        influence.push(format!(
            "Close decision between {} and {} due to similar damage rolls",
            ranked[0].name, ranked[1].name
        ));
    }

    for mv in enemy.moves.iter().filter(|mv| !mv.is_status()) {
        let damage = damage_between(enemy, target, mv);
        if damage.max >= target.current_hp && damage.min < target.current_hp {
            influence.push(format!(
                "Staying above {} HP prevents guaranteed {} selection",
                damage.min, mv.name
            ));
        }
    }

    AiMoveAnalysis {
        most_likely: Some(top.name.clone()),
        odds,
        influence,
    }
}

/// Share of uniform rolls in `min..=max` that reach `threshold`.
pub fn calculate_kill_probability(min: u32, max: u32, threshold: u32) -> f64 {
    if min >= threshold {
        return 1.0;
    }
    if max < threshold {
        return 0.0;
    }
    (max - threshold) as f64 / (max - min) as f64
}
