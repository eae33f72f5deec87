use crate::sim::actions::Action;
use crate::sim::damage::damage_between;
use crate::sim::state::{capitalize, BattleState, Side, Status};
use crate::sim::status::{status_move_effect, StatusMoveEffect};
use crate::sim::switching::switch_in_score;

/// One-line reasoning for a player action. Opponent actions are not
/// explained and yield an empty string.
pub fn explain_action(state: &BattleState, action: &Action, side: Side) -> String {
    if !side.is_player() {
        return String::new();
    }

    let active = state.active(Side::Player);
    let enemy = state.active(Side::Opponent);

    match action {
        Action::Switch { switch_to_index, name } => {
            let target = capitalize(name);
            let score = switch_in_score(state.player.get(*switch_to_index), enemy);
            if score >= 4 {
                format!("Switching to {target} for a favorable matchup (faster and can 2HKO+)")
            } else if score >= 2 {
                format!("Switching to {target} for better positioning")
            } else if score <= -1 {
                format!("Defensive switch to {target} to avoid OHKO")
            } else {
                format!("Switching to {target}")
            }
        }
        Action::Move { mv, .. } if !mv.is_status() => {
            let damage = damage_between(active, enemy, mv);
            let hp = enemy.current_hp;
            let name = capitalize(&mv.name);
            if damage.min >= hp {
                format!("GUARANTEED KO - {name} deals {}-{} damage vs {hp} HP", damage.min, damage.max)
            } else if damage.average >= hp {
                format!("LIKELY KO - {name} averages {} damage vs {hp} HP", damage.average)
            } else if damage.max >= hp {
                format!("POSSIBLE KO - {name} max rolls {} vs {hp} HP", damage.max)
            } else {
                let percent = if hp == 0 { 0 } else { damage.average * 100 / hp };
                format!("Chip damage - {name} deals ~{percent}% ({} damage)", damage.average)
            }
        }
        Action::Move { mv, .. } => {
            let foe = enemy.display_name();
            match status_move_effect(&mv.id()) {
                Some(StatusMoveEffect::Inflict(Status::Sleep)) => {
                    format!("Status move - Putting {foe} to sleep")
                }
                Some(StatusMoveEffect::Inflict(Status::Paralysis)) => {
                    format!("Status move - Paralyzing {foe} (speed cut, 25% para chance)")
                }
                Some(StatusMoveEffect::Inflict(Status::Burn)) => {
                    format!("Status move - Burning {foe} (halves attack)")
                }
                Some(StatusMoveEffect::Inflict(Status::Toxic)) => {
                    format!("Status move - Badly poisoning {foe} (increasing damage)")
                }
                Some(StatusMoveEffect::Inflict(Status::Poison)) => {
                    format!("Status move - Poisoning {foe}")
                }
                Some(StatusMoveEffect::Confuse) => format!("Status move - Confusing {foe}"),
                _ => format!("Using {}", capitalize(&mv.name)),
            }
        }
    }
}
