use crate::sim::events::{BattleLog, EventKind};
use crate::sim::state::{Battler, Side, Status};
use phf::phf_map;
use rand::Rng;

pub const FREEZE_THAW_CHANCE: f64 = 0.2;
pub const FULL_PARALYSIS_CHANCE: f64 = 0.25;
pub const CONFUSION_SELF_HIT_CHANCE: f64 = 0.33;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StatusMoveEffect {
    Inflict(Status),
    Confuse,
}

static STATUS_MOVES: phf::Map<&'static str, StatusMoveEffect> = phf_map! {
    "hypnosis" => StatusMoveEffect::Inflict(Status::Sleep),
    "sleep-powder" => StatusMoveEffect::Inflict(Status::Sleep),
    "spore" => StatusMoveEffect::Inflict(Status::Sleep),
    "thunder-wave" => StatusMoveEffect::Inflict(Status::Paralysis),
    "stun-spore" => StatusMoveEffect::Inflict(Status::Paralysis),
    "glare" => StatusMoveEffect::Inflict(Status::Paralysis),
    "will-o-wisp" => StatusMoveEffect::Inflict(Status::Burn),
    "scald" => StatusMoveEffect::Inflict(Status::Burn),
    "flare-blitz" => StatusMoveEffect::Inflict(Status::Burn),
    "poison-powder" => StatusMoveEffect::Inflict(Status::Poison),
    "poison-gas" => StatusMoveEffect::Inflict(Status::Poison),
    "toxic" => StatusMoveEffect::Inflict(Status::Toxic),
    "confuse-ray" => StatusMoveEffect::Confuse,
    "supersonic" => StatusMoveEffect::Confuse,
    "swagger" => StatusMoveEffect::Confuse,
};

/// Effect of a status-class move, looked up by its normalized name.
pub fn status_move_effect(move_id: &str) -> Option<StatusMoveEffect> {
    STATUS_MOVES.get(move_id).copied()
}

/// Returns false, leaving the target untouched, when it already has a status.
pub fn apply_status_effect(
    target: &mut Battler,
    status: Status,
    log: &mut BattleLog,
    rng: &mut impl Rng,
) -> bool {
    let name = target.display_name();
    if let Some(existing) = target.status {
        log.log(
            EventKind::StatusFail,
            format!("{name} is already {}!", existing.adjective()),
        );
        return false;
    }

    target.status = Some(status);
    let text = match status {
        Status::Sleep => {
            target.status_counter = rng.gen_range(1..=3);
            format!("{name} fell asleep!")
        }
        Status::Paralysis => format!("{name} was paralyzed!"),
        Status::Burn => format!("{name} was burned!"),
        Status::Poison => format!("{name} was poisoned!"),
        Status::Toxic => {
            target.status_counter = 1;
            format!("{name} was badly poisoned!")
        }
        Status::Freeze => format!("{name} was frozen solid!"),
    };
    log.log(EventKind::Status, text);
    true
}

/// Resolves whether `battler` may act this turn. Checks run in the order
/// sleep, freeze, paralysis, confusion; the first blocking check wins.
pub fn can_act(
    battler: &mut Battler,
    side: Side,
    log: &mut BattleLog,
    worst_case: bool,
    rng: &mut impl Rng,
) -> bool {
    let name = battler.display_name();

    if battler.status == Some(Status::Sleep) && battler.status_counter > 0 {
        battler.status_counter -= 1;
        log.log(EventKind::StatusPrevent, format!("{name} is fast asleep!"));
        if battler.status_counter == 0 {
            battler.status = None;
            log.log(EventKind::StatusCure, format!("{name} woke up!"));
        }
        // waking up still costs the turn
        return false;
    }

    if battler.status == Some(Status::Freeze) {
        let thaw_chance = if worst_case { 0.0 } else { FREEZE_THAW_CHANCE };
        if rng.gen::<f64>() >= thaw_chance {
            log.log(EventKind::StatusPrevent, format!("{name} is frozen solid!"));
            return false;
        }
        battler.status = None;
        log.log(EventKind::StatusCure, format!("{name} thawed out!"));
    }

    if battler.status == Some(Status::Paralysis) {
        let para_chance = if worst_case { 1.0 } else { FULL_PARALYSIS_CHANCE };
        if rng.gen::<f64>() < para_chance {
            log.log(EventKind::StatusPrevent, format!("{name} is fully paralyzed!"));
            return false;
        }
    }

    if battler.confusion > 0 {
        battler.confusion -= 1;
        log.log(EventKind::Confusion, format!("{name} is confused!"));

        let self_hit_chance = if worst_case { 1.0 } else { CONFUSION_SELF_HIT_CHANCE };
        if rng.gen::<f64>() < self_hit_chance {
            let damage = (battler.stats.hp as f64 * 0.1).floor() as u32;
            let dealt = battler.take_damage(damage);
            log.log(
                EventKind::ConfusionDamage,
                format!("{name} hurt itself in confusion! {dealt} damage."),
            );
            if battler.is_fainted() {
                log.log_faint(side, &battler.name);
            }
            return false;
        }

        if battler.confusion == 0 {
            log.log(EventKind::ConfusionEnd, format!("{name} snapped out of confusion!"));
        }
    }

    true
}

/// Burn, poison and toxic chip damage. Fainted battlers are skipped.
pub fn apply_end_of_turn_status(battler: &mut Battler, side: Side, log: &mut BattleLog) {
    if battler.is_fainted() {
        return;
    }

    let max_hp = battler.stats.hp;
    match battler.status {
        Some(Status::Burn) => {
            let dealt = battler.take_damage(max_hp / 16);
            log.log_residual(EventKind::BurnDamage, &battler.name, "its burn", dealt);
        }
        Some(Status::Poison) => {
            let dealt = battler.take_damage(max_hp / 8);
            log.log_residual(EventKind::PoisonDamage, &battler.name, "poison", dealt);
        }
        Some(Status::Toxic) => {
            let damage = (max_hp as f64 / 16.0 * battler.status_counter as f64).floor() as u32;
            let dealt = battler.take_damage(damage);
            battler.status_counter += 1;
            log.log_residual(EventKind::ToxicDamage, &battler.name, "toxic", dealt);
        }
        _ => {}
    }

    if battler.is_fainted() {
        log.log_faint(side, &battler.name);
    }
}
