use crate::sim::state::{capitalize, Side};
use crate::types::effectiveness_text;
use serde::Serialize;
use serde_json::json;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    Switch,
    MoveUse,
    Move,
    Faint,
    Status,
    StatusFail,
    StatusPrevent,
    StatusCure,
    Confusion,
    ConfusionDamage,
    ConfusionEnd,
    BurnDamage,
    PoisonDamage,
    ToxicDamage,
    AccuracyRisk,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damage: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effectiveness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<u32>,
    pub text: String,
}

impl BattleEvent {
    pub fn new(kind: EventKind, text: impl Into<String>) -> Self {
        BattleEvent {
            kind,
            side: None,
            move_name: None,
            damage: None,
            effectiveness: None,
            accuracy: None,
            text: text.into(),
        }
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    pub fn switch(side: Side, name: &str, forced: bool) -> Self {
        let who = if side.is_player() { "You" } else { "Enemy" };
        let text = if forced {
            format!("{who} sent out {}!", capitalize(name))
        } else {
            format!("{who} switched to {}!", capitalize(name))
        };
        BattleEvent::new(EventKind::Switch, text).with_side(side)
    }
}

/// Ordered, human-readable record of what happened during one turn.
#[derive(Clone, Debug, Default)]
pub struct BattleLog {
    events: Vec<BattleEvent>,
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn log_switch(&mut self, side: Side, name: &str) {
        self.push(BattleEvent::switch(side, name, false));
    }

    pub fn log_move_use(&mut self, side: Side, user: &str, move_name: &str) {
        let mut event = BattleEvent::new(
            EventKind::MoveUse,
            format!("{} used {}!", capitalize(user), capitalize(move_name)),
        )
        .with_side(side);
        event.move_name = Some(move_name.to_string());
        self.push(event);
    }

    pub fn log_damage(&mut self, side: Side, move_name: &str, damage: u32, effectiveness: f64) {
        let mut event = BattleEvent::new(
            EventKind::Move,
            format!("{damage} damage.{}", effectiveness_text(effectiveness)),
        )
        .with_side(side);
        event.move_name = Some(move_name.to_string());
        event.damage = Some(damage);
        event.effectiveness = Some(effectiveness);
        self.push(event);
    }

    pub fn log_accuracy_risk(&mut self, side: Side, move_name: &str, accuracy: u32) {
        let mut event = BattleEvent::new(
            EventKind::AccuracyRisk,
            format!(
                "{} has {accuracy}% accuracy - risk of missing",
                capitalize(move_name)
            ),
        )
        .with_side(side);
        event.move_name = Some(move_name.to_string());
        event.accuracy = Some(accuracy);
        self.push(event);
    }

    /// `side` is the side that lost the combatant.
    pub fn log_faint(&mut self, side: Side, name: &str) {
        self.push(
            BattleEvent::new(EventKind::Faint, format!("{} fainted!", capitalize(name)))
                .with_side(side),
        );
    }

    pub fn log(&mut self, kind: EventKind, text: impl Into<String>) {
        self.push(BattleEvent::new(kind, text));
    }

    pub fn log_residual(&mut self, kind: EventKind, name: &str, what: &str, damage: u32) {
        let mut event = BattleEvent::new(
            kind,
            format!("{} was hurt by {what}! {damage} damage.", capitalize(name)),
        );
        event.damage = Some(damage);
        self.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "events": self.events,
            "text": self.events.iter().map(|e| e.text.as_str()).collect::<Vec<_>>(),
        })
    }
}
