use crate::error::{PlannerError, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageClass {
    Physical,
    Special,
    #[default]
    Status,
}

fn default_move_type() -> String {
    "normal".to_string()
}

fn default_accuracy() -> u32 {
    100
}

fn default_level() -> u32 {
    100
}

/// Resolved move record. Every numeric field falls back to the neutral
/// status-move value when the source data omits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub name: String,
    #[serde(rename = "type", default = "default_move_type")]
    pub move_type: String,
    #[serde(default)]
    pub power: u32,
    #[serde(default = "default_accuracy")]
    pub accuracy: u32,
    #[serde(default)]
    pub damage_class: DamageClass,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub effect_chance: Option<u32>,
    /// Short effect description, e.g. "Has a 10% chance to burn the target."
    #[serde(default)]
    pub effect: Option<String>,
}

impl Move {
    pub fn placeholder(name: impl Into<String>) -> Self {
        Move {
            name: name.into(),
            move_type: default_move_type(),
            power: 0,
            accuracy: default_accuracy(),
            damage_class: DamageClass::Status,
            priority: 0,
            effect_chance: None,
            effect: None,
        }
    }

    pub fn is_status(&self) -> bool {
        self.damage_class == DamageClass::Status
    }

    pub fn id(&self) -> String {
        normalize_move_id(&self.name)
    }
}

/// A roster move slot: either full move data or a bare name that still has
/// to be resolved against a move table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MoveEntry {
    Full(Move),
    Name(String),
}

impl From<Move> for MoveEntry {
    fn from(mv: Move) -> Self {
        MoveEntry::Full(mv)
    }
}

impl MoveEntry {
    pub fn resolve(&self, table: &HashMap<String, Move>) -> Move {
        match self {
            MoveEntry::Full(mv) => mv.clone(),
            MoveEntry::Name(name) => match table.get(&normalize_move_id(name)) {
                Some(mv) => mv.clone(),
                None => {
                    warn!("no data found for move {name}, treating it as a status move");
                    Move::placeholder(name.clone())
                }
            },
        }
    }
}

pub fn normalize_move_id(name: &str) -> String {
    name.trim()
        .to_ascii_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u32,
    #[serde(alias = "attack")]
    pub atk: u32,
    #[serde(alias = "defense")]
    pub def: u32,
    #[serde(alias = "special-attack", alias = "specialAttack")]
    pub spa: u32,
    #[serde(alias = "special-defense", alias = "specialDefense")]
    pub spd: u32,
    #[serde(alias = "speed")]
    pub spe: u32,
}

impl Stats {
    pub fn uniform(value: u32) -> Self {
        Stats {
            hp: value,
            atk: value,
            def: value,
            spa: value,
            spd: value,
            spe: value,
        }
    }

    pub fn max_ivs() -> Self {
        Self::uniform(31)
    }

    pub fn values(&self) -> [u32; 6] {
        [self.hp, self.atk, self.def, self.spa, self.spd, self.spe]
    }
}

/// Roster entry as supplied by the host application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pokemon {
    pub name: String,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default = "default_level")]
    pub level: u32,
    pub types: Vec<String>,
    #[serde(alias = "stats")]
    pub base_stats: Stats,
    #[serde(default = "Stats::max_ivs")]
    pub ivs: Stats,
    #[serde(default)]
    pub evs: Stats,
    #[serde(default)]
    pub nature: Option<String>,
    #[serde(default)]
    pub ability: Option<String>,
    #[serde(default)]
    pub moves: Vec<MoveEntry>,
}

impl Pokemon {
    /// Replaces every named move slot with its data from `table`.
    pub fn with_move_data(mut self, table: &HashMap<String, Move>) -> Self {
        self.moves = self
            .moves
            .iter()
            .map(|entry| MoveEntry::Full(entry.resolve(table)))
            .collect();
        self
    }

    pub fn resolved_moves(&self) -> Vec<Move> {
        let empty = HashMap::new();
        self.moves.iter().map(|entry| entry.resolve(&empty)).collect()
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| PlannerError::InvalidCombatant {
            name: self.name.clone(),
            reason,
        };
        if self.types.is_empty() || self.types.len() > 2 {
            return Err(invalid(format!(
                "expected 1 or 2 types, got {}",
                self.types.len()
            )));
        }
        if self.moves.len() > 4 {
            return Err(invalid(format!(
                "at most 4 moves allowed, got {}",
                self.moves.len()
            )));
        }
        if !(1..=100).contains(&self.level) {
            return Err(invalid(format!("level {} outside 1-100", self.level)));
        }
        if self.ivs.values().iter().any(|iv| *iv > 31) {
            return Err(invalid("IVs must be within 0-31".to_string()));
        }
        if self.evs.values().iter().any(|ev| *ev > 252) {
            return Err(invalid("EVs must be within 0-252".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RostersFile {
    pub player_team: Vec<Pokemon>,
    pub enemy_team: Vec<Pokemon>,
    #[serde(default)]
    pub player_lead: usize,
    #[serde(default)]
    pub enemy_lead: usize,
    /// Move table used to resolve moves given by name only.
    #[serde(default)]
    pub move_data: HashMap<String, Move>,
}

impl RostersFile {
    pub fn validate(&self) -> Result<()> {
        for p in self.player_team.iter().chain(self.enemy_team.iter()) {
            p.validate()?;
        }
        Ok(())
    }

    pub fn move_table(&self) -> HashMap<String, Move> {
        self.move_data
            .iter()
            .map(|(name, mv)| (normalize_move_id(name), mv.clone()))
            .collect()
    }
}
