use crate::error::{PlannerError, Result};
use crate::model::{Move, Pokemon, RostersFile};
use crate::sim::stats::{calculate_all_stats, StatsSet};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }

    pub fn is_player(self) -> bool {
        self == Side::Player
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => f.write_str("player"),
            Side::Opponent => f.write_str("opponent"),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Sleep,
    Paralysis,
    Burn,
    Poison,
    Toxic,
    Freeze,
}

impl Status {
    pub fn adjective(self) -> &'static str {
        match self {
            Status::Sleep => "asleep",
            Status::Paralysis => "paralyzed",
            Status::Burn => "burned",
            Status::Poison => "poisoned",
            Status::Toxic => "badly poisoned",
            Status::Freeze => "frozen",
        }
    }
}

/// Live combatant record. Stats are computed once on construction.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Battler {
    pub name: String,
    pub species: Option<String>,
    pub level: u32,
    pub types: Vec<String>,
    pub ability: Option<String>,
    pub moves: Vec<Move>,
    pub stats: StatsSet,
    pub current_hp: u32,
    pub fainted: bool,
    pub status: Option<Status>,
    pub status_counter: u32,
    pub confusion: u32,
}

impl Battler {
    pub fn from_pokemon(pokemon: &Pokemon) -> Self {
        let stats = calculate_all_stats(pokemon);
        Battler {
            name: pokemon.name.clone(),
            species: pokemon.species.clone(),
            level: pokemon.level,
            types: pokemon.types.clone(),
            ability: pokemon.ability.clone(),
            moves: pokemon.resolved_moves(),
            stats,
            current_hp: stats.hp,
            fainted: false,
            status: None,
            status_counter: 0,
            confusion: 0,
        }
    }

    pub fn is_fainted(&self) -> bool {
        self.fainted
    }

    pub fn has_ability(&self, ability: &str) -> bool {
        self.ability
            .as_deref()
            .is_some_and(|a| a.eq_ignore_ascii_case(ability))
    }

    pub fn display_name(&self) -> String {
        capitalize(&self.name)
    }

    pub fn hp_fraction(&self) -> f64 {
        if self.stats.hp == 0 {
            return 0.0;
        }
        self.current_hp as f64 / self.stats.hp as f64
    }

    /// Applies damage clamped to the remaining HP and returns the amount
    /// actually dealt. Reaching 0 HP faints the battler for good.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.current_hp);
        self.current_hp -= dealt;
        if self.current_hp == 0 {
            self.fainted = true;
        }
        dealt
    }
}

pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hazards {
    pub stealth_rock: bool,
    pub spikes: u8,
    pub toxic_spikes: u8,
}

/// Tracked for completeness; no modelled mechanic reads these yet.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldEffects {
    pub weather: Option<String>,
    pub terrain: Option<String>,
    pub player_hazards: Hazards,
    pub opponent_hazards: Hazards,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleState {
    pub player: Vec<Battler>,
    pub opponent: Vec<Battler>,
    pub player_active: usize,
    pub opponent_active: usize,
    pub field: FieldEffects,
    pub turn: u32,
}

impl BattleState {
    pub fn new(
        player: &[Pokemon],
        opponent: &[Pokemon],
        player_lead: usize,
        opponent_lead: usize,
    ) -> Result<Self> {
        check_roster(Side::Player, player.len(), player_lead)?;
        check_roster(Side::Opponent, opponent.len(), opponent_lead)?;
        for p in player.iter().chain(opponent.iter()) {
            p.validate()?;
        }
        Ok(BattleState {
            player: player.iter().map(Battler::from_pokemon).collect(),
            opponent: opponent.iter().map(Battler::from_pokemon).collect(),
            player_active: player_lead,
            opponent_active: opponent_lead,
            field: FieldEffects::default(),
            turn: 0,
        })
    }

    /// Builds the state from a roster file, resolving named moves against
    /// its move table first.
    pub fn from_rosters(file: &RostersFile) -> Result<Self> {
        Self::from_rosters_with_leads(file, file.player_lead, file.enemy_lead)
    }

    pub fn from_rosters_with_leads(
        file: &RostersFile,
        player_lead: usize,
        opponent_lead: usize,
    ) -> Result<Self> {
        let table: HashMap<String, Move> = file.move_table();
        let player: Vec<Pokemon> = file
            .player_team
            .iter()
            .map(|p| p.clone().with_move_data(&table))
            .collect();
        let opponent: Vec<Pokemon> = file
            .enemy_team
            .iter()
            .map(|p| p.clone().with_move_data(&table))
            .collect();
        Self::new(&player, &opponent, player_lead, opponent_lead)
    }

    pub fn team(&self, side: Side) -> &[Battler] {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    pub fn team_mut(&mut self, side: Side) -> &mut Vec<Battler> {
        match side {
            Side::Player => &mut self.player,
            Side::Opponent => &mut self.opponent,
        }
    }

    pub fn active_index(&self, side: Side) -> usize {
        match side {
            Side::Player => self.player_active,
            Side::Opponent => self.opponent_active,
        }
    }

    pub fn set_active_index(&mut self, side: Side, idx: usize) {
        match side {
            Side::Player => self.player_active = idx,
            Side::Opponent => self.opponent_active = idx,
        }
    }

    pub fn active(&self, side: Side) -> &Battler {
        &self.team(side)[self.active_index(side)]
    }

    pub fn active_mut(&mut self, side: Side) -> &mut Battler {
        let idx = self.active_index(side);
        &mut self.team_mut(side)[idx]
    }

    /// Mutable access to `side`'s active and the opposing active at once.
    pub fn actives_mut(&mut self, side: Side) -> (&mut Battler, &mut Battler) {
        let player = &mut self.player[self.player_active];
        let opponent = &mut self.opponent[self.opponent_active];
        match side {
            Side::Player => (player, opponent),
            Side::Opponent => (opponent, player),
        }
    }

    pub fn alive_count(&self, side: Side) -> usize {
        self.team(side).iter().filter(|b| !b.is_fainted()).count()
    }

    pub fn is_wiped(&self, side: Side) -> bool {
        self.alive_count(side) == 0
    }

    pub fn snapshot(&self) -> ActiveSnapshot {
        let player = self.active(Side::Player);
        let opponent = self.active(Side::Opponent);
        ActiveSnapshot {
            player_name: player.name.clone(),
            player_hp: player.current_hp,
            player_max_hp: player.stats.hp,
            opponent_name: opponent.name.clone(),
            opponent_hp: opponent.current_hp,
            opponent_max_hp: opponent.stats.hp,
        }
    }
}

fn check_roster(side: Side, len: usize, lead: usize) -> Result<()> {
    if len == 0 {
        return Err(PlannerError::EmptyRoster(side));
    }
    if lead >= len {
        return Err(PlannerError::LeadOutOfRange {
            side,
            index: lead,
            len,
        });
    }
    Ok(())
}

/// HP readout of both actives after a turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSnapshot {
    pub player_name: String,
    pub player_hp: u32,
    pub player_max_hp: u32,
    pub opponent_name: String,
    pub opponent_hp: u32,
    pub opponent_max_hp: u32,
}
