use crate::sim::state::Side;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("{0} roster is empty")]
    EmptyRoster(Side),
    #[error("{side} lead index {index} is out of range for a roster of {len}")]
    LeadOutOfRange { side: Side, index: usize, len: usize },
    #[error("invalid combatant {name}: {reason}")]
    InvalidCombatant { name: String, reason: String },
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
