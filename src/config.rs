use crate::ai::lookahead::DEFAULT_LOOKAHEAD_DEPTH;
use crate::error::Result;
use crate::strategy::risk::DEFAULT_ODDS_TRIALS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Planner knobs, loaded from an optional JSON file. Omitted fields keep
/// their defaults.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PlannerConfig {
    pub max_depth: usize,
    pub lookahead_depth: u32,
    pub max_acceptable_losses: usize,
    pub time_budget_ms: u64,
    pub node_limit: Option<usize>,
    pub ai_odds_trials: usize,
    pub seed: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_depth: 20,
            lookahead_depth: DEFAULT_LOOKAHEAD_DEPTH,
            max_acceptable_losses: 5,
            time_budget_ms: 30_000,
            node_limit: None,
            ai_odds_trials: DEFAULT_ODDS_TRIALS,
            seed: 0,
        }
    }
}

impl PlannerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn search_limits(&self) -> SearchLimits {
        SearchLimits::from(self)
    }
}

/// Bounds for the tiered search. Only the top-level queue loop checks the
/// clock and node cap.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchLimits {
    pub max_depth: usize,
    pub max_acceptable_losses: usize,
    pub time_budget: Duration,
    pub node_limit: Option<usize>,
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits::from(&PlannerConfig::default())
    }
}

impl From<&PlannerConfig> for SearchLimits {
    fn from(config: &PlannerConfig) -> Self {
        SearchLimits {
            max_depth: config.max_depth,
            max_acceptable_losses: config.max_acceptable_losses,
            time_budget: Duration::from_millis(config.time_budget_ms),
            node_limit: config.node_limit,
        }
    }
}
