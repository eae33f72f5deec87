use crate::config::SearchLimits;
use crate::error::Result;
use crate::model::RostersFile;
use crate::sim::state::BattleState;
use crate::sim::switching::DefaultForcedSwitch;
use crate::strategy::tiered::{find_tiered_strategy_with, RiskTier};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::path::Path;

struct CellResult {
    player_lead: usize,
    enemy_lead: usize,
    tier: RiskTier,
}

/// Risk tier of the tiered plan for every (player lead, enemy lead) pair.
/// Rows are player leads, columns enemy leads. Each cell searches its own
/// state with its own seeded RNG.
pub fn compute_lead_matrix(rosters: &RostersFile, limits: &SearchLimits, seed: u64) -> Result<Vec<Vec<RiskTier>>> {
    let rows = rosters.player_team.len();
    let cols = rosters.enemy_team.len();
    let tasks: Vec<(usize, usize)> = (0..rows)
        .flat_map(|p| (0..cols).map(move |e| (p, e)))
        .collect();

    let cells: Vec<CellResult> = tasks
        .par_iter()
        .map(|&(player_lead, enemy_lead)| -> Result<CellResult> {
            let state = BattleState::from_rosters_with_leads(rosters, player_lead, enemy_lead)?;
            let mut rng = SmallRng::seed_from_u64(seed ^ ((player_lead as u64) << 32) ^ (enemy_lead as u64));
            let result = find_tiered_strategy_with(&state, limits, &DefaultForcedSwitch, &mut rng);
            Ok(CellResult {
                player_lead,
                enemy_lead,
                tier: result.risk_tier,
            })
        })
        .collect::<Result<_>>()?;

    let mut matrix = vec![vec![RiskTier::GuaranteedLoss; cols]; rows];
    for cell in cells {
        matrix[cell.player_lead][cell.enemy_lead] = cell.tier;
    }
    Ok(matrix)
}

/// Writes the matrix with a header row of enemy names and a leading column
/// of player names. Labels are quoted since some contain commas.
pub fn write_csv(
    matrix: &[Vec<RiskTier>],
    player_names: &[String],
    enemy_names: &[String],
    path: &Path,
) -> Result<()> {
    std::fs::write(path, render_csv(matrix, player_names, enemy_names))?;
    Ok(())
}

fn render_csv(matrix: &[Vec<RiskTier>], player_names: &[String], enemy_names: &[String]) -> String {
    let quote = |s: &str| format!("\"{}\"", s.replace('"', "\"\""));
    let mut lines = Vec::with_capacity(matrix.len() + 1);

    let mut header = vec![quote("lead")];
    header.extend(enemy_names.iter().map(|n| quote(n)));
    lines.push(header.join(","));

    for (row, name) in matrix.iter().zip(player_names) {
        let mut fields = vec![quote(name)];
        fields.extend(row.iter().map(|tier| quote(&tier.to_string())));
        lines.push(fields.join(","));
    }
    lines.join("\n")
}
