pub mod ai;
pub mod config;
pub mod error;
pub mod matrix;
pub mod model;
pub mod sim;
pub mod strategy;
pub mod types;

use crate::config::PlannerConfig;
use crate::model::RostersFile;
use crate::sim::state::BattleState;
use crate::sim::switching::DefaultForcedSwitch;
use crate::strategy::optimizer::{calculate_worst_case_strategy, find_optimal_strategy, WorstCaseReport};
use crate::strategy::plan::PlanStep;
use crate::strategy::tiered::{find_tiered_strategy_with, TieredResult};
use anyhow::Context;
use log::info;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub rosters_path: PathBuf,
    pub config: PlannerConfig,
    pub output_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct MatrixOptions {
    pub rosters_path: PathBuf,
    pub config: PlannerConfig,
    pub output_path: PathBuf,
}

/// Everything the plan command produces for one battle.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanReport {
    pub tiered: TieredResult,
    pub timeline: Vec<PlanStep>,
    pub worst_case: WorstCaseReport,
}

pub fn load_rosters(path: &Path) -> anyhow::Result<RostersFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rosters file at {}", path.display()))?;
    let parsed: RostersFile = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse JSON from {}", path.display()))?;
    parsed
        .validate()
        .with_context(|| format!("Invalid roster in {}", path.display()))?;
    Ok(parsed)
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<PlannerConfig> {
    match path {
        Some(path) => PlannerConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(PlannerConfig::default()),
    }
}

/// Runs the tiered search, the optimizer timeline and the worst-case pass
/// from one seed. Each pass starts from its own clone of `state`.
pub fn build_plan(state: &BattleState, config: &PlannerConfig) -> PlanReport {
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let resolver = DefaultForcedSwitch;

    let tiered = find_tiered_strategy_with(state, &config.search_limits(), &resolver, &mut rng);
    let timeline = find_optimal_strategy(
        state,
        config.max_depth,
        config.lookahead_depth,
        config.ai_odds_trials,
        &resolver,
        &mut rng,
    );
    let worst_case =
        calculate_worst_case_strategy(state, config.max_depth, config.lookahead_depth, &resolver, &mut rng);

    PlanReport {
        tiered,
        timeline,
        worst_case,
    }
}

pub fn run_plan(opts: PlanOptions) -> anyhow::Result<PlanReport> {
    if opts.config.max_depth == 0 {
        anyhow::bail!("max depth must be > 0");
    }
    let rosters = load_rosters(&opts.rosters_path)?;
    let state = BattleState::from_rosters(&rosters).context("Failed to build the battle state")?;
    let report = build_plan(&state, &opts.config);

    print_report(&report);

    if let Some(path) = &opts.output_path {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize the plan")?;
        std::fs::write(path, json).with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!("wrote plan report to {}", path.display());
    }
    Ok(report)
}

fn print_report(report: &PlanReport) {
    let tiered = &report.tiered;
    println!("Risk tier: {}", tiered.risk_tier);
    match tiered.turns_to_win {
        Some(turns) => println!("Turns to win: {turns}"),
        None => println!("No winning line found"),
    }
    println!(
        "Deaths: {} average, {} worst case",
        tiered.average_deaths, tiered.worst_case_deaths
    );
    for step in &tiered.strategy {
        println!(
            "  T{} {} ({} {}/{} vs {} {}/{})",
            step.turn,
            step.action,
            step.active.player_name,
            step.active.player_hp,
            step.active.player_max_hp,
            step.active.opponent_name,
            step.active.opponent_hp,
            step.active.opponent_max_hp
        );
    }

    println!("Optimizer timeline:");
    for step in &report.timeline {
        let level = step.risk.as_ref().map_or("unknown", |r| r.level.label());
        let grade = step
            .grade
            .map(|g| format!(" {}{}", g.quality.label(), g.quality.symbol()))
            .unwrap_or_default();
        println!(
            "  T{} {}{grade} [{level} risk] {}",
            step.turn,
            step.action,
            step.reasoning.as_deref().unwrap_or("")
        );
    }

    println!(
        "Worst case: {} ({} lost, {} defeated)",
        report.worst_case.risk_tier, report.worst_case.player_deaths, report.worst_case.opponent_deaths
    );
}

pub fn run_matrix(opts: MatrixOptions) -> anyhow::Result<()> {
    let rosters = load_rosters(&opts.rosters_path)?;
    let limits = opts.config.search_limits();
    let matrix = matrix::compute_lead_matrix(&rosters, &limits, opts.config.seed)
        .context("Failed to evaluate lead matrix")?;

    let player_names: Vec<String> = rosters.player_team.iter().map(|p| p.name.clone()).collect();
    let enemy_names: Vec<String> = rosters.enemy_team.iter().map(|p| p.name.clone()).collect();
    matrix::write_csv(&matrix, &player_names, &enemy_names, &opts.output_path)
        .with_context(|| format!("Failed to write matrix to {}", opts.output_path.display()))?;
    println!(
        "Wrote {}x{} lead matrix to {}",
        matrix.len(),
        matrix.first().map(|r| r.len()).unwrap_or(0),
        opts.output_path.display()
    );
    Ok(())
}
