use clap::{Parser, Subcommand};
use pokemon_battle_planner::config::PlannerConfig;
use pokemon_battle_planner::{load_config, run_matrix, run_plan, MatrixOptions, PlanOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pokemon-battle-planner", about = "Battle simulator and strategy planner")]
struct Cli {
    /// Log search progress
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find a plan for the leads given in the rosters file
    Plan {
        #[arg(long)]
        rosters: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        max_depth: Option<usize>,
        /// Write the full report as JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Evaluate every lead pairing and write a CSV of risk tiers
    Matrix {
        #[arg(long)]
        rosters: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "matrix.csv")]
        output: PathBuf,
    },
}

fn apply_overrides(mut config: PlannerConfig, seed: Option<u64>, max_depth: Option<usize>) -> PlannerConfig {
    if let Some(seed) = seed {
        config.seed = seed;
    }
    if let Some(max_depth) = max_depth {
        config.max_depth = max_depth;
    }
    config
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match cli.command {
        Command::Plan {
            rosters,
            config,
            seed,
            max_depth,
            output,
        } => {
            let config = apply_overrides(load_config(config.as_deref())?, seed, max_depth);
            run_plan(PlanOptions {
                rosters_path: rosters,
                config,
                output_path: output,
            })?;
        }
        Command::Matrix {
            rosters,
            config,
            seed,
            output,
        } => {
            let config = apply_overrides(load_config(config.as_deref())?, seed, None);
            run_matrix(MatrixOptions {
                rosters_path: rosters,
                config,
                output_path: output,
            })?;
        }
    }
    Ok(())
}
