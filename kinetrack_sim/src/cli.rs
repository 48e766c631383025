// kinetrack_sim/src/cli.rs

use clap::Parser;
use std::path::PathBuf;

use crate::simulation::config::ScenarioConfig;

/// Kinetrack: simulate a point under random acceleration and track it with a
/// linear Kalman filter.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The path to the scenario TOML file to run. Built-in defaults are used if omitted.
    #[arg(short, long)]
    pub scenario: Option<PathBuf>,

    /// Seed for the random source; overrides the scenario.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of time steps; overrides the scenario.
    #[arg(short = 'n', long)]
    pub steps: Option<usize>,

    /// Where to write the CSV table; overrides the scenario.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip writing the CSV table.
    #[arg(long, default_value_t = false)]
    pub no_export: bool,

    /// Print the resolved scenario as TOML and exit.
    #[arg(long, default_value_t = false)]
    pub print_config: bool,

    /// Enable debug logging (per-step output).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded scenario.
    pub fn apply_overrides(&self, config: &mut ScenarioConfig) {
        if let Some(seed) = self.seed {
            config.simulation.seed = Some(seed);
        }
        if let Some(steps) = self.steps {
            config.simulation.num_steps = steps;
        }
        if let Some(output) = &self.output {
            config.output.csv_path = output.clone();
        }
        if self.no_export {
            config.output.export_csv = false;
        }
    }
}
