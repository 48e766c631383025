// kinetrack_sim/examples/01_full_pipeline.rs

//! A full end-to-end run of the tracking pipeline.
//!
//! This example demonstrates how to:
//! 1. Load a scenario from a TOML file.
//! 2. Simulate ground truth and noisy measurements.
//! 3. Filter the measurements and compare the estimate against the truth.
//!
//! To run this example:
//! `cargo run --example 01_full_pipeline`

use kinetrack_sim::prelude::*;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> SimResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("info,kinetrack_sim=debug"))
        .init();

    // --- 1. Load Scenario Configuration ---
    let scenario_path = Path::new("assets/scenarios/reference.toml");
    let config = if scenario_path.exists() {
        load_scenario(Some(scenario_path))?
    } else {
        ScenarioConfig::default()
    };

    // --- 2. Simulate ---
    let model = LinearSystemModel::new(config.model)?;
    let trajectory = simulate(
        &model,
        &config.simulation.initial_state,
        config.simulation.num_steps,
        config.simulation.seed,
    )?;

    // --- 3. Filter (measurements only, never the truth) ---
    let run = filter(
        &model,
        &config.initial_estimate(),
        &config.filter.initial_covariance,
        &trajectory.measurements,
    )?;

    // --- 4. Compare ---
    println!("{:>3}  {:>18}  {:>18}  {:>18}", "t", "truth", "measurement", "estimate");
    for t in 0..trajectory.len() {
        let (tx, ty) = position_of(&trajectory.true_states[t]);
        let z = trajectory.measurements[t];
        let (ex, ey) = position_of(&run.estimates[t]);
        println!(
            "{:>3}  ({:>7.3}, {:>7.3})  ({:>7.3}, {:>7.3})  ({:>7.3}, {:>7.3})",
            t, tx, ty, z[0], z[1], ex, ey
        );
    }

    ErrorReport::compute(
        &trajectory.true_states,
        &run.estimates,
        &trajectory.measurements,
        run.mean_nis(),
    )
    .log();
    Ok(())
}
