// kinetrack_sim/src/main.rs

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use kinetrack_sim::cli::Cli;
use kinetrack_sim::error::SimResult;
use kinetrack_sim::output::export_csv;
use kinetrack_sim::simulation::config::{load_scenario, render_scenario};
use kinetrack_sim::simulation::pipeline::run_scenario;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> SimResult<()> {
    let mut config = load_scenario(cli.scenario.as_deref())?;
    cli.apply_overrides(&mut config);

    if cli.print_config {
        print!("{}", render_scenario(&config)?);
        return Ok(());
    }

    let run = run_scenario(&config)?;
    info!("Random seed: {}", run.trajectory.seed);
    run.report.log();

    if let Some(last) = run.filter_run.final_estimate() {
        info!(
            "Final estimate: [{:.4}, {:.4}, {:.4}, {:.4}] | trace(P): {:.5}",
            last.state[0],
            last.state[1],
            last.state[2],
            last.state[3],
            last.covariance.trace()
        );
    }

    if config.output.export_csv {
        export_csv(
            &config.output.csv_path,
            &run.trajectory.true_states,
            &run.trajectory.measurements,
            &run.filter_run.estimates,
        )?;
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    // A good filter for focusing on our crates' logs.
    let default_filter = if verbose {
        "info,kinetrack_sim=debug,kinetrack_core=debug"
    } else {
        "info,kinetrack_sim=info,kinetrack_core=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .init();
}
