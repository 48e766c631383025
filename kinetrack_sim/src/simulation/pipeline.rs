// kinetrack_sim/src/simulation/pipeline.rs

use kinetrack_core::estimation::{filter, FilterRun};
use kinetrack_core::models::LinearSystemModel;
use tracing::info;

use crate::error::SimResult;
use crate::simulation::config::ScenarioConfig;
use crate::simulation::report::ErrorReport;
use crate::simulation::trajectory::{simulate, Trajectory};

/// Everything produced by one end-to-end run.
#[derive(Debug, Clone)]
pub struct ScenarioRun {
    pub model: LinearSystemModel,
    pub trajectory: Trajectory,
    pub filter_run: FilterRun,
    pub report: ErrorReport,
}

/// Builds the model, simulates ground truth and measurements, then filters.
///
/// The filter only ever sees the measurements. Any failure aborts the whole
/// run; no partial sequences are returned.
pub fn run_scenario(config: &ScenarioConfig) -> SimResult<ScenarioRun> {
    config.validate()?;

    let model = LinearSystemModel::new(config.model)?;
    info!(
        t = model.sampling_interval(),
        sigma_m = config.model.process_noise_stddev,
        sigma_z = config.model.measurement_noise_stddev,
        "built constant-velocity model"
    );

    let trajectory = simulate(
        &model,
        &config.simulation.initial_state,
        config.simulation.num_steps,
        config.simulation.seed,
    )?;

    let filter_run = filter(
        &model,
        &config.initial_estimate(),
        &config.filter.initial_covariance,
        &trajectory.measurements,
    )?;
    info!(steps = filter_run.len(), "filtering complete");

    let report = ErrorReport::compute(
        &trajectory.true_states,
        &filter_run.estimates,
        &trajectory.measurements,
        filter_run.mean_nis(),
    );

    Ok(ScenarioRun {
        model,
        trajectory,
        filter_run,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use kinetrack_core::error::EstimationError;
    use kinetrack_core::types::{StateCovariance, StateVector};
    use kinetrack_core::utils::linalg::max_asymmetry;

    fn reference(seed: u64) -> ScenarioConfig {
        let mut config = ScenarioConfig::default();
        config.simulation.seed = Some(seed);
        config
    }

    #[test]
    fn reference_scenario_is_reproducible() {
        let a = run_scenario(&reference(42)).unwrap();
        let b = run_scenario(&reference(42)).unwrap();
        assert_eq!(a.filter_run.estimates[9], b.filter_run.estimates[9]);
        assert_eq!(a.filter_run, b.filter_run);
        assert_eq!(a.trajectory, b.trajectory);
    }

    #[test]
    fn all_sequences_share_the_step_count() {
        let run = run_scenario(&reference(42)).unwrap();
        let n = 10;
        assert_eq!(run.trajectory.true_states.len(), n);
        assert_eq!(run.trajectory.measurements.len(), n);
        assert_eq!(run.filter_run.estimates.len(), n);
        assert_eq!(run.filter_run.covariances.len(), n);
    }

    #[test]
    fn initial_conditions_are_passed_through() {
        let run = run_scenario(&reference(3)).unwrap();
        let x0 = StateVector::new(0.0, 0.3, 0.0, 0.3);
        assert_eq!(run.trajectory.true_states[0], x0);
        assert_eq!(run.filter_run.estimates[0], x0);
        assert_eq!(run.filter_run.covariances[0], StateCovariance::zeros());
    }

    #[test]
    fn covariance_properties_hold_over_a_long_run() {
        let mut config = reference(8);
        config.simulation.num_steps = 200;
        let run = run_scenario(&config).unwrap();
        for p in &run.filter_run.covariances {
            assert!(max_asymmetry(p) < 1e-12);
        }
        for (t, record) in run.filter_run.innovations.iter().enumerate() {
            assert!(run.filter_run.covariances[t + 1].trace() <= record.predicted_covariance.trace());
        }
    }

    #[test]
    fn filter_beats_raw_measurements_on_a_long_run() {
        let mut config = reference(17);
        config.simulation.num_steps = 500;
        let run = run_scenario(&config).unwrap();
        assert!(run.report.estimate_rmse < run.report.measurement_rmse);
    }

    #[test]
    fn single_step_run_is_the_initial_condition() {
        let mut config = reference(1);
        config.simulation.num_steps = 1;
        let run = run_scenario(&config).unwrap();
        assert_eq!(run.filter_run.len(), 1);
        assert!(run.filter_run.innovations.is_empty());
        assert_eq!(run.report.estimate_rmse, 0.0);
    }

    #[test]
    fn noiseless_scenario_with_certain_prior_fails_whole_run() {
        let mut config = reference(1);
        config.model.process_noise_stddev = 0.0;
        config.model.measurement_noise_stddev = 0.0;
        match run_scenario(&config) {
            Err(SimError::Estimation(EstimationError::Numerical(msg))) => {
                assert_eq!(msg, "non-invertible innovation covariance")
            }
            other => panic!("expected numerical error, got {:?}", other),
        }
    }
}
