// kinetrack_sim/src/simulation/config/structs.rs

use kinetrack_core::error::EstimationError;
use kinetrack_core::models::ModelParams;
use kinetrack_core::types::{StateCovariance, StateVector};
use kinetrack_core::utils::linalg::{covariance_sqrt, is_symmetric};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::simulation::sampling::state_covariance_to_dynamic;
use crate::simulation::utils::serde_helpers;

// =========================================================================
// == Top-Level Configuration ==
// =========================================================================

/// # ScenarioConfig
/// Everything a run needs. This struct is the root of the data parsed from a
/// `scenario.toml` file; every section may be omitted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)] // Fail if the TOML has fields not in our struct
pub struct ScenarioConfig {
    #[serde(default)] // Use default if the [simulation] section is missing
    pub simulation: Simulation,

    #[serde(default)]
    pub model: ModelParams,

    #[serde(default)]
    pub filter: Filter,

    #[serde(default)]
    pub output: Output,
}

// =========================================================================
// == Configuration Sub-Structs ==
// These map directly to the sections in the scenario.toml file.
// =========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Simulation {
    /// Optional seed for the pseudo-random number generator for determinism.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Number of time steps `N`, including the initial condition.
    #[serde(default = "default_num_steps")]
    pub num_steps: usize,
    /// True initial state `x0` as `[px, vx, py, vy]`.
    #[serde(with = "serde_helpers::state_vector_from_array", default = "default_initial_state")]
    pub initial_state: StateVector,
}

fn default_num_steps() -> usize {
    10
}

fn default_initial_state() -> StateVector {
    StateVector::new(0.0, 0.3, 0.0, 0.3)
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            seed: None,
            num_steps: default_num_steps(),
            initial_state: default_initial_state(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Filter {
    /// Prior guess `x̂0`. Falls back to the true initial state.
    #[serde(
        with = "serde_helpers::option_state_vector_from_array",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub initial_estimate: Option<StateVector>,
    /// Prior covariance `P0`, row by row. Zero means full confidence in `x̂0`.
    #[serde(
        with = "serde_helpers::state_covariance_from_rows",
        default = "zero_covariance"
    )]
    pub initial_covariance: StateCovariance,
}

fn zero_covariance() -> StateCovariance {
    StateCovariance::zeros()
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            initial_estimate: None,
            initial_covariance: zero_covariance(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Output {
    /// Write the position table after a successful run.
    #[serde(default = "default_true")]
    pub export_csv: bool,
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,
}

fn default_true() -> bool {
    true
}

fn default_csv_path() -> PathBuf {
    "result.csv".into()
}

impl Default for Output {
    fn default() -> Self {
        Self {
            export_csv: true,
            csv_path: default_csv_path(),
        }
    }
}

// =========================================================================
// == Validation ==
// =========================================================================

impl ScenarioConfig {
    /// The filter prior, resolved against the simulation defaults.
    pub fn initial_estimate(&self) -> StateVector {
        self.filter
            .initial_estimate
            .unwrap_or(self.simulation.initial_state)
    }

    /// Rejects values that would make any part of the run meaningless.
    pub fn validate(&self) -> Result<(), EstimationError> {
        if self.simulation.num_steps < 1 {
            return Err(EstimationError::configuration(
                "simulation.num_steps must be at least 1",
            ));
        }
        self.model.validate()?;

        if self.simulation.initial_state.iter().any(|v| !v.is_finite()) {
            return Err(EstimationError::configuration(
                "simulation.initial_state must be finite",
            ));
        }
        if self.initial_estimate().iter().any(|v| !v.is_finite()) {
            return Err(EstimationError::configuration(
                "filter.initial_estimate must be finite",
            ));
        }

        let p0 = &self.filter.initial_covariance;
        if p0.iter().any(|v| !v.is_finite()) || !is_symmetric(p0) {
            return Err(EstimationError::configuration(
                "filter.initial_covariance must be finite and symmetric",
            ));
        }
        if let Err(e) = covariance_sqrt(&state_covariance_to_dynamic(p0)) {
            return Err(EstimationError::configuration(format!(
                "filter.initial_covariance must be positive semi-definite: {}",
                e
            )));
        }
        Ok(())
    }
}
