// kinetrack_sim/src/simulation/trajectory.rs

use kinetrack_core::error::{EstimationError, Result};
use kinetrack_core::models::{LinearDynamics, LinearMeasurement};
use kinetrack_core::types::{Measurement, StateVector};
use kinetrack_core::utils::linalg::CovarianceRoot;
use tracing::{debug, info};

use crate::simulation::core::prng::SimulationRng;
use crate::simulation::sampling::{
    innovation_covariance_to_dynamic, state_covariance_to_dynamic, GaussianSampler,
};

/// Ground truth and the noisy observations of it, aligned on the time index.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub true_states: Vec<StateVector>,
    pub measurements: Vec<Measurement>,
    /// The seed the random source was started from.
    pub seed: u64,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.true_states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.true_states.is_empty()
    }
}

/// Generates ground truth under random acceleration and measures it.
///
/// `Q` and `R` are factored once at construction, so an invalid model fails
/// before any random draw is made.
#[derive(Debug)]
pub struct TrajectorySimulator<'m, M: ?Sized> {
    model: &'m M,
    process_root: CovarianceRoot,
    measurement_root: CovarianceRoot,
}

impl<'m, M> TrajectorySimulator<'m, M>
where
    M: LinearDynamics + LinearMeasurement + ?Sized,
{
    pub fn new(model: &'m M) -> Result<Self> {
        let process_root =
            GaussianSampler::factor(&state_covariance_to_dynamic(model.process_noise()))?;
        let measurement_root = GaussianSampler::factor(&innovation_covariance_to_dynamic(
            model.measurement_noise(),
        ))?;
        Ok(Self {
            model,
            process_root,
            measurement_root,
        })
    }

    /// Produces `num_steps` true states and measurements.
    ///
    /// Index 0 is the given initial state and its noiseless projection `H·x0`;
    /// every later step draws fresh process noise, then fresh measurement noise.
    pub fn run(
        &self,
        sampler: &mut GaussianSampler,
        initial_state: &StateVector,
        num_steps: usize,
    ) -> Result<Trajectory> {
        if num_steps < 1 {
            return Err(EstimationError::configuration(
                "number of steps must be at least 1",
            ));
        }
        if initial_state.iter().any(|v| !v.is_finite()) {
            return Err(EstimationError::configuration(
                "initial state must be finite",
            ));
        }

        let mut true_states = Vec::with_capacity(num_steps);
        let mut measurements = Vec::with_capacity(num_steps);

        true_states.push(*initial_state);
        // The first measurement is noiseless by construction.
        measurements.push(self.model.observe(initial_state));

        for t in 1..num_steps {
            let previous = true_states[t - 1];
            let state = sampler.sample_state(&self.model.propagate(&previous), &self.process_root)?;
            let z = sampler.sample_measurement(&self.model.observe(&state), &self.measurement_root)?;
            debug!(step = t, px = state[0], py = state[2], zx = z[0], zy = z[1], "simulated step");
            true_states.push(state);
            measurements.push(z);
        }

        Ok(Trajectory {
            true_states,
            measurements,
            seed: sampler.seed(),
        })
    }
}

/// Seeds a fresh random source and simulates a whole trajectory.
pub fn simulate<M>(
    model: &M,
    initial_state: &StateVector,
    num_steps: usize,
    rng_seed: Option<u64>,
) -> Result<Trajectory>
where
    M: LinearDynamics + LinearMeasurement + ?Sized,
{
    let simulator = TrajectorySimulator::new(model)?;
    let mut sampler = GaussianSampler::new(SimulationRng::from_seed(rng_seed));
    info!(seed = sampler.seed(), num_steps, "simulating trajectory");
    simulator.run(&mut sampler, initial_state, num_steps)
}
