// kinetrack_core/src/estimation/mod.rs

use crate::error::Result;
use crate::types::{Measurement, StateCovariance, StateVector};

/// One estimate step: the state mean and its covariance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub state: StateVector,
    pub covariance: StateCovariance,
}

impl Estimate {
    pub fn new(state: StateVector, covariance: StateCovariance) -> Self {
        Self { state, covariance }
    }
}

/// The contract for any algorithm that performs the "State Estimator" role.
/// Its sole responsibility is to estimate the state from a measurement stream.
pub trait StateEstimator {
    /// Advances the current estimate by one sampling interval.
    fn predict(&mut self);

    /// Corrects the (predicted) estimate with a measurement.
    fn update(&mut self, z: &Measurement) -> Result<kalman::InnovationRecord>;

    /// Returns a reference to the current best estimate of the state.
    fn get_state(&self) -> &Estimate;

    /// One full predict → update cycle.
    fn step(&mut self, z: &Measurement) -> Result<kalman::InnovationRecord> {
        self.predict();
        self.update(z)
    }
}

pub mod filters;
pub mod kalman;

pub use filters::kalman::{filter, FilterRun, KalmanFilter};
pub use kalman::{kf_predict, kf_update, InnovationRecord};
