// kinetrack_core/src/models/mod.rs

use crate::types::{
    InnovationCovariance, Measurement, ObservationMatrix, StateCovariance, StateVector,
    TransitionMatrix,
};
use std::fmt::Debug;

// --- DYNAMICS MODEL TRAIT ---
// Represents a linear, time-invariant process. `x[t] = A·x[t-1] + w`, `w ~ N(0, Q)`
pub trait LinearDynamics: Debug + Send + Sync {
    /// The state transition matrix `A`.
    fn transition(&self) -> &TransitionMatrix;

    /// The process noise covariance `Q`.
    fn process_noise(&self) -> &StateCovariance;

    /// Noise-free propagation `A·x`.
    fn propagate(&self, x: &StateVector) -> StateVector {
        self.transition() * x
    }
}

// --- MEASUREMENT MODEL TRAIT ---
// Represents a linear sensor. `z = H·x + e`, `e ~ N(0, R)`
pub trait LinearMeasurement: Debug + Send + Sync {
    /// The observation matrix `H`.
    fn observation(&self) -> &ObservationMatrix;

    /// The measurement noise covariance `R`.
    fn measurement_noise(&self) -> &InnovationCovariance;

    /// Predicts the ideal measurement `H·x`.
    fn observe(&self, x: &StateVector) -> Measurement {
        self.observation() * x
    }
}

pub mod linear_system;

pub use linear_system::{LinearSystemModel, ModelParams};
