// kinetrack_core/src/prelude.rs

// --- Core Abstractions (The main contracts of the library) ---
pub use crate::estimation::StateEstimator;
pub use crate::models::{LinearDynamics, LinearMeasurement};

// --- Core Data Structures (The "nouns" of the library) ---
pub use crate::error::EstimationError;
pub use crate::estimation::{Estimate, FilterRun, InnovationRecord};
pub use crate::types::{
    position_of, InnovationCovariance, Measurement, StateCovariance, StateIndex, StateVector,
};

// --- Estimation Algorithms ---
pub use crate::estimation::{filter, kf_predict, kf_update, KalmanFilter};

// --- Concrete Model Implementations ---
pub use crate::models::{LinearSystemModel, ModelParams};
