// kinetrack_core/src/models/linear_system.rs

use nalgebra::{Matrix2, Matrix2x4, Matrix4};
use serde::{Deserialize, Serialize};

use crate::error::{EstimationError, Result};
use crate::models::{LinearDynamics, LinearMeasurement};
use crate::types::{InnovationCovariance, ObservationMatrix, StateCovariance, TransitionMatrix};

/// The three scalars a [`LinearSystemModel`] is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelParams {
    /// Sampling interval `T` in seconds. Must be positive.
    #[serde(default = "default_sampling_interval")]
    pub sampling_interval: f64,
    /// Standard deviation `σ_m` of the white-noise acceleration.
    #[serde(default = "default_process_noise_stddev")]
    pub process_noise_stddev: f64,
    /// Standard deviation `σ_z` of each position measurement.
    #[serde(default = "default_measurement_noise_stddev")]
    pub measurement_noise_stddev: f64,
}

fn default_sampling_interval() -> f64 {
    1.0
}

fn default_process_noise_stddev() -> f64 {
    0.1
}

fn default_measurement_noise_stddev() -> f64 {
    0.3
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            sampling_interval: default_sampling_interval(),
            process_noise_stddev: default_process_noise_stddev(),
            measurement_noise_stddev: default_measurement_noise_stddev(),
        }
    }
}

impl ModelParams {
    pub fn validate(&self) -> Result<()> {
        let t = self.sampling_interval;
        if !t.is_finite() || t <= 0.0 {
            return Err(EstimationError::configuration(format!(
                "sampling interval must be positive and finite, got {}",
                t
            )));
        }
        for (name, value) in [
            ("process noise std-dev", self.process_noise_stddev),
            ("measurement noise std-dev", self.measurement_noise_stddev),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EstimationError::configuration(format!(
                    "{} must be non-negative and finite, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Constant-velocity point in the plane, observed through its position.
///
/// State layout is `[px, vx, py, vy]`. The matrices are derived analytically
/// once at construction and never change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystemModel {
    params: ModelParams,
    a: TransitionMatrix,
    q: StateCovariance,
    h: ObservationMatrix,
    r: InnovationCovariance,
}

impl LinearSystemModel {
    pub fn new(params: ModelParams) -> Result<Self> {
        params.validate()?;

        let t = params.sampling_interval;
        let q_scale = params.process_noise_stddev.powi(2);
        let r_scale = params.measurement_noise_stddev.powi(2);

        #[rustfmt::skip]
        let a = Matrix4::new(
            1.0, t,   0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, t,
            0.0, 0.0, 0.0, 1.0,
        );

        // Continuous white-noise acceleration, discretized over `T`.
        let t2 = t.powi(2) / 2.0;
        let t3 = t.powi(3) / 3.0;
        #[rustfmt::skip]
        let q = Matrix4::new(
            t3,  t2,  0.0, 0.0,
            t2,  t,   0.0, 0.0,
            0.0, 0.0, t3,  t2,
            0.0, 0.0, t2,  t,
        ) * q_scale;

        #[rustfmt::skip]
        let h = Matrix2x4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
        );

        let r = Matrix2::identity() * r_scale;

        Ok(Self { params, a, q, h, r })
    }

    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    pub fn sampling_interval(&self) -> f64 {
        self.params.sampling_interval
    }
}

impl LinearDynamics for LinearSystemModel {
    fn transition(&self) -> &TransitionMatrix {
        &self.a
    }

    fn process_noise(&self) -> &StateCovariance {
        &self.q
    }
}

impl LinearMeasurement for LinearSystemModel {
    fn observation(&self) -> &ObservationMatrix {
        &self.h
    }

    fn measurement_noise(&self) -> &InnovationCovariance {
        &self.r
    }
}
