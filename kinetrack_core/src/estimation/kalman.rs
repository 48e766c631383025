// kinetrack_core/src/estimation/kalman.rs

use crate::error::Result;
use crate::estimation::Estimate;
use crate::models::{LinearDynamics, LinearMeasurement};
use crate::types::{GainMatrix, InnovationCovariance, Measurement, StateCovariance};
use crate::utils::linalg::{invert_innovation, symmetrize};

/// Intermediate quantities of one correction, kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InnovationRecord {
    /// `v = z - H·x_pred`
    pub innovation: Measurement,
    /// `S = H·P_pred·Hᵗ + R`
    pub innovation_covariance: InnovationCovariance,
    /// `P_pred`, before the correction.
    pub predicted_covariance: StateCovariance,
    /// `K = P_pred·Hᵗ·S⁻¹`
    pub gain: GainMatrix,
    /// Normalized innovation squared `vᵗ·S⁻¹·v`.
    pub nis: f64,
}

/// PURE FUNCTION: Performs one prediction step.
/// `x_pred = A·x`, `P_pred = A·P·Aᵗ + Q`.
pub fn kf_predict<D>(current: &Estimate, dynamics: &D) -> Estimate
where
    D: LinearDynamics + ?Sized,
{
    let a = dynamics.transition();
    let state = a * current.state;
    let covariance = a * current.covariance * a.transpose() + dynamics.process_noise();

    Estimate {
        state,
        covariance: symmetrize(&covariance),
    }
}

/// PURE FUNCTION: Performs one measurement update step.
///
/// The covariance is corrected as `P = P_pred - K·S·Kᵗ`, reusing `K` and `S`.
/// A singular `S` aborts with a numerical error; there is no fallback.
pub fn kf_update<M>(
    predicted: &Estimate,
    z: &Measurement,
    sensor: &M,
) -> Result<(Estimate, InnovationRecord)>
where
    M: LinearMeasurement + ?Sized,
{
    let h = sensor.observation();
    let p_pred = predicted.covariance;

    let innovation = z - h * predicted.state;
    let s = h * p_pred * h.transpose() + sensor.measurement_noise();
    let s_inv = invert_innovation(&s)?;

    let gain = p_pred * h.transpose() * s_inv;

    let state = predicted.state + gain * innovation;
    let covariance = symmetrize(&(p_pred - gain * s * gain.transpose()));

    let record = InnovationRecord {
        innovation,
        innovation_covariance: s,
        predicted_covariance: p_pred,
        gain,
        nis: innovation.dot(&(s_inv * innovation)),
    };

    Ok((Estimate { state, covariance }, record))
}
