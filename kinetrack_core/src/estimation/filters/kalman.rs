// kinetrack_core/src/estimation/filters/kalman.rs

use tracing::debug;

use crate::error::{EstimationError, Result};
use crate::estimation::kalman::{kf_predict, kf_update, InnovationRecord};
use crate::estimation::{Estimate, StateEstimator};
use crate::models::{LinearDynamics, LinearMeasurement};
use crate::types::{Measurement, StateCovariance, StateVector};
use crate::utils::linalg::{is_symmetric, max_asymmetry};

/// A concrete implementation of a discrete-time linear Kalman filter.
///
/// The filter borrows its model; it consumes no randomness, so identical
/// inputs always produce bit-identical outputs.
#[derive(Debug)]
pub struct KalmanFilter<'m, M: ?Sized> {
    model: &'m M,
    /// The current estimate (posterior after `update`, prior after `predict`).
    estimate: Estimate,
}

impl<'m, M> KalmanFilter<'m, M>
where
    M: LinearDynamics + LinearMeasurement + ?Sized,
{
    /// Creates a filter from an initial guess `x̂0` and its covariance `P0`.
    pub fn new(model: &'m M, initial_state: StateVector, initial_covariance: StateCovariance) -> Result<Self> {
        if initial_state.iter().any(|v| !v.is_finite()) {
            return Err(EstimationError::configuration(
                "initial state estimate must be finite",
            ));
        }
        if initial_covariance.iter().any(|v| !v.is_finite()) {
            return Err(EstimationError::numerical(
                "initial covariance contains non-finite entries",
            ));
        }
        if !is_symmetric(&initial_covariance) {
            return Err(EstimationError::numerical(format!(
                "initial covariance is not symmetric (max asymmetry {:e})",
                max_asymmetry(&initial_covariance)
            )));
        }

        Ok(Self {
            model,
            estimate: Estimate::new(initial_state, initial_covariance),
        })
    }
}

// --- The Public Trait Implementation ---
impl<M> StateEstimator for KalmanFilter<'_, M>
where
    M: LinearDynamics + LinearMeasurement + ?Sized,
{
    fn predict(&mut self) {
        self.estimate = kf_predict(&self.estimate, self.model);
    }

    fn update(&mut self, z: &Measurement) -> Result<InnovationRecord> {
        let (corrected, record) = kf_update(&self.estimate, z, self.model)?;
        self.estimate = corrected;
        Ok(record)
    }

    fn get_state(&self) -> &Estimate {
        &self.estimate
    }
}

/// The full output of a filtering run. All sequences are aligned on the
/// measurement index; `innovations[t - 1]` belongs to step `t`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterRun {
    pub estimates: Vec<StateVector>,
    pub covariances: Vec<StateCovariance>,
    pub innovations: Vec<InnovationRecord>,
}

impl FilterRun {
    pub fn len(&self) -> usize {
        self.estimates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.estimates.is_empty()
    }

    pub fn final_estimate(&self) -> Option<Estimate> {
        Some(Estimate::new(
            *self.estimates.last()?,
            *self.covariances.last()?,
        ))
    }

    /// Mean normalized innovation squared over all corrections.
    pub fn mean_nis(&self) -> Option<f64> {
        if self.innovations.is_empty() {
            return None;
        }
        let total: f64 = self.innovations.iter().map(|r| r.nis).sum();
        Some(total / self.innovations.len() as f64)
    }
}

/// Runs the predict/update recursion over a whole measurement sequence.
///
/// Index 0 of the output is `(x̂0, P0)` itself; `measurements[0]` is never
/// used. The run either completes or fails as a whole.
pub fn filter<M>(
    model: &M,
    initial_state: &StateVector,
    initial_covariance: &StateCovariance,
    measurements: &[Measurement],
) -> Result<FilterRun>
where
    M: LinearDynamics + LinearMeasurement + ?Sized,
{
    if measurements.is_empty() {
        return Err(EstimationError::configuration(
            "measurement sequence must contain at least one entry",
        ));
    }
    if let Some(t) = measurements
        .iter()
        .position(|z| z.iter().any(|v| !v.is_finite()))
    {
        return Err(EstimationError::configuration(format!(
            "measurement {} is not finite",
            t
        )));
    }

    let mut kf = KalmanFilter::new(model, *initial_state, *initial_covariance)?;

    let n = measurements.len();
    let mut estimates = Vec::with_capacity(n);
    let mut covariances = Vec::with_capacity(n);
    let mut innovations = Vec::with_capacity(n - 1);

    estimates.push(*initial_state);
    covariances.push(*initial_covariance);

    for (t, z) in measurements.iter().enumerate().skip(1) {
        let record = kf.step(z).map_err(|e| {
            debug!(step = t, error = %e, "filter recursion halted");
            e
        })?;
        let current = kf.get_state();
        debug!(
            step = t,
            nis = record.nis,
            trace_pred = record.predicted_covariance.trace(),
            trace_post = current.covariance.trace(),
            "kalman step"
        );
        estimates.push(current.state);
        covariances.push(current.covariance);
        innovations.push(record);
    }

    Ok(FilterRun {
        estimates,
        covariances,
        innovations,
    })
}
