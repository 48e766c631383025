// kinetrack_sim/src/simulation/report.rs

use kinetrack_core::types::{position_of, Measurement, StateVector};
use tracing::info;

/// How far the estimates (and the raw measurements) land from ground truth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorReport {
    /// Root-mean-square Euclidean position error of the filter estimates.
    pub estimate_rmse: f64,
    /// Root-mean-square Euclidean position error of the raw measurements.
    pub measurement_rmse: f64,
    /// Position error of the last estimate.
    pub final_position_error: f64,
    /// Mean normalized innovation squared, when at least one update ran.
    pub mean_nis: Option<f64>,
}

impl ErrorReport {
    /// Sequences are compared index by index; extra trailing entries are ignored.
    pub fn compute(
        true_states: &[StateVector],
        estimates: &[StateVector],
        measurements: &[Measurement],
        mean_nis: Option<f64>,
    ) -> Self {
        let estimate_errors: Vec<f64> = true_states
            .iter()
            .zip(estimates)
            .map(|(truth, est)| position_error(truth, est))
            .collect();
        let measurement_errors: Vec<f64> = true_states
            .iter()
            .zip(measurements)
            .map(|(truth, z)| {
                let (px, py) = position_of(truth);
                (px - z[0]).hypot(py - z[1])
            })
            .collect();

        Self {
            estimate_rmse: rms(&estimate_errors),
            measurement_rmse: rms(&measurement_errors),
            final_position_error: estimate_errors.last().copied().unwrap_or(0.0),
            mean_nis,
        }
    }

    pub fn log(&self) {
        info!(
            "State Error | Est RMSE: {:.4} | Meas RMSE: {:.4} | Final Pos Err: {:.4} | Mean NIS: {}",
            self.estimate_rmse,
            self.measurement_rmse,
            self.final_position_error,
            self.mean_nis
                .map(|v| format!("{:.3}", v))
                .unwrap_or_else(|| "n/a".to_string())
        );
    }
}

fn position_error(truth: &StateVector, estimate: &StateVector) -> f64 {
    let (tx, ty) = position_of(truth);
    let (ex, ey) = position_of(estimate);
    (tx - ex).hypot(ty - ey)
}

fn rms(errors: &[f64]) -> f64 {
    if errors.is_empty() {
        return 0.0;
    }
    (errors.iter().map(|e| e * e).sum::<f64>() / errors.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn perfect_estimates_have_zero_error() {
        let truth = vec![StateVector::new(1.0, 0.0, 2.0, 0.0); 3];
        let zs = vec![Measurement::new(1.0, 2.0); 3];
        let report = ErrorReport::compute(&truth, &truth, &zs, None);
        assert_eq!(report.estimate_rmse, 0.0);
        assert_eq!(report.measurement_rmse, 0.0);
        assert_eq!(report.final_position_error, 0.0);
    }

    #[test]
    fn errors_are_euclidean_position_distances() {
        let truth = vec![StateVector::zeros(), StateVector::zeros()];
        // Velocity differences must not count.
        let est = vec![StateVector::new(3.0, 9.0, 4.0, 9.0), StateVector::new(0.0, 5.0, 0.0, 5.0)];
        let zs = vec![Measurement::new(0.0, 1.0), Measurement::new(1.0, 0.0)];
        let report = ErrorReport::compute(&truth, &est, &zs, Some(2.0));
        assert_abs_diff_eq!(report.estimate_rmse, (25.0_f64 / 2.0).sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(report.measurement_rmse, 1.0, epsilon = 1e-12);
        assert_eq!(report.final_position_error, 0.0);
        assert_eq!(report.mean_nis, Some(2.0));
    }
}
