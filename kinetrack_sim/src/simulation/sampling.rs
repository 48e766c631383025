// kinetrack_sim/src/simulation/sampling.rs

//! Correlated Gaussian noise for the process disturbance and the sensor.

use kinetrack_core::error::{EstimationError, Result};
use kinetrack_core::types::{InnovationCovariance, Measurement, StateCovariance, StateVector};
use kinetrack_core::utils::linalg::{covariance_sqrt, CovarianceRoot};
use nalgebra::{DMatrix, DVector};
use rand_distr::{Distribution, StandardNormal};

use crate::simulation::core::prng::SimulationRng;

/// Draws vectors from `N(μ, Σ)` for arbitrary (possibly singular) PSD `Σ`.
///
/// Every draw consumes exactly `n` standard normals from the shared source,
/// even when `Σ` is zero, so switching one noise source off does not shift
/// the random stream seen by the other.
#[derive(Debug)]
pub struct GaussianSampler {
    rng: SimulationRng,
}

impl GaussianSampler {
    pub fn new(rng: SimulationRng) -> Self {
        Self { rng }
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Factors `Σ` once so that repeated draws can skip the decomposition.
    pub fn factor(cov: &DMatrix<f64>) -> Result<CovarianceRoot> {
        covariance_sqrt(cov)
    }

    /// Samples `μ + L·z` with `z ~ N(0, I)`.
    pub fn sample(&mut self, mean: &DVector<f64>, cov: &DMatrix<f64>) -> Result<DVector<f64>> {
        if cov.nrows() != mean.nrows() {
            return Err(EstimationError::configuration(format!(
                "mean has length {} but covariance is {}x{}",
                mean.nrows(),
                cov.nrows(),
                cov.ncols()
            )));
        }
        let root = Self::factor(cov)?;
        self.sample_factored(mean, &root)
    }

    /// Same as [`GaussianSampler::sample`] with a precomputed square root.
    pub fn sample_factored(
        &mut self,
        mean: &DVector<f64>,
        root: &CovarianceRoot,
    ) -> Result<DVector<f64>> {
        let n = mean.nrows();
        if let CovarianceRoot::Factor(l) = root {
            if l.nrows() != n {
                return Err(EstimationError::configuration(format!(
                    "mean has length {} but covariance factor has {} rows",
                    n,
                    l.nrows()
                )));
            }
        }

        let z = self.standard_normals(n);
        match root {
            // Degenerate prior: the sample is the mean, bit for bit.
            CovarianceRoot::Zero => Ok(mean.clone()),
            CovarianceRoot::Factor(_) => Ok(mean + root.apply(&z)),
        }
    }

    pub fn sample_state(
        &mut self,
        mean: &StateVector,
        root: &CovarianceRoot,
    ) -> Result<StateVector> {
        let mean = DVector::from_column_slice(mean.as_slice());
        let drawn = self.sample_factored(&mean, root)?;
        Ok(StateVector::from_column_slice(drawn.as_slice()))
    }

    pub fn sample_measurement(
        &mut self,
        mean: &Measurement,
        root: &CovarianceRoot,
    ) -> Result<Measurement> {
        let mean = DVector::from_column_slice(mean.as_slice());
        let drawn = self.sample_factored(&mean, root)?;
        Ok(Measurement::from_column_slice(drawn.as_slice()))
    }

    fn standard_normals(&mut self, n: usize) -> DVector<f64> {
        let rng = self.rng.rng_mut();
        DVector::from_fn(n, |_, _| StandardNormal.sample(&mut *rng))
    }
}

/// Converts a fixed-size state covariance for the dynamically-sized factorization.
pub fn state_covariance_to_dynamic(cov: &StateCovariance) -> DMatrix<f64> {
    DMatrix::from_column_slice(cov.nrows(), cov.ncols(), cov.as_slice())
}

pub fn innovation_covariance_to_dynamic(cov: &InnovationCovariance) -> DMatrix<f64> {
    DMatrix::from_column_slice(cov.nrows(), cov.ncols(), cov.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sampler(seed: u64) -> GaussianSampler {
        GaussianSampler::new(SimulationRng::from_seed(Some(seed)))
    }

    #[test]
    fn zero_covariance_returns_mean_unperturbed() {
        let mut s = sampler(7);
        let mean = DVector::from_vec(vec![1.5, -2.25, 0.1]);
        let drawn = s.sample(&mean, &DMatrix::zeros(3, 3)).unwrap();
        assert_eq!(drawn, mean);
    }

    #[test]
    fn zero_covariance_still_advances_the_stream() {
        let mut with_zero = sampler(11);
        let mut without = sampler(11);
        let mean = DVector::zeros(2);
        let cov = DMatrix::identity(2, 2);

        with_zero.sample(&mean, &DMatrix::zeros(2, 2)).unwrap();
        without.standard_normals(2);

        assert_eq!(
            with_zero.sample(&mean, &cov).unwrap(),
            without.sample(&mean, &cov).unwrap()
        );
    }

    #[test]
    fn singular_covariance_samples_stay_on_its_support() {
        // All mass on the line x = y.
        let mut s = sampler(3);
        let cov = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        let mean = DVector::from_vec(vec![5.0, 5.0]);
        for _ in 0..50 {
            let v = s.sample(&mean, &cov).unwrap();
            assert_abs_diff_eq!(v[0], v[1], epsilon = 1e-9);
        }
    }

    #[test]
    fn empirical_moments_match_target() {
        let mut s = sampler(42);
        let cov = DMatrix::from_row_slice(2, 2, &[2.0, 0.8, 0.8, 1.0]);
        let mean = DVector::from_vec(vec![1.0, -1.0]);
        let root = GaussianSampler::factor(&cov).unwrap();

        let n = 20_000;
        let draws: Vec<DVector<f64>> = (0..n)
            .map(|_| s.sample_factored(&mean, &root).unwrap())
            .collect();
        let avg = draws.iter().fold(DVector::zeros(2), |acc, d| acc + d) / n as f64;
        let emp_cov = draws
            .iter()
            .map(|d| (d - &avg) * (d - &avg).transpose())
            .fold(DMatrix::zeros(2, 2), |acc, m| acc + m)
            / (n - 1) as f64;

        assert_abs_diff_eq!(avg, mean, epsilon = 0.05);
        assert_abs_diff_eq!(emp_cov, cov, epsilon = 0.1);
    }

    #[test]
    fn invalid_covariances_are_numerical_errors() {
        let mut s = sampler(1);
        let mean = DVector::zeros(2);

        let asym = DMatrix::from_row_slice(2, 2, &[1.0, 0.3, -0.3, 1.0]);
        assert!(matches!(
            s.sample(&mean, &asym).unwrap_err(),
            EstimationError::Numerical(_)
        ));

        let indefinite = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 1.0]);
        assert!(matches!(
            s.sample(&mean, &indefinite).unwrap_err(),
            EstimationError::Numerical(_)
        ));
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let mut s = sampler(1);
        let err = s
            .sample(&DVector::zeros(3), &DMatrix::identity(2, 2))
            .unwrap_err();
        assert!(matches!(err, EstimationError::Configuration(_)));
    }

    #[test]
    fn same_seed_same_samples() {
        let cov = DMatrix::identity(4, 4) * 0.5;
        let mean = DVector::zeros(4);
        let a = sampler(99).sample(&mean, &cov).unwrap();
        let b = sampler(99).sample(&mean, &cov).unwrap();
        assert_eq!(a, b);
    }
}
