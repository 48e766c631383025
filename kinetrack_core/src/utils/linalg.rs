// kinetrack_core/src/utils/linalg.rs

//! Small, explicit linear-algebra helpers shared by the sampler and the filter.
//!
//! Everything here surfaces degenerate input as an [`EstimationError`] instead
//! of letting `NaN`/`Inf` leak into the recursion.

use nalgebra::{DMatrix, DVector, Dim, Matrix, Matrix2, RawStorage, SymmetricEigen};

use crate::error::{EstimationError, Result};
use crate::types::{InnovationCovariance, StateCovariance};

/// Largest tolerated `|M - Mᵗ|` entry, relative to the largest entry of `M`.
pub const SYMMETRY_TOLERANCE: f64 = 1e-9;
/// Most negative tolerated eigenvalue, relative to the largest entry of `M`.
pub const PSD_TOLERANCE: f64 = 1e-9;
/// `det(S) / (S₀₀·S₁₁)` (that is `1 - ρ²`) at or below this is treated as singular.
pub const SINGULARITY_TOLERANCE: f64 = 1e-12;

pub const SINGULAR_INNOVATION_MSG: &str = "non-invertible innovation covariance";

/// Largest absolute entry of a matrix (0 for an empty one).
pub fn max_abs<R: Dim, C: Dim, S: RawStorage<f64, R, C>>(m: &Matrix<f64, R, C, S>) -> f64 {
    m.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}

/// `max |M[i,j] - M[j,i]|`. Non-square input is maximally asymmetric.
pub fn max_asymmetry<R: Dim, C: Dim, S: RawStorage<f64, R, C>>(m: &Matrix<f64, R, C, S>) -> f64 {
    if m.nrows() != m.ncols() {
        return f64::INFINITY;
    }
    let n = m.nrows();
    let mut worst = 0.0_f64;
    for i in 0..n {
        for j in (i + 1)..n {
            worst = worst.max((m[(i, j)] - m[(j, i)]).abs());
        }
    }
    worst
}

/// Symmetric within [`SYMMETRY_TOLERANCE`] times the largest entry. The zero
/// matrix is symmetric.
pub fn is_symmetric<R: Dim, C: Dim, S: RawStorage<f64, R, C>>(m: &Matrix<f64, R, C, S>) -> bool {
    max_asymmetry(m) <= SYMMETRY_TOLERANCE * max_abs(m)
}

/// True only when every entry is exactly zero.
pub fn is_exactly_zero<R: Dim, C: Dim, S: RawStorage<f64, R, C>>(
    m: &Matrix<f64, R, C, S>,
) -> bool {
    m.iter().all(|v| *v == 0.0)
}

/// Returns `(P + Pᵗ) / 2`. Leaves the trace untouched.
pub fn symmetrize(p: &StateCovariance) -> StateCovariance {
    (p + p.transpose()) * 0.5
}

/// A "square root" `L` of a covariance `Σ`, with `L·Lᵗ = Σ`.
#[derive(Debug, Clone, PartialEq)]
pub enum CovarianceRoot {
    /// `Σ` is exactly the zero matrix: samples collapse onto the mean.
    Zero,
    /// `Σ` is non-zero and PSD (possibly singular).
    Factor(DMatrix<f64>),
}

impl CovarianceRoot {
    /// Maps a standard-normal vector `z` to a zero-mean perturbation `L·z`.
    pub fn apply(&self, z: &DVector<f64>) -> DVector<f64> {
        match self {
            CovarianceRoot::Zero => DVector::zeros(z.nrows()),
            CovarianceRoot::Factor(l) => l * z,
        }
    }
}

/// Factors a covariance matrix through its eigen-decomposition.
///
/// Unlike a strict Cholesky, this accepts rank-deficient input: eigenvalues in
/// `[-tol, 0)` are clamped to zero. Fails if `Σ` is not square, not finite, not
/// symmetric, or has an eigenvalue below `-tol`.
pub fn covariance_sqrt(cov: &DMatrix<f64>) -> Result<CovarianceRoot> {
    if cov.nrows() != cov.ncols() {
        return Err(EstimationError::numerical(format!(
            "covariance must be square, got {}x{}",
            cov.nrows(),
            cov.ncols()
        )));
    }
    if cov.iter().any(|v| !v.is_finite()) {
        return Err(EstimationError::numerical(
            "covariance contains non-finite entries",
        ));
    }
    if is_exactly_zero(cov) {
        return Ok(CovarianceRoot::Zero);
    }
    if !is_symmetric(cov) {
        return Err(EstimationError::numerical(format!(
            "covariance is not symmetric (max asymmetry {:e})",
            max_asymmetry(cov)
        )));
    }

    let scale = max_abs(cov);
    let eigen = SymmetricEigen::new(cov.clone());
    let min_eigenvalue = eigen.eigenvalues.min();
    if min_eigenvalue < -PSD_TOLERANCE * scale {
        return Err(EstimationError::numerical(format!(
            "covariance is not positive semi-definite (min eigenvalue {:e})",
            min_eigenvalue
        )));
    }

    let sqrt_eigenvalues = eigen.eigenvalues.map(|lambda| lambda.max(0.0).sqrt());
    let factor = &eigen.eigenvectors * DMatrix::from_diagonal(&sqrt_eigenvalues);
    Ok(CovarianceRoot::Factor(factor))
}

/// Closed-form inverse of a 2×2 innovation covariance.
///
/// The determinant is compared against the product of the diagonal, so the
/// check depends only on the correlation between the axes and not on how
/// differently they are scaled. A zero matrix is reported as singular rather
/// than producing `Inf`.
pub fn invert_innovation(s: &InnovationCovariance) -> Result<InnovationCovariance> {
    if is_exactly_zero(s) || s.iter().any(|v| !v.is_finite()) {
        return Err(EstimationError::numerical(SINGULAR_INNOVATION_MSG));
    }
    let det = s[(0, 0)] * s[(1, 1)] - s[(0, 1)] * s[(1, 0)];
    if !det.is_finite() || det <= SINGULARITY_TOLERANCE * (s[(0, 0)] * s[(1, 1)]).abs() {
        return Err(EstimationError::numerical(SINGULAR_INNOVATION_MSG));
    }
    Ok(Matrix2::new(s[(1, 1)], -s[(0, 1)], -s[(1, 0)], s[(0, 0)]) / det)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::Matrix4;

    const EPS: f64 = 1e-10;

    fn reconstruct(root: &CovarianceRoot, n: usize) -> DMatrix<f64> {
        match root {
            CovarianceRoot::Zero => DMatrix::zeros(n, n),
            CovarianceRoot::Factor(l) => l * l.transpose(),
        }
    }

    #[test]
    fn zero_matrix_is_its_own_branch() {
        let root = covariance_sqrt(&DMatrix::zeros(3, 3)).unwrap();
        assert_eq!(root, CovarianceRoot::Zero);
        let z = DVector::from_vec(vec![1.0, -2.0, 3.0]);
        assert_eq!(root.apply(&z), DVector::zeros(3));
    }

    #[test]
    fn full_rank_factor_reproduces_covariance() {
        let cov = DMatrix::from_row_slice(2, 2, &[4.0, 1.2, 1.2, 2.0]);
        let root = covariance_sqrt(&cov).unwrap();
        assert_abs_diff_eq!(reconstruct(&root, 2), cov, epsilon = EPS);
    }

    #[test]
    fn singular_covariance_still_factors() {
        // Rank one: [1, 1]ᵗ [1, 1].
        let cov = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        let root = covariance_sqrt(&cov).unwrap();
        assert_abs_diff_eq!(reconstruct(&root, 2), cov, epsilon = EPS);

        // Block-diagonal process noise with one axis switched off.
        let mut q = DMatrix::zeros(4, 4);
        q[(0, 0)] = 1.0 / 3.0;
        q[(0, 1)] = 0.5;
        q[(1, 0)] = 0.5;
        q[(1, 1)] = 1.0;
        let root = covariance_sqrt(&q).unwrap();
        assert_abs_diff_eq!(reconstruct(&root, 4), q, epsilon = EPS);
    }

    #[test]
    fn asymmetric_covariance_is_rejected() {
        let cov = DMatrix::from_row_slice(2, 2, &[1.0, 0.5, 0.0, 1.0]);
        let err = covariance_sqrt(&cov).unwrap_err();
        assert!(matches!(err, EstimationError::Numerical(_)));
    }

    #[test]
    fn indefinite_covariance_is_rejected() {
        let cov = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, -1.0]);
        let err = covariance_sqrt(&cov).unwrap_err();
        assert!(matches!(err, EstimationError::Numerical(_)));
    }

    #[test]
    fn non_square_covariance_is_rejected() {
        assert!(covariance_sqrt(&DMatrix::zeros(2, 3)).is_err());
    }

    #[test]
    fn closed_form_inverse_matches_identity() {
        let s = Matrix2::new(2.0, 0.5, 0.5, 1.0);
        let inv = invert_innovation(&s).unwrap();
        assert_abs_diff_eq!(s * inv, Matrix2::identity(), epsilon = EPS);
    }

    #[test]
    fn singular_innovation_is_reported() {
        let err = invert_innovation(&Matrix2::zeros()).unwrap_err();
        assert_eq!(err, EstimationError::numerical(SINGULAR_INNOVATION_MSG));

        let rank_one = Matrix2::new(1.0, 2.0, 2.0, 4.0);
        assert!(invert_innovation(&rank_one).is_err());

        let one_axis_blind = Matrix2::new(0.0, 0.0, 0.0, 0.09);
        assert!(invert_innovation(&one_axis_blind).is_err());
    }

    #[test]
    fn badly_scaled_innovation_is_still_invertible() {
        // Diffuse along x, tight along y.
        let s = Matrix2::new(1e12, 0.0, 0.0, 0.09);
        let inv = invert_innovation(&s).unwrap();
        assert_abs_diff_eq!(inv[(0, 0)], 1e-12, epsilon = 1e-24);
        assert_abs_diff_eq!(inv[(1, 1)], 1.0 / 0.09, epsilon = 1e-9);

        let correlated = Matrix2::new(1e6, 10.0, 10.0, 1e-3);
        let inv = invert_innovation(&correlated).unwrap();
        assert_abs_diff_eq!(correlated * inv, Matrix2::identity(), epsilon = 1e-9);
    }

    #[test]
    fn small_scale_asymmetry_is_detected() {
        let cov = DMatrix::from_row_slice(2, 2, &[1e-12, 1e-10, 0.0, 1e-12]);
        assert!(!is_symmetric(&cov));
        let err = covariance_sqrt(&cov).unwrap_err();
        assert!(matches!(err, EstimationError::Numerical(_)));

        let tiny = DMatrix::from_row_slice(2, 2, &[4e-12, 1e-12, 1e-12, 2e-12]);
        let root = covariance_sqrt(&tiny).unwrap();
        assert_abs_diff_eq!(reconstruct(&root, 2), tiny, epsilon = 1e-20);
    }

    #[test]
    fn symmetrize_keeps_trace() {
        let p = Matrix4::from_fn(|i, j| (i * 4 + j) as f64);
        let sym = symmetrize(&p);
        assert_eq!(max_asymmetry(&sym), 0.0);
        assert_abs_diff_eq!(sym.trace(), p.trace(), epsilon = EPS);
    }
}
