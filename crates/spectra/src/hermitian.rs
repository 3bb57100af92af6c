//! Cross-spectral matrix and eigen-anisotropy at a fixed scale.

use num_complex::Complex;

use crate::smoothing::{SmoothingKernel, smooth_series};

/// Per-sample summaries of the 3x3 Hermitian cross-spectral matrix.
pub(crate) struct HermitianProducts {
    /// Smoothed auto-power of each component, per sample.
    pub(crate) diagonal: Vec<[f64; 3]>,
    /// Magnitudes of the near-diagonal cross terms (0-1 and 1-2).
    pub(crate) off_diagonal: Vec<[f64; 2]>,
    /// Eigenvalues in descending order, normalized by the trace.
    pub(crate) eigenvalues: Vec<[f64; 3]>,
}

/// Builds the smoothed cross-spectral matrix of a 3-component transform
/// at one scale and summarizes it per time sample.
///
/// The caller guarantees exactly three components and a valid scale
/// index. Samples where the matrix is non-finite or has vanishing trace
/// yield NaN summaries.
pub(crate) fn cross_spectral_products(
    coefficients: &[Vec<Vec<Complex<f64>>>],
    scale_index: usize,
    width: usize,
    kernel: SmoothingKernel,
) -> HermitianProducts {
    let rows: Vec<&[Complex<f64>]> = coefficients
        .iter()
        .map(|component| component[scale_index].as_slice())
        .collect();
    let n_times = rows[0].len();

    // Smooth the six independent entries; conjugate symmetry gives the rest.
    let entry = |a: usize, b: usize| -> Vec<Complex<f64>> {
        let raw: Vec<Complex<f64>> = (0..n_times)
            .map(|t| rows[a][t] * rows[b][t].conj())
            .collect();
        smooth_series(&raw, width, kernel)
    };
    let m00 = entry(0, 0);
    let m11 = entry(1, 1);
    let m22 = entry(2, 2);
    let m01 = entry(0, 1);
    let m02 = entry(0, 2);
    let m12 = entry(1, 2);

    let mut diagonal = Vec::with_capacity(n_times);
    let mut off_diagonal = Vec::with_capacity(n_times);
    let mut eigenvalues = Vec::with_capacity(n_times);
    for t in 0..n_times {
        let diag = [m00[t].re, m11[t].re, m22[t].re];
        diagonal.push(diag);
        off_diagonal.push([m01[t].norm(), m12[t].norm()]);

        let trace = diag[0] + diag[1] + diag[2];
        if !trace.is_finite() || trace <= 0.0 {
            eigenvalues.push([f64::NAN; 3]);
            continue;
        }
        let eigs = hermitian_eigenvalues(diag, [m01[t], m02[t], m12[t]]);
        eigenvalues.push([eigs[0] / trace, eigs[1] / trace, eigs[2] / trace]);
    }

    HermitianProducts {
        diagonal,
        off_diagonal,
        eigenvalues,
    }
}

/// Eigenvalues of a 3x3 Hermitian matrix in descending order, via the
/// trigonometric closed form. `off` holds the upper-triangle entries
/// (0-1, 0-2, 1-2).
fn hermitian_eigenvalues(diag: [f64; 3], off: [Complex<f64>; 3]) -> [f64; 3] {
    let q = (diag[0] + diag[1] + diag[2]) / 3.0;
    let off_sq = off[0].norm_sqr() + off[1].norm_sqr() + off[2].norm_sqr();
    let p2 = (diag[0] - q).powi(2) + (diag[1] - q).powi(2) + (diag[2] - q).powi(2) + 2.0 * off_sq;
    let p = (p2 / 6.0).sqrt();
    if !p.is_finite() {
        return [f64::NAN; 3];
    }
    if p < 1e-300 {
        return [q, q, q];
    }

    // det((M - qI) / p), with the Hermitian cross terms folded into one
    // real triple product.
    let b = [(diag[0] - q) / p, (diag[1] - q) / p, (diag[2] - q) / p];
    let b01 = off[0] / p;
    let b02 = off[1] / p;
    let b12 = off[2] / p;
    let det = b[0] * b[1] * b[2] + 2.0 * (b01 * b12 * b02.conj()).re
        - b[0] * b12.norm_sqr()
        - b[1] * b02.norm_sqr()
        - b[2] * b01.norm_sqr();

    let r = (det / 2.0).clamp(-1.0, 1.0);
    let phi = r.acos() / 3.0;
    let eig_max = q + 2.0 * p * phi.cos();
    let eig_min = q + 2.0 * p * (phi + 2.0 * std::f64::consts::FRAC_PI_3).cos();
    let eig_mid = 3.0 * q - eig_max - eig_min;
    [eig_max, eig_mid, eig_min]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn zero() -> Complex<f64> {
        Complex::new(0.0, 0.0)
    }

    #[test]
    fn eigenvalues_of_diagonal_matrix() {
        let eigs = hermitian_eigenvalues([3.0, 1.0, 2.0], [zero(), zero(), zero()]);
        assert_relative_eq!(eigs[0], 3.0, epsilon = 1e-12);
        assert_relative_eq!(eigs[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(eigs[2], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn eigenvalues_of_scaled_identity() {
        let eigs = hermitian_eigenvalues([4.0, 4.0, 4.0], [zero(), zero(), zero()]);
        for &eig in &eigs {
            assert_relative_eq!(eig, 4.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn eigenvalues_of_complex_block() {
        // [[2, i, 0], [-i, 2, 0], [0, 0, 3]] has eigenvalues 3, 3, 1.
        let eigs = hermitian_eigenvalues(
            [2.0, 2.0, 3.0],
            [Complex::new(0.0, 1.0), zero(), zero()],
        );
        assert_relative_eq!(eigs[0], 3.0, epsilon = 1e-9);
        assert_relative_eq!(eigs[1], 3.0, epsilon = 1e-9);
        assert_relative_eq!(eigs[2], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn eigenvalues_of_rank_one_matrix() {
        // v v* with v = [1, i, 1]: eigenvalues 3, 0, 0.
        let v = [
            Complex::new(1.0, 0.0),
            Complex::new(0.0, 1.0),
            Complex::new(1.0, 0.0),
        ];
        let diag = [v[0].norm_sqr(), v[1].norm_sqr(), v[2].norm_sqr()];
        let off = [
            v[0] * v[1].conj(),
            v[0] * v[2].conj(),
            v[1] * v[2].conj(),
        ];
        let eigs = hermitian_eigenvalues(diag, off);
        assert_relative_eq!(eigs[0], 3.0, epsilon = 1e-9);
        assert_relative_eq!(eigs[1], 0.0, epsilon = 1e-9);
        assert_relative_eq!(eigs[2], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn eigenvalues_are_descending_for_random_matrix() {
        let eigs = hermitian_eigenvalues(
            [1.3, -0.2, 2.7],
            [
                Complex::new(0.4, -0.9),
                Complex::new(-1.1, 0.3),
                Complex::new(0.6, 0.0),
            ],
        );
        assert!(eigs[0] >= eigs[1]);
        assert!(eigs[1] >= eigs[2]);
        // Trace is preserved.
        assert_relative_eq!(eigs[0] + eigs[1] + eigs[2], 3.8, epsilon = 1e-9);
    }

    #[test]
    fn circular_pair_is_fully_polarized() {
        // Component 1 lags component 0 by a quarter turn; component 2 is
        // quiet. The cross-spectral matrix is rank one.
        let n = 16;
        let c = Complex::new(0.8, 0.6);
        let coefficients = vec![
            vec![vec![c; n]],
            vec![vec![c * Complex::new(0.0, -1.0); n]],
            vec![vec![zero(); n]],
        ];
        let products = cross_spectral_products(&coefficients, 0, 5, SmoothingKernel::Box);
        let mid = n / 2;
        assert_relative_eq!(products.eigenvalues[mid][0], 1.0, epsilon = 1e-9);
        assert_relative_eq!(products.eigenvalues[mid][1], 0.0, epsilon = 1e-9);
        assert_relative_eq!(products.diagonal[mid][0], 1.0, epsilon = 1e-9);
        assert_relative_eq!(products.diagonal[mid][2], 0.0, epsilon = 1e-9);
        assert_relative_eq!(products.off_diagonal[mid][0], 1.0, epsilon = 1e-9);
        assert_relative_eq!(products.off_diagonal[mid][1], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn vanishing_trace_yields_nan() {
        let n = 4;
        let coefficients = vec![vec![vec![zero(); n]]; 3];
        let products = cross_spectral_products(&coefficients, 0, 3, SmoothingKernel::Box);
        assert!(products.eigenvalues[0][0].is_nan());
    }
}
