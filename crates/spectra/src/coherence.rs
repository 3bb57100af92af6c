//! Cross-correlation products between two complex coefficient channels.

use num_complex::Complex;

use crate::smoothing::{SmoothingKernel, smooth_per_scale};

/// Coherence family computed from one channel pair.
///
/// All fields are (scale x time). Cells where either smoothed auto-power
/// vanishes are NaN rather than spuriously coherent.
pub(crate) struct CoherenceProducts {
    /// Coherence in `[0, 1]`.
    pub(crate) gamma: Vec<Vec<f64>>,
    /// Real part of the smoothed cross-spectrum.
    pub(crate) co_spectrum: Vec<Vec<f64>>,
    /// Imaginary part of the smoothed cross-spectrum.
    pub(crate) quadrature: Vec<Vec<f64>>,
    /// Ratio of the smoothed auto-powers, first over second.
    pub(crate) power_ratio: Vec<Vec<f64>>,
}

/// Computes coherence products between channels `a` and `b`.
///
/// The cross-spectrum and both auto-powers are smoothed with the
/// per-scale widths before combining, per the standard estimator
/// `gamma^2 = |<a b*>|^2 / (<|a|^2> <|b|^2>)`.
pub(crate) fn coherence(
    a: &[Vec<Complex<f64>>],
    b: &[Vec<Complex<f64>>],
    widths: &[usize],
    kernel: SmoothingKernel,
) -> CoherenceProducts {
    let cross: Vec<Vec<Complex<f64>>> = a
        .iter()
        .zip(b)
        .map(|(row_a, row_b)| {
            row_a
                .iter()
                .zip(row_b)
                .map(|(&va, &vb)| va * vb.conj())
                .collect()
        })
        .collect();
    let cross = smooth_per_scale(&cross, widths, kernel);
    let power_a = smooth_per_scale(&power_field(a), widths, kernel);
    let power_b = smooth_per_scale(&power_field(b), widths, kernel);

    let n_scales = cross.len();
    let mut gamma = Vec::with_capacity(n_scales);
    let mut co_spectrum = Vec::with_capacity(n_scales);
    let mut quadrature = Vec::with_capacity(n_scales);
    let mut power_ratio = Vec::with_capacity(n_scales);
    for j in 0..n_scales {
        let n_times = cross[j].len();
        let mut gamma_row = Vec::with_capacity(n_times);
        let mut co_row = Vec::with_capacity(n_times);
        let mut quad_row = Vec::with_capacity(n_times);
        let mut ratio_row = Vec::with_capacity(n_times);
        for t in 0..n_times {
            let denominator = power_a[j][t] * power_b[j][t];
            if denominator.is_finite() && denominator > 0.0 {
                gamma_row.push((cross[j][t].norm_sqr() / denominator).sqrt().clamp(0.0, 1.0));
                ratio_row.push(power_a[j][t] / power_b[j][t]);
            } else {
                gamma_row.push(f64::NAN);
                ratio_row.push(f64::NAN);
            }
            co_row.push(cross[j][t].re);
            quad_row.push(cross[j][t].im);
        }
        gamma.push(gamma_row);
        co_spectrum.push(co_row);
        quadrature.push(quad_row);
        power_ratio.push(ratio_row);
    }

    CoherenceProducts {
        gamma,
        co_spectrum,
        quadrature,
        power_ratio,
    }
}

/// Squared magnitude of every coefficient cell.
pub(crate) fn power_field(field: &[Vec<Complex<f64>>]) -> Vec<Vec<f64>> {
    field
        .iter()
        .map(|row| row.iter().map(Complex::norm_sqr).collect())
        .collect()
}

/// Forms the right- and left-handed combinations `(a +/- i b) / sqrt(2)`
/// of two coefficient channels. Total power is preserved.
pub(crate) fn circular_pair(
    a: &[Vec<Complex<f64>>],
    b: &[Vec<Complex<f64>>],
) -> (Vec<Vec<Complex<f64>>>, Vec<Vec<Complex<f64>>>) {
    let i = Complex::new(0.0, 1.0);
    let scale = std::f64::consts::FRAC_1_SQRT_2;
    let mut right = Vec::with_capacity(a.len());
    let mut left = Vec::with_capacity(a.len());
    for (row_a, row_b) in a.iter().zip(b) {
        let mut right_row = Vec::with_capacity(row_a.len());
        let mut left_row = Vec::with_capacity(row_a.len());
        for (&va, &vb) in row_a.iter().zip(row_b) {
            right_row.push((va + i * vb) * scale);
            left_row.push((va - i * vb) * scale);
        }
        right.push(right_row);
        left.push(left_row);
    }
    (right, left)
}
