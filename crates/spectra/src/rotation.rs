//! Field-aligned rotation of vector wavelet coefficients.

use num_complex::Complex;

use crate::smoothing::{SmoothingKernel, smooth_series};

/// Wavelet coefficients of a 3-component signal expressed in a local
/// field-aligned frame, one (scale x time) field per axis.
///
/// The frame at each cell is right-handed orthonormal: `parallel` tracks
/// the background field direction, `perp1` lies along field x reference,
/// and `perp2` completes the triad. Cells where the smoothed field
/// vanishes carry NaN.
pub(crate) struct RotatedCwt {
    pub(crate) parallel: Vec<Vec<Complex<f64>>>,
    pub(crate) perp1: Vec<Vec<Complex<f64>>>,
    pub(crate) perp2: Vec<Vec<Complex<f64>>>,
}

/// Rotates 3-component coefficients into the local field-aligned frame.
///
/// The background direction at scale `j` is the raw field smoothed with
/// that scale's width, so larger scales see a smoother field. The caller
/// guarantees exactly three components in both `field` and
/// `coefficients`, and a `reference` that is finite and nonzero.
pub(crate) fn field_aligned(
    field: &[Vec<f64>],
    coefficients: &[Vec<Vec<Complex<f64>>>],
    widths: &[usize],
    kernel: SmoothingKernel,
    reference: [f64; 3],
) -> RotatedCwt {
    let n_scales = widths.len();
    let n_times = field[0].len();
    let nan_cell = Complex::new(f64::NAN, f64::NAN);

    let mut parallel = vec![vec![nan_cell; n_times]; n_scales];
    let mut perp1 = vec![vec![nan_cell; n_times]; n_scales];
    let mut perp2 = vec![vec![nan_cell; n_times]; n_scales];

    for (j, &width) in widths.iter().enumerate() {
        let background: Vec<Vec<f64>> = field
            .iter()
            .map(|component| smooth_series(component, width, kernel))
            .collect();
        for t in 0..n_times {
            let b = [background[0][t], background[1][t], background[2][t]];
            let Some(b_hat) = normalize(b) else {
                continue;
            };
            let e1 = match normalize(cross(b_hat, reference)) {
                Some(e1) => e1,
                // Field parallel to the reference; fall back to an axis
                // guaranteed not to be.
                None => match normalize(cross(b_hat, fallback_reference(reference))) {
                    Some(e1) => e1,
                    None => continue,
                },
            };
            let e2 = cross(b_hat, e1);

            let w = [
                coefficients[0][j][t],
                coefficients[1][j][t],
                coefficients[2][j][t],
            ];
            parallel[j][t] = project(w, b_hat);
            perp1[j][t] = project(w, e1);
            perp2[j][t] = project(w, e2);
        }
    }

    RotatedCwt {
        parallel,
        perp1,
        perp2,
    }
}

/// Picks a fallback axis orthogonal to the dominant component of the
/// reference direction.
fn fallback_reference(reference: [f64; 3]) -> [f64; 3] {
    let abs = [reference[0].abs(), reference[1].abs(), reference[2].abs()];
    if abs[0] >= abs[1] && abs[0] >= abs[2] {
        [0.0, 1.0, 0.0]
    } else {
        [1.0, 0.0, 0.0]
    }
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(v: [f64; 3]) -> Option<[f64; 3]> {
    let norm = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if !norm.is_finite() || norm < 1e-12 {
        return None;
    }
    Some([v[0] / norm, v[1] / norm, v[2] / norm])
}

fn project(w: [Complex<f64>; 3], axis: [f64; 3]) -> Complex<f64> {
    w[0] * axis[0] + w[1] * axis[1] + w[2] * axis[2]
}
