//! Scale-dependent smoothing kernels and bad-sample masking.

use std::ops::{Add, Mul};

/// Smoothing kernel applied along the time axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SmoothingKernel {
    /// Flat moving average.
    Box,
    /// Gaussian taper with sigma = width / 4.
    #[default]
    Gaussian,
}

/// Computes per-scale smoothing widths in samples.
///
/// Each scale is smoothed over `averaging_periods` wavelet periods,
/// converted to samples via the sampling interval and clamped to
/// `[3, n_time - 1]` (the lower bound gives way when the series is
/// shorter than that).
pub(crate) fn scale_widths(
    periods: &[f64],
    averaging_periods: f64,
    dt: f64,
    n_time: usize,
) -> Vec<usize> {
    let upper = n_time.saturating_sub(1).max(1);
    let lower = 3.min(upper);
    periods
        .iter()
        .map(|&period| {
            let width = (averaging_periods * period / dt).round();
            if width.is_finite() && width >= 0.0 {
                (width as usize).clamp(lower, upper)
            } else {
                lower
            }
        })
        .collect()
}

/// Smooths one series with a symmetric window truncated at both edges.
///
/// The window spans `width / 2` samples on each side, so even widths act
/// as the next odd width. Widths below 2 return the series unchanged.
/// NaN values poison every window they fall in, which is what the
/// bad-time mask relies on.
pub(crate) fn smooth_series<T>(data: &[T], width: usize, kernel: SmoothingKernel) -> Vec<T>
where
    T: Copy + Default + Add<Output = T> + Mul<f64, Output = T>,
{
    let n = data.len();
    if width < 2 || n < 2 {
        return data.to_vec();
    }
    let half = width / 2;
    let sigma = width as f64 / 4.0;
    (0..n)
        .map(|center| {
            let start = center.saturating_sub(half);
            let stop = (center + half + 1).min(n);
            let mut acc = T::default();
            let mut weight_sum = 0.0;
            for (j, &value) in data.iter().enumerate().take(stop).skip(start) {
                let weight = match kernel {
                    SmoothingKernel::Box => 1.0,
                    SmoothingKernel::Gaussian => {
                        let offset = (j as f64 - center as f64) / sigma;
                        (-0.5 * offset * offset).exp()
                    }
                };
                acc = acc + value * weight;
                weight_sum += weight;
            }
            acc * (1.0 / weight_sum)
        })
        .collect()
}

/// Smooths every scale row of a (scale x time) field with its own width.
pub(crate) fn smooth_per_scale<T>(
    field: &[Vec<T>],
    widths: &[usize],
    kernel: SmoothingKernel,
) -> Vec<Vec<T>>
where
    T: Copy + Default + Add<Output = T> + Mul<f64, Output = T>,
{
    field
        .iter()
        .zip(widths)
        .map(|(row, &width)| smooth_series(row, width, kernel))
        .collect()
}

/// Builds the unit time mask with NaN holes at bad samples.
pub(crate) fn bad_time_mask(n_time: usize, bad_indices: &[usize]) -> Vec<f64> {
    let mut mask = vec![1.0; n_time];
    for &index in bad_indices {
        if index < n_time {
            mask[index] = f64::NAN;
        }
    }
    mask
}

/// Smooths the time mask once per scale so holes widen with the
/// smoothing window.
pub(crate) fn smoothed_mask(
    mask: &[f64],
    widths: &[usize],
    kernel: SmoothingKernel,
) -> Vec<Vec<f64>> {
    widths
        .iter()
        .map(|&width| smooth_series(mask, width, kernel))
        .collect()
}

/// Multiplies a per-scale mask into a field, returning a new field.
pub(crate) fn masked(field: &[Vec<f64>], mask: &[Vec<f64>]) -> Vec<Vec<f64>> {
    field
        .iter()
        .zip(mask)
        .map(|(row, mask_row)| row.iter().zip(mask_row).map(|(&v, &m)| v * m).collect())
        .collect()
}
