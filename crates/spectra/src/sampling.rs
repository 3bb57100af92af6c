//! Gap detection and uniform-grid resampling.

use tracing::debug;

use crate::error::SpectraError;
use crate::signal::SampledSignal;

/// Relative spread of successive sampling gaps above which the grid is
/// treated as non-uniform and rebuilt.
const GAP_TOLERANCE: f64 = 0.01;

/// A signal brought onto a usable sampling grid.
///
/// Produced by [`repair_sampling`]. The timestamp axis is strictly
/// increasing and, when resampling fired, uniform up to rounding of the
/// original gaps. `bad_indices` are grid positions whose original samples
/// were dropped as non-finite; the smoothing stage turns them into a mask.
#[derive(Clone, Debug)]
pub(crate) struct RepairedSignal {
    pub(crate) times: Vec<f64>,
    pub(crate) components: Vec<Vec<f64>>,
    pub(crate) bad_indices: Vec<usize>,
    pub(crate) dt: f64,
    pub(crate) resampled: bool,
}

impl RepairedSignal {
    pub(crate) fn n_samples(&self) -> usize {
        self.times.len()
    }

    pub(crate) fn duration(&self) -> f64 {
        match self.times.len() {
            0 | 1 => 0.0,
            n => self.times[n - 1] - self.times[0],
        }
    }

    /// Euclidean norm across components at each sample.
    pub(crate) fn magnitude(&self) -> Vec<f64> {
        (0..self.n_samples())
            .map(|t| {
                self.components
                    .iter()
                    .map(|component| component[t] * component[t])
                    .sum::<f64>()
                    .sqrt()
            })
            .collect()
    }
}

/// Repairs the sampling grid of a signal.
///
/// Drops every sample with a non-finite timestamp or component value,
/// recording the original indices. If the surviving gaps spread by more
/// than [`GAP_TOLERANCE`] relative to their mean, the samples are placed
/// onto a uniform grid: each gap becomes the nearest positive multiple of
/// the median gap, intermediate slots stay empty, and both timestamps and
/// values are filled linearly across the empty slots.
///
/// Dropped-sample indices are carried over to the final grid by
/// proportional scaling (`round(i * n_new / n_old)`). When resampling has
/// shifted samples this mapping is only approximate: under heavy gap
/// rounding a mask position can land a slot or two off. Known imprecision,
/// kept deliberately; treat mask positions near large gaps as best-effort.
///
/// Returns `Ok(None)` when no finite sample survives.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`SpectraError::InvalidSignal`] | surviving timestamps are not strictly increasing |
pub(crate) fn repair_sampling(
    signal: &SampledSignal,
) -> Result<Option<RepairedSignal>, SpectraError> {
    let n_original = signal.n_samples();

    // 1. Drop rows with any non-finite entry.
    let mut times = Vec::with_capacity(n_original);
    let mut components: Vec<Vec<f64>> = vec![Vec::with_capacity(n_original); signal.n_components()];
    let mut dropped = Vec::new();
    for (index, &t) in signal.times().iter().enumerate() {
        let row_finite =
            t.is_finite() && signal.components().iter().all(|c| c[index].is_finite());
        if row_finite {
            times.push(t);
            for (kept, component) in components.iter_mut().zip(signal.components()) {
                kept.push(component[index]);
            }
        } else {
            dropped.push(index);
        }
    }
    if times.is_empty() {
        return Ok(None);
    }
    for window in times.windows(2) {
        if window[1] <= window[0] {
            return Err(SpectraError::InvalidSignal(
                "timestamps must be strictly increasing".to_string(),
            ));
        }
    }

    // 2. Decide whether the surviving grid is uniform enough.
    let gaps: Vec<f64> = times.windows(2).map(|w| w[1] - w[0]).collect();
    let resampled = if gaps.is_empty() {
        false
    } else {
        let mean_gap = aeolus_stats::mean(&gaps);
        let max_gap = gaps.iter().cloned().fold(f64::MIN, f64::max);
        let min_gap = gaps.iter().cloned().fold(f64::MAX, f64::min);
        (max_gap - min_gap) / mean_gap > GAP_TOLERANCE
    };

    // 3. Rebuild onto a uniform grid when needed.
    if resampled {
        let median_gap = aeolus_stats::median_unsorted(&gaps);
        let steps: Vec<usize> = gaps
            .iter()
            .map(|&gap| ((gap / median_gap).round() as usize).max(1))
            .collect();
        let n_new = 1 + steps.iter().sum::<usize>();

        let mut new_times = vec![f64::NAN; n_new];
        let mut new_components = vec![vec![f64::NAN; n_new]; components.len()];
        let mut slot = 0;
        new_times[0] = times[0];
        for component in 0..components.len() {
            new_components[component][0] = components[component][0];
        }
        for (i, &step) in steps.iter().enumerate() {
            slot += step;
            new_times[slot] = times[i + 1];
            for component in 0..components.len() {
                new_components[component][slot] = components[component][i + 1];
            }
        }
        linear_fill(&mut new_times);
        for component in &mut new_components {
            linear_fill(component);
        }
        debug!(
            n_original,
            n_new,
            n_dropped = dropped.len(),
            median_gap,
            "resampled onto uniform grid"
        );
        times = new_times;
        components = new_components;
    } else if !dropped.is_empty() {
        debug!(n_original, n_dropped = dropped.len(), "dropped non-finite samples");
    }

    // 4. Carry dropped indices to the final grid.
    let n_new = times.len();
    let bad_indices = dropped
        .iter()
        .map(|&d| {
            let scaled = (d as f64 * n_new as f64 / n_original as f64).round() as usize;
            scaled.min(n_new - 1)
        })
        .collect();

    let dt = if n_new > 1 {
        (times[n_new - 1] - times[0]) / (n_new - 1) as f64
    } else {
        0.0
    };

    Ok(Some(RepairedSignal {
        times,
        components,
        bad_indices,
        dt,
        resampled,
    }))
}

/// Replaces interior NaN runs by linear interpolation between the nearest
/// finite neighbors. Runs touching either end are left unchanged.
fn linear_fill(data: &mut [f64]) {
    let mut i = 0;
    while i < data.len() {
        if data[i].is_finite() {
            i += 1;
            continue;
        }
        let start = i;
        while i < data.len() && !data[i].is_finite() {
            i += 1;
        }
        if start == 0 || i == data.len() {
            continue;
        }
        let left = data[start - 1];
        let right = data[i];
        let span = (i - start + 1) as f64;
        for (offset, value) in data[start..i].iter_mut().enumerate() {
            *value = left + (right - left) * (offset + 1) as f64 / span;
        }
    }
}
