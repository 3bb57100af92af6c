//! Named-signal wavelet analysis pipeline.

use std::fmt;

use aeolus_rebin::{Mode, rebin_1d, rebin_2d};
use aeolus_store::{DisplayOptions, Variable, VariableStore};
use aeolus_wavelet::{CwtEngine, MAX_COMPONENTS, MultiCwtOutcome, multi_cwt};
use num_complex::Complex;
use tracing::debug;

use crate::coherence::{circular_pair, coherence, power_field};
use crate::config::AnalysisConfig;
use crate::error::SpectraError;
use crate::hermitian::cross_spectral_products;
use crate::rotation::{RotatedCwt, field_aligned};
use crate::sampling::repair_sampling;
use crate::signal::SampledSignal;
use crate::smoothing::{
    SmoothingKernel, bad_time_mask, masked, scale_widths, smooth_per_scale, smooth_series,
    smoothed_mask,
};

/// Reason an analysis produced no spectra.
///
/// These are expected conditions in batch processing, reported through
/// [`AnalysisOutcome::Insufficient`] instead of an error.
#[derive(Clone, Debug, PartialEq)]
pub enum Insufficiency {
    /// More samples than the guard allows and no time window given.
    TooManySamples {
        /// Samples in the signal.
        got: usize,
        /// Configured maximum.
        max: usize,
    },
    /// The requested time window holds no samples.
    EmptyWindow {
        /// Window start.
        start: f64,
        /// Window stop.
        stop: f64,
    },
    /// Every sample was non-finite.
    AllSamplesBad,
    /// The interval cannot support wavelet analysis.
    IntervalTooShort {
        /// Samples in the repaired interval.
        n_samples: usize,
        /// Interval duration in seconds.
        duration: f64,
    },
}

impl fmt::Display for Insufficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Insufficiency::TooManySamples { got, max } => {
                write!(f, "too many samples: got {got}, max {max} (supply a time window)")
            }
            Insufficiency::EmptyWindow { start, stop } => {
                write!(f, "no data in range [{start}, {stop}]")
            }
            Insufficiency::AllSamplesBad => write!(f, "all samples are non-finite"),
            Insufficiency::IntervalTooShort {
                n_samples,
                duration,
            } => {
                write!(f, "interval too short: {n_samples} samples spanning {duration} s")
            }
        }
    }
}

/// Outcome of [`analyze`].
#[derive(Clone, Debug)]
pub enum AnalysisOutcome {
    /// Spectra were derived and stored.
    Ready(AnalysisReport),
    /// The signal could not support the analysis.
    Insufficient(Insufficiency),
}

impl AnalysisOutcome {
    /// Returns `true` when spectra were stored.
    pub fn is_ready(&self) -> bool {
        matches!(self, AnalysisOutcome::Ready(_))
    }

    /// Consumes the outcome, returning the report if spectra were stored.
    pub fn into_report(self) -> Option<AnalysisReport> {
        match self {
            AnalysisOutcome::Ready(report) => Some(report),
            AnalysisOutcome::Insufficient(_) => None,
        }
    }
}

/// Summary of one completed analysis.
#[derive(Clone, Debug)]
pub struct AnalysisReport {
    emitted: Vec<String>,
    n_components: usize,
    n_samples: usize,
    n_scales: usize,
    n_dropped: usize,
    resampled: bool,
    periods: Vec<f64>,
}

impl AnalysisReport {
    /// Names of the stored spectra, in emission order.
    pub fn emitted(&self) -> &[String] {
        &self.emitted
    }

    /// Number of signal components analyzed.
    pub fn n_components(&self) -> usize {
        self.n_components
    }

    /// Number of samples after sampling repair.
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Number of scales on the shared axis.
    pub fn n_scales(&self) -> usize {
        self.n_scales
    }

    /// Number of non-finite samples dropped during repair.
    pub fn n_dropped(&self) -> usize {
        self.n_dropped
    }

    /// Whether the signal was resampled onto a uniform grid.
    pub fn resampled(&self) -> bool {
        self.resampled
    }

    /// Equivalent Fourier periods of the scale axis in seconds.
    pub fn periods(&self) -> &[f64] {
        &self.periods
    }
}

#[derive(Clone, Copy)]
enum ProductKind {
    Power,
    Fraction,
    Polarization,
    Signed,
    PositiveRatio,
}

/// A derived spectrum on the (scale x time) grid, pending emission.
struct Product {
    suffix: String,
    kind: ProductKind,
    field: Vec<Vec<f64>>,
}

/// A per-sample product with a small component axis (time-major).
struct SampleProduct {
    suffix: String,
    kind: ProductKind,
    rows: Vec<Vec<f64>>,
}

/// Runs the full analysis pipeline on a stored signal.
///
/// Stages, in order: ingest and component selection, window slicing or
/// the sample-count guard, sampling repair, the multi-component wavelet
/// transform, per-scale smoothing widths and the bad-sample mask, power
/// normalization, product derivation, optional time-resolution
/// reduction, and emission back into the store under
/// `<prefix><suffix>` names (the prefix defaults to the input name).
///
/// Data-insufficiency conditions (oversized input, empty window, all
/// samples bad, too short an interval) return
/// [`AnalysisOutcome::Insufficient`] so batch callers can log and move
/// on. Misconfiguration is an error.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`SpectraError::Store`] | `name` is not in the store |
/// | [`SpectraError::ComponentOutOfRange`] | selected component does not exist |
/// | [`SpectraError::WrongComponentCount`] | rotation or eigen analysis requested without exactly 3 components |
/// | [`SpectraError::InvalidSignal`] | timestamps are not strictly increasing |
/// | [`SpectraError::InvalidConfig`] | invalid window, averaging, normalization, scale index, or reduce factor |
/// | [`SpectraError::Wavelet`] | transform-level validation fails |
/// | [`SpectraError::Rebin`] | resolution reduction fails |
#[tracing::instrument(skip_all, fields(name = %name))]
pub fn analyze(
    engine: &mut CwtEngine,
    store: &mut VariableStore,
    name: &str,
    config: &AnalysisConfig,
) -> Result<AnalysisOutcome, SpectraError> {
    config.validate()?;

    // 1. Ingest the named signal, selecting one component if asked.
    let variable = store.get(name)?;
    let mut signal = SampledSignal::from_variable(variable);
    if let Some(component) = config.component() {
        signal = signal.select_component(component)?;
    }

    // 2. Slice to the window, or guard the sample count without one.
    let signal = match config.window() {
        Some(window) => {
            let (start, stop) = window.bounds();
            match signal.slice_window(start, stop) {
                Some(sliced) => sliced,
                None => {
                    debug!(start, stop, "window holds no samples");
                    return Ok(AnalysisOutcome::Insufficient(Insufficiency::EmptyWindow {
                        start,
                        stop,
                    }));
                }
            }
        }
        None if signal.n_samples() > config.max_samples() => {
            debug!(
                n_samples = signal.n_samples(),
                max_samples = config.max_samples(),
                "sample-count guard tripped"
            );
            return Ok(AnalysisOutcome::Insufficient(Insufficiency::TooManySamples {
                got: signal.n_samples(),
                max: config.max_samples(),
            }));
        }
        None => signal,
    };
    let n_components = signal.n_components();

    // Rotation and eigen analysis are explicit requests; a wrong
    // component count stops the run instead of being skipped like the
    // default-on products.
    if config.rotation().is_some() && n_components != 3 {
        return Err(SpectraError::WrongComponentCount {
            operation: "field-aligned rotation",
            required: 3,
            got: n_components,
        });
    }
    if config.hermitian().is_some() && n_components != 3 {
        return Err(SpectraError::WrongComponentCount {
            operation: "eigen analysis",
            required: 3,
            got: n_components,
        });
    }

    // 3. Repair the sampling grid.
    let Some(repaired) = repair_sampling(&signal)? else {
        return Ok(AnalysisOutcome::Insufficient(Insufficiency::AllSamplesBad));
    };
    if repaired.n_samples() < 4 {
        return Ok(AnalysisOutcome::Insufficient(Insufficiency::IntervalTooShort {
            n_samples: repaired.n_samples(),
            duration: repaired.duration(),
        }));
    }

    // 4. Transform every channel on a shared scale axis. The field
    //    magnitude rides along as an extra channel when requested.
    let with_magnitude =
        config.magnitude() && n_components >= 2 && n_components < MAX_COMPONENTS;
    if config.magnitude() && !with_magnitude {
        debug!(n_components, "skipping magnitude channel");
    }
    let mut channel_inputs = repaired.components.clone();
    if with_magnitude {
        channel_inputs.push(repaired.magnitude());
    }
    let result = match multi_cwt(engine, &channel_inputs, repaired.dt, config.transform())? {
        MultiCwtOutcome::Ready(result) => result,
        MultiCwtOutcome::IntervalTooShort {
            n_samples,
            duration,
        } => {
            return Ok(AnalysisOutcome::Insufficient(Insufficiency::IntervalTooShort {
                n_samples,
                duration,
            }));
        }
    };
    let n_times = result.n_times();
    let n_scales = result.n_scales();
    let periods = result.periods().to_vec();
    let frequencies = result.frequencies().to_vec();

    // 5. Per-scale smoothing widths and the bad-sample mask.
    let kernel = config.kernel();
    let widths = scale_widths(&periods, config.averaging_periods(), result.dt(), n_times);
    let mask = smoothed_mask(
        &bad_time_mask(n_times, &repaired.bad_indices),
        &widths,
        kernel,
    );

    // 6. Fold the normalization policies into the coefficients.
    let mut channels: Vec<Vec<Vec<Complex<f64>>>> = result.coefficients().to_vec();
    apply_normalization(
        &mut channels,
        config,
        &repaired.components,
        &periods,
        &frequencies,
        &widths,
        kernel,
    )?;

    // 7. Derive the products.
    let mut products: Vec<Product> = Vec::new();

    let component_powers: Vec<Vec<Vec<f64>>> = (0..n_components)
        .map(|component| power_field(&channels[component]))
        .collect();
    let mut total_power = vec![vec![0.0; n_times]; n_scales];
    for power in &component_powers {
        for (total_row, row) in total_power.iter_mut().zip(power) {
            for (total, &value) in total_row.iter_mut().zip(row) {
                *total += value;
            }
        }
    }
    products.push(Product {
        suffix: "_wv_pow".to_string(),
        kind: ProductKind::Power,
        field: total_power.clone(),
    });
    if n_components >= 2 {
        for (component, power) in component_powers.iter().enumerate() {
            products.push(Product {
                suffix: format!("_wv_pow_{component}"),
                kind: ProductKind::Power,
                field: power.clone(),
            });
        }
    }

    if with_magnitude {
        let magnitude_power = smooth_per_scale(
            &power_field(&channels[n_components]),
            &widths,
            kernel,
        );
        let smoothed_total = smooth_per_scale(&total_power, &widths, kernel);
        products.push(Product {
            suffix: "_wv_rat_mag".to_string(),
            kind: ProductKind::Fraction,
            field: ratio_field(&magnitude_power, &smoothed_total),
        });
    }

    let polarization_ready = config.polarization() && n_components >= 2;
    if config.polarization() && !polarization_ready {
        debug!(n_components, "skipping polarization products");
    }
    if polarization_ready {
        let (right, left) = circular_pair(&channels[0], &channels[1]);
        products.push(Product {
            suffix: "_wv_pol_circ".to_string(),
            kind: ProductKind::Polarization,
            field: polarization_ratio(&power_field(&right), &power_field(&left), &widths, kernel),
        });
        products.push(Product {
            suffix: "_wv_pol_lin".to_string(),
            kind: ProductKind::Polarization,
            field: polarization_ratio(&component_powers[0], &component_powers[1], &widths, kernel),
        });
    }

    let rotated: Option<RotatedCwt> = config.rotation().map(|spec| {
        field_aligned(
            &repaired.components,
            &channels[..3],
            &widths,
            kernel,
            spec.reference(),
        )
    });
    if let Some(rotated) = &rotated {
        let parallel_power = power_field(&rotated.parallel);
        let perp1_power = power_field(&rotated.perp1);
        let perp2_power = power_field(&rotated.perp2);
        let mut frame_total = parallel_power.clone();
        for (row, (perp1_row, perp2_row)) in
            frame_total.iter_mut().zip(perp1_power.iter().zip(&perp2_power))
        {
            for (total, (&p1, &p2)) in row.iter_mut().zip(perp1_row.iter().zip(perp2_row)) {
                *total += p1 + p2;
            }
        }
        products.push(Product {
            suffix: "_wv_frac_par".to_string(),
            kind: ProductKind::Fraction,
            field: ratio_field(
                &smooth_per_scale(&parallel_power, &widths, kernel),
                &smooth_per_scale(&frame_total, &widths, kernel),
            ),
        });
        let (right, left) = circular_pair(&rotated.perp1, &rotated.perp2);
        products.push(Product {
            suffix: "_wv_pol_perp".to_string(),
            kind: ProductKind::Polarization,
            field: polarization_ratio(&power_field(&right), &power_field(&left), &widths, kernel),
        });
    }

    let coherence_ready = config.coherence() && n_components >= 2;
    if config.coherence() && !coherence_ready {
        debug!(n_components, "skipping coherence products");
    }
    if coherence_ready {
        let (right, left) = circular_pair(&channels[0], &channels[1]);
        push_coherence(&mut products, "lin", &right, &left, &widths, kernel);
        push_coherence(&mut products, "circ", &channels[0], &channels[1], &widths, kernel);
        if let Some(rotated) = &rotated {
            let (right_perp, _) = circular_pair(&rotated.perp1, &rotated.perp2);
            push_coherence(&mut products, "par", &rotated.parallel, &right_perp, &widths, kernel);
        }
    }

    for product in &mut products {
        product.field = masked(&product.field, &mask);
    }

    let mut sample_products: Vec<SampleProduct> = Vec::new();
    if let Some(spec) = config.hermitian() {
        let scale_index = spec.scale_index().unwrap_or(n_scales / 2);
        if scale_index >= n_scales {
            return Err(SpectraError::InvalidConfig(format!(
                "hermitian scale index {scale_index} out of range, axis has {n_scales} scales"
            )));
        }
        debug!(scale_index, period = periods[scale_index], "eigen analysis scale");
        let summary =
            cross_spectral_products(&channels[..3], scale_index, widths[scale_index], kernel);
        let mask_row = &mask[scale_index];
        sample_products.push(SampleProduct {
            suffix: "_wv_herm_diag".to_string(),
            kind: ProductKind::Power,
            rows: masked_rows(summary.diagonal, mask_row),
        });
        sample_products.push(SampleProduct {
            suffix: "_wv_herm_off".to_string(),
            kind: ProductKind::Power,
            rows: masked_rows(summary.off_diagonal, mask_row),
        });
        sample_products.push(SampleProduct {
            suffix: "_wv_herm_eig".to_string(),
            kind: ProductKind::Fraction,
            rows: masked_rows(summary.eigenvalues, mask_row),
        });
    }

    // 8. Reduce the time resolution, truncating the remainder up front.
    let mut times = repaired.times.clone();
    let mut coi = result.coi().to_vec();
    if let Some(factor) = config.reduce_factor()
        && factor > 1
    {
        let keep = (n_times / factor) * factor;
        if keep == 0 {
            return Err(SpectraError::InvalidConfig(format!(
                "reduce factor {factor} exceeds the {n_times} available samples"
            )));
        }
        let offset = n_times - keep;
        let reduced_len = keep / factor;
        for product in &mut products {
            let truncated: Vec<Vec<f64>> = product
                .field
                .iter()
                .map(|row| row[offset..].to_vec())
                .collect();
            product.field = rebin_2d(&truncated, (n_scales, reduced_len), Mode::Average)?;
        }
        for sample_product in &mut sample_products {
            let truncated = sample_product.rows[offset..].to_vec();
            let width = sample_product.rows[0].len();
            sample_product.rows = rebin_2d(&truncated, (reduced_len, width), Mode::Average)?;
        }
        times = rebin_1d(&times[offset..], reduced_len, Mode::Average)?;
        coi = rebin_1d(&coi[offset..], reduced_len, Mode::Average)?;
        debug!(factor, n_times, reduced_len, "reduced time resolution");
    }

    // 9. Emit everything to the store.
    let prefix = config.prefix().unwrap_or(name);
    let mut emitted = Vec::new();
    for product in products {
        let rows = transpose(&product.field);
        let options = color_options(
            DisplayOptions::new()
                .with_axis_log(true)
                .with_axis_title("frequency (Hz)"),
            product.kind,
            &rows,
        );
        let full_name = format!("{prefix}{}", product.suffix);
        let variable =
            Variable::matrix(times.clone(), rows, Some(frequencies.clone()))?.with_options(options);
        store.insert(full_name.clone(), variable);
        emitted.push(full_name);
    }
    for sample_product in sample_products {
        let axis = (0..sample_product.rows[0].len()).map(|k| k as f64).collect();
        let options = color_options(
            DisplayOptions::new().with_axis_title("component"),
            sample_product.kind,
            &sample_product.rows,
        );
        let full_name = format!("{prefix}{}", sample_product.suffix);
        let variable = Variable::matrix(times.clone(), sample_product.rows, Some(axis))?
            .with_options(options);
        store.insert(full_name.clone(), variable);
        emitted.push(full_name);
    }
    let coi_name = format!("{prefix}_wv_coi");
    let coi_variable = Variable::scalar(times, coi)?
        .with_options(DisplayOptions::new().with_axis_log(true));
    store.insert(coi_name.clone(), coi_variable);
    emitted.push(coi_name);

    debug!(
        n_emitted = emitted.len(),
        n_scales,
        n_samples = repaired.n_samples(),
        "analysis complete"
    );
    Ok(AnalysisOutcome::Ready(AnalysisReport {
        emitted,
        n_components,
        n_samples: repaired.n_samples(),
        n_scales,
        n_dropped: repaired.bad_indices.len(),
        resampled: repaired.resampled,
        periods,
    }))
}

/// Multiplies `sqrt(weight)` into every coefficient, where the weight
/// combines the active normalization policies.
fn apply_normalization(
    channels: &mut [Vec<Vec<Complex<f64>>>],
    config: &AnalysisConfig,
    components: &[Vec<f64>],
    periods: &[f64],
    frequencies: &[f64],
    widths: &[usize],
    kernel: SmoothingKernel,
) -> Result<(), SpectraError> {
    let normalization = config.normalization();
    if normalization.is_identity() {
        return Ok(());
    }
    let n_times = components[0].len();

    let mut scale_weight = vec![1.0; periods.len()];
    if let Some(shape) = normalization.reference_shape() {
        for (weight, &period) in scale_weight.iter_mut().zip(periods) {
            *weight /= shape(period);
        }
    }
    if let Some(exponent) = normalization.frequency_exponent() {
        for (weight, &frequency) in scale_weight.iter_mut().zip(frequencies) {
            *weight *= frequency.powf(exponent);
        }
    }

    let mut scalar = 1.0;
    if normalization.fraction_of_mean_square() {
        let mean_square = components
            .iter()
            .map(|component| component.iter().map(|v| v * v).sum::<f64>())
            .sum::<f64>()
            / n_times as f64;
        if mean_square.is_finite() && mean_square > 0.0 {
            scalar /= mean_square;
        } else {
            debug!(mean_square, "mean square not positive, skipping that policy");
        }
    }

    let series_weight: Option<Vec<Vec<f64>>> = match normalization.series() {
        Some(series) => {
            if series.len() != n_times {
                return Err(SpectraError::InvalidConfig(format!(
                    "normalization series has {} samples, signal has {n_times}",
                    series.len()
                )));
            }
            Some(
                widths
                    .iter()
                    .map(|&width| {
                        smooth_series(series, width, kernel)
                            .iter()
                            .map(|&s| 1.0 / s)
                            .collect()
                    })
                    .collect(),
            )
        }
        None => None,
    };

    for channel in channels.iter_mut() {
        for (j, row) in channel.iter_mut().enumerate() {
            for (t, value) in row.iter_mut().enumerate() {
                let mut weight = scalar * scale_weight[j];
                if let Some(series_weight) = &series_weight {
                    weight *= series_weight[j][t];
                }
                *value *= weight.sqrt();
            }
        }
    }
    Ok(())
}

/// Appends the four coherence products for one channel basis.
fn push_coherence(
    products: &mut Vec<Product>,
    basis: &str,
    a: &[Vec<Complex<f64>>],
    b: &[Vec<Complex<f64>>],
    widths: &[usize],
    kernel: SmoothingKernel,
) {
    let coherence = coherence(a, b, widths, kernel);
    products.push(Product {
        suffix: format!("_wv_gam_{basis}"),
        kind: ProductKind::Fraction,
        field: coherence.gamma,
    });
    products.push(Product {
        suffix: format!("_wv_co_{basis}"),
        kind: ProductKind::Signed,
        field: coherence.co_spectrum,
    });
    products.push(Product {
        suffix: format!("_wv_quad_{basis}"),
        kind: ProductKind::Signed,
        field: coherence.quadrature,
    });
    products.push(Product {
        suffix: format!("_wv_rat_{basis}"),
        kind: ProductKind::PositiveRatio,
        field: coherence.power_ratio,
    });
}

/// Normalized difference `(a - b) / (a + b)` of two smoothed powers.
fn polarization_ratio(
    power_a: &[Vec<f64>],
    power_b: &[Vec<f64>],
    widths: &[usize],
    kernel: SmoothingKernel,
) -> Vec<Vec<f64>> {
    let a = smooth_per_scale(power_a, widths, kernel);
    let b = smooth_per_scale(power_b, widths, kernel);
    a.iter()
        .zip(&b)
        .map(|(row_a, row_b)| {
            row_a
                .iter()
                .zip(row_b)
                .map(|(&va, &vb)| {
                    let total = va + vb;
                    if total > 0.0 {
                        (va - vb) / total
                    } else {
                        f64::NAN
                    }
                })
                .collect()
        })
        .collect()
}

/// Elementwise `numerator / denominator`, NaN where the denominator is
/// not positive.
fn ratio_field(numerator: &[Vec<f64>], denominator: &[Vec<f64>]) -> Vec<Vec<f64>> {
    numerator
        .iter()
        .zip(denominator)
        .map(|(num_row, den_row)| {
            num_row
                .iter()
                .zip(den_row)
                .map(|(&n, &d)| if d > 0.0 { n / d } else { f64::NAN })
                .collect()
        })
        .collect()
}

fn masked_rows<const K: usize>(rows: Vec<[f64; K]>, mask: &[f64]) -> Vec<Vec<f64>> {
    rows.into_iter()
        .zip(mask)
        .map(|(row, &m)| row.iter().map(|&v| v * m).collect())
        .collect()
}

fn transpose(field: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n_cols = field[0].len();
    (0..n_cols)
        .map(|t| field.iter().map(|row| row[t]).collect())
        .collect()
}

/// Color-scale hints per product kind. Power-like products get a log
/// scale around the geometric mean, rounded to whole decades.
fn color_options(options: DisplayOptions, kind: ProductKind, rows: &[Vec<f64>]) -> DisplayOptions {
    match kind {
        ProductKind::Power | ProductKind::PositiveRatio => {
            let title = match kind {
                ProductKind::Power => "power",
                _ => "power ratio",
            };
            let options = options.with_color_log(true).with_color_title(title);
            match power_color_range(rows) {
                Some((low, high)) => options.with_color_range(low, high),
                None => options,
            }
        }
        ProductKind::Fraction => options.with_color_range(0.0, 1.0).with_color_title("fraction"),
        ProductKind::Polarization => options
            .with_color_range(-1.0, 1.0)
            .with_color_title("polarization"),
        ProductKind::Signed => options.with_color_title("cross power"),
    }
}

/// One decade either side of the geometric mean of the positive values,
/// rounded to a whole decade. `None` when nothing is positive.
fn power_color_range(rows: &[Vec<f64>]) -> Option<(f64, f64)> {
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    let geometric_mean = aeolus_stats::geometric_mean_positive(&flat)?;
    let decade = geometric_mean.log10().round();
    Some((10f64.powf(decade - 1.0), 10f64.powf(decade + 1.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn insufficiency_messages() {
        assert_eq!(
            Insufficiency::TooManySamples {
                got: 300_000,
                max: 262_144
            }
            .to_string(),
            "too many samples: got 300000, max 262144 (supply a time window)"
        );
        assert_eq!(
            Insufficiency::EmptyWindow {
                start: 5.0,
                stop: 6.0
            }
            .to_string(),
            "no data in range [5, 6]"
        );
        assert_eq!(
            Insufficiency::AllSamplesBad.to_string(),
            "all samples are non-finite"
        );
        assert_eq!(
            Insufficiency::IntervalTooShort {
                n_samples: 20,
                duration: 20.0
            }
            .to_string(),
            "interval too short: 20 samples spanning 20 s"
        );
    }

    #[test]
    fn transpose_swaps_axes() {
        let field = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        let rows = transpose(&field);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec![1.0, 4.0]);
        assert_eq!(rows[2], vec![3.0, 6.0]);
    }

    #[test]
    fn polarization_ratio_bounds() {
        let a = vec![vec![4.0; 9]];
        let b = vec![vec![0.0; 9]];
        let ratio = polarization_ratio(&a, &b, &[3], SmoothingKernel::Box);
        assert_relative_eq!(ratio[0][4], 1.0, epsilon = 1e-12);
        let ratio = polarization_ratio(&b, &a, &[3], SmoothingKernel::Box);
        assert_relative_eq!(ratio[0][4], -1.0, epsilon = 1e-12);
        let ratio = polarization_ratio(&a, &a, &[3], SmoothingKernel::Box);
        assert_relative_eq!(ratio[0][4], 0.0, epsilon = 1e-12);
        let ratio = polarization_ratio(&b, &b, &[3], SmoothingKernel::Box);
        assert!(ratio[0][4].is_nan());
    }

    #[test]
    fn ratio_field_guards_denominator() {
        let ratio = ratio_field(&[vec![6.0, 1.0]], &[vec![3.0, 0.0]]);
        assert_relative_eq!(ratio[0][0], 2.0);
        assert!(ratio[0][1].is_nan());
    }

    #[test]
    fn color_range_rounds_to_decades() {
        let rows = vec![vec![100.0, 100.0, 100.0]];
        let (low, high) = power_color_range(&rows).unwrap();
        assert_relative_eq!(low, 10.0, epsilon = 1e-9);
        assert_relative_eq!(high, 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn color_range_ignores_non_positive() {
        let rows = vec![vec![-1.0, 0.0, f64::NAN]];
        assert!(power_color_range(&rows).is_none());
    }

    #[test]
    fn masked_rows_applies_time_mask() {
        let rows = vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let out = masked_rows(rows, &[1.0, f64::NAN]);
        assert_eq!(out[0], vec![1.0, 2.0, 3.0]);
        assert!(out[1][0].is_nan());
    }

    #[test]
    fn outcome_accessors() {
        let insufficient = AnalysisOutcome::Insufficient(Insufficiency::AllSamplesBad);
        assert!(!insufficient.is_ready());
        assert!(insufficient.into_report().is_none());
    }
}
