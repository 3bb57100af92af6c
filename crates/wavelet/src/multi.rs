//! Multi-component wrapper around the core transform.
//!
//! Picks a scale axis from the series duration (or an explicit period or
//! frequency range), runs the engine once per vector component on that
//! shared axis, normalizes to spectral density, and stacks the results
//! along a component axis.

use num_complex::Complex;
use tracing::debug;

use crate::error::WaveletError;
use crate::mother::Mother;
use crate::transform::{CwtConfig, CwtEngine, PadMode};

/// Maximum number of vector components accepted by the wrapper.
pub const MAX_COMPONENTS: usize = 4;

/// Configuration for a multi-component transform.
///
/// Use the builder methods to customize the analysis parameters.
///
/// # Example
///
/// ```ignore
/// use aeolus_wavelet::{Mother, MultiCwtConfig};
///
/// let config = MultiCwtConfig::new()
///     .with_mother(Mother::morlet())
///     .with_period_range(4.0, 120.0);
/// ```
#[derive(Clone, Debug)]
pub struct MultiCwtConfig {
    /// Wavelet family and shape parameter.
    mother: Mother,
    /// Fractional octave spacing (None = from the mother's bandwidth).
    dj: Option<f64>,
    /// Explicit period range in seconds (None = from the series duration).
    period_range: Option<(f64, f64)>,
    /// Explicit frequency range in Hz, alternative to the period range.
    frequency_range: Option<(f64, f64)>,
    /// Zero-padding policy passed to the engine.
    pad: PadMode,
    /// Background lag-1 autocorrelation (None = estimate per component).
    lag1: Option<f64>,
    /// Confidence level for the significance threshold.
    confidence: f64,
}

impl MultiCwtConfig {
    /// Creates a new `MultiCwtConfig` with default parameters.
    ///
    /// Defaults: Morlet wavelet with wavenumber 6, `dj = None` (from the
    /// mother's bandwidth), no explicit period or frequency range,
    /// `pad = NextPow2`, `lag1 = None` (estimated per component),
    /// `confidence = 0.95`.
    pub fn new() -> Self {
        Self {
            mother: Mother::morlet(),
            dj: None,
            period_range: None,
            frequency_range: None,
            pad: PadMode::NextPow2,
            lag1: None,
            confidence: 0.95,
        }
    }

    /// Sets the wavelet family and shape parameter.
    pub fn with_mother(mut self, mother: Mother) -> Self {
        self.mother = mother;
        self
    }

    /// Sets the fractional octave spacing.
    pub fn with_dj(mut self, dj: f64) -> Self {
        self.dj = Some(dj);
        self
    }

    /// Sets an explicit period range in seconds.
    pub fn with_period_range(mut self, min: f64, max: f64) -> Self {
        self.period_range = Some((min, max));
        self
    }

    /// Sets an explicit frequency range in Hz.
    pub fn with_frequency_range(mut self, min: f64, max: f64) -> Self {
        self.frequency_range = Some((min, max));
        self
    }

    /// Sets the zero-padding policy.
    pub fn with_pad(mut self, pad: PadMode) -> Self {
        self.pad = pad;
        self
    }

    /// Fixes the background lag-1 autocorrelation instead of estimating it.
    pub fn with_lag1(mut self, lag1: f64) -> Self {
        self.lag1 = Some(lag1);
        self
    }

    /// Sets the confidence level for the significance threshold.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Returns the wavelet family and shape parameter.
    pub fn mother(&self) -> Mother {
        self.mother
    }

    /// Returns the octave spacing, if explicitly set.
    pub fn dj(&self) -> Option<f64> {
        self.dj
    }

    /// Returns the explicit period range, if set.
    pub fn period_range(&self) -> Option<(f64, f64)> {
        self.period_range
    }

    /// Returns the explicit frequency range, if set.
    pub fn frequency_range(&self) -> Option<(f64, f64)> {
        self.frequency_range
    }

    /// Returns the zero-padding policy.
    pub fn pad(&self) -> PadMode {
        self.pad
    }

    /// Returns the fixed lag-1 autocorrelation, if set.
    pub fn lag1(&self) -> Option<f64> {
        self.lag1
    }

    /// Returns the confidence level.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}

impl Default for MultiCwtConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Stacked transform of up to [`MAX_COMPONENTS`] signal components sharing
/// one scale axis.
///
/// Coefficients carry a `sqrt(2 dt)` factor so squared magnitudes are
/// spectral densities; the significance thresholds carry the matching
/// `2 dt`.
#[derive(Clone, Debug)]
pub struct MultiCwt {
    /// Coefficients `[n_components][n_scales][n_times]`.
    coefficients: Vec<Vec<Vec<Complex<f64>>>>,
    /// Shared scale axis.
    scales: Vec<f64>,
    /// Shared Fourier-equivalent periods.
    periods: Vec<f64>,
    /// Shared frequency axis, `1 / period`.
    frequencies: Vec<f64>,
    /// Cone of influence per time point.
    coi: Vec<f64>,
    /// Significance threshold per component and scale.
    significance: Vec<Vec<f64>>,
    /// Lag-1 autocorrelation used per component.
    lag1s: Vec<f64>,
    /// Time step.
    dt: f64,
    /// Octave spacing used.
    dj: f64,
}

impl MultiCwt {
    /// Creates a new `MultiCwt` (crate-internal constructor).
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        coefficients: Vec<Vec<Vec<Complex<f64>>>>,
        scales: Vec<f64>,
        periods: Vec<f64>,
        frequencies: Vec<f64>,
        coi: Vec<f64>,
        significance: Vec<Vec<f64>>,
        lag1s: Vec<f64>,
        dt: f64,
        dj: f64,
    ) -> Self {
        Self {
            coefficients,
            scales,
            periods,
            frequencies,
            coi,
            significance,
            lag1s,
            dt,
            dj,
        }
    }

    /// Returns the coefficients `[n_components][n_scales][n_times]`.
    pub fn coefficients(&self) -> &[Vec<Vec<Complex<f64>>>] {
        &self.coefficients
    }

    /// Returns one component's coefficient matrix `[n_scales][n_times]`.
    pub fn component(&self, index: usize) -> Option<&[Vec<Complex<f64>>]> {
        self.coefficients.get(index).map(Vec::as_slice)
    }

    /// Returns the shared scale axis.
    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    /// Returns the shared period axis.
    pub fn periods(&self) -> &[f64] {
        &self.periods
    }

    /// Returns the shared frequency axis.
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Returns the cone of influence per time point.
    pub fn coi(&self) -> &[f64] {
        &self.coi
    }

    /// Returns the significance thresholds `[n_components][n_scales]`.
    pub fn significance(&self) -> &[Vec<f64>] {
        &self.significance
    }

    /// Returns the lag-1 autocorrelation used per component.
    pub fn lag1s(&self) -> &[f64] {
        &self.lag1s
    }

    /// Returns the time step.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Returns the octave spacing used.
    pub fn dj(&self) -> f64 {
        self.dj
    }

    /// Returns the number of components.
    pub fn n_components(&self) -> usize {
        self.coefficients.len()
    }

    /// Returns the number of scales.
    pub fn n_scales(&self) -> usize {
        self.scales.len()
    }

    /// Returns the number of time points.
    pub fn n_times(&self) -> usize {
        self.coi.len()
    }

    /// Computes one component's power spectrum `|W(s,t)|^2`.
    pub fn power(&self, component: usize) -> Option<Vec<Vec<f64>>> {
        self.coefficients.get(component).map(|matrix| {
            matrix
                .iter()
                .map(|row| row.iter().map(|c| c.norm_sqr()).collect())
                .collect()
        })
    }
}

/// Outcome of a multi-component transform.
///
/// A series whose data-driven default period range collapses below one
/// scale is not an error; it is reported as [`MultiCwtOutcome::IntervalTooShort`]
/// so callers can skip the interval and move on.
#[derive(Clone, Debug)]
pub enum MultiCwtOutcome {
    /// The transform succeeded.
    Ready(MultiCwt),
    /// The interval cannot support even one scale in the default range.
    IntervalTooShort {
        /// Number of samples in the interval.
        n_samples: usize,
        /// Interval duration in seconds.
        duration: f64,
    },
}

impl MultiCwtOutcome {
    /// Returns `true` when the transform succeeded.
    pub fn is_ready(&self) -> bool {
        matches!(self, MultiCwtOutcome::Ready(_))
    }

    /// Consumes the outcome, returning the transform if it succeeded.
    pub fn into_ready(self) -> Option<MultiCwt> {
        match self {
            MultiCwtOutcome::Ready(result) => Some(result),
            MultiCwtOutcome::IntervalTooShort { .. } => None,
        }
    }
}

/// Transforms up to [`MAX_COMPONENTS`] signal components on one shared
/// scale axis.
///
/// The octave spacing defaults to the mother's bandwidth and the period
/// range to `[2 dt, 5%]` of the series duration. When that data-driven
/// range collapses below one scale the function returns the
/// [`MultiCwtOutcome::IntervalTooShort`] sentinel; an explicitly requested
/// range never does, it fails validation instead.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`WaveletError::NoComponents`] | `components` is empty |
/// | [`WaveletError::TooManyComponents`] | more than [`MAX_COMPONENTS`] components |
/// | [`WaveletError::ComponentMismatch`] | components differ in length |
/// | [`WaveletError::InvalidConfig`] | non-positive `dt`, both ranges set, or a degenerate explicit range |
/// | [`WaveletError::SeriesTooShort`] | explicit range on a series under 2 samples |
/// | [`WaveletError::NonFiniteData`] | a component contains NaN or infinite samples |
/// | [`WaveletError::InvalidParameter`] | mother shape parameter is non-finite or non-positive |
pub fn multi_cwt(
    engine: &mut CwtEngine,
    components: &[Vec<f64>],
    dt: f64,
    config: &MultiCwtConfig,
) -> Result<MultiCwtOutcome, WaveletError> {
    // 1. Validate the component stack
    if components.is_empty() {
        return Err(WaveletError::NoComponents);
    }
    if components.len() > MAX_COMPONENTS {
        return Err(WaveletError::TooManyComponents {
            got: components.len(),
            max: MAX_COMPONENTS,
        });
    }
    let n = components[0].len();
    for (index, component) in components.iter().enumerate().skip(1) {
        if component.len() != n {
            return Err(WaveletError::ComponentMismatch {
                index,
                len: component.len(),
                expected: n,
            });
        }
    }
    if dt <= 0.0 {
        return Err(WaveletError::InvalidConfig("dt must be > 0".to_string()));
    }
    config.mother().validate()?;

    // 2. Octave spacing from the mother's bandwidth unless overridden
    let mother = config.mother();
    let dj = config.dj().unwrap_or_else(|| mother.default_dj());
    if dj <= 0.0 {
        return Err(WaveletError::InvalidConfig("dj must be > 0".to_string()));
    }

    // 3. Period range: explicit, converted from frequencies, or data-driven
    let duration = n as f64 * dt;
    let explicit = resolve_period_range(config)?;
    let (period_min, period_max, data_driven) = match explicit {
        Some((min, max)) => (min, max, false),
        None => (2.0 * dt, 0.05 * duration, true),
    };

    // 4. Scale range and count; a collapsed data-driven range is a sentinel
    let fourier_factor = mother.fourier_factor();
    let s0 = period_min / fourier_factor;
    let s_max = period_max / fourier_factor;
    let octaves = (s_max / s0).log2() / dj;
    if octaves < 0.0 {
        if data_driven {
            debug!(n, duration, "interval too short for wavelet analysis");
            return Ok(MultiCwtOutcome::IntervalTooShort {
                n_samples: n,
                duration,
            });
        }
        return Err(WaveletError::InvalidConfig(
            "period range spans less than one scale".to_string(),
        ));
    }
    let n_scales = octaves.floor() as usize + 1;

    // 5. Transform every component on the shared axis
    let density_norm = (2.0 * dt).sqrt();
    let mut coefficients = Vec::with_capacity(components.len());
    let mut significance = Vec::with_capacity(components.len());
    let mut lag1s = Vec::with_capacity(components.len());
    let mut shared: Option<(Vec<f64>, Vec<f64>, Vec<f64>)> = None;

    for component in components {
        let lag1 = config
            .lag1()
            .unwrap_or_else(|| aeolus_stats::lag1_autocorrelation(component));
        let cwt_config = CwtConfig::new()
            .with_mother(mother)
            .with_dt(dt)
            .with_dj(dj)
            .with_s0(s0)
            .with_n_scales(n_scales)
            .with_pad(config.pad())
            .with_lag1(lag1)
            .with_confidence(config.confidence());
        let result = engine.transform(component, &cwt_config)?;

        let matrix: Vec<Vec<Complex<f64>>> = result
            .coefficients()
            .iter()
            .map(|row| row.iter().map(|&c| c * density_norm).collect())
            .collect();
        let thresholds: Vec<f64> = result
            .significance()
            .iter()
            .map(|&s| s * 2.0 * dt)
            .collect();

        if shared.is_none() {
            shared = Some((
                result.scales().to_vec(),
                result.periods().to_vec(),
                result.coi().to_vec(),
            ));
        }
        coefficients.push(matrix);
        significance.push(thresholds);
        lag1s.push(lag1);
    }

    // First component always populates the shared axes.
    let (scales, periods, coi) = match shared {
        Some(axes) => axes,
        None => return Err(WaveletError::NoComponents),
    };
    let frequencies: Vec<f64> = periods.iter().map(|&p| 1.0 / p).collect();

    Ok(MultiCwtOutcome::Ready(MultiCwt::new(
        coefficients,
        scales,
        periods,
        frequencies,
        coi,
        significance,
        lag1s,
        dt,
        dj,
    )))
}

/// Resolves the explicit period range from the config, converting a
/// frequency range when that is what the caller supplied.
fn resolve_period_range(config: &MultiCwtConfig) -> Result<Option<(f64, f64)>, WaveletError> {
    match (config.period_range(), config.frequency_range()) {
        (Some(_), Some(_)) => Err(WaveletError::InvalidConfig(
            "set either a period range or a frequency range, not both".to_string(),
        )),
        (Some((min, max)), None) => {
            if !(min.is_finite() && max.is_finite()) || min <= 0.0 || min >= max {
                return Err(WaveletError::InvalidConfig(format!(
                    "invalid period range [{min}, {max}]"
                )));
            }
            Ok(Some((min, max)))
        }
        (None, Some((min, max))) => {
            if !(min.is_finite() && max.is_finite()) || min <= 0.0 || min >= max {
                return Err(WaveletError::InvalidConfig(format!(
                    "invalid frequency range [{min}, {max}]"
                )));
            }
            Ok(Some((1.0 / max, 1.0 / min)))
        }
        (None, None) => Ok(None),
    }
}
