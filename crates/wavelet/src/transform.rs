//! Core continuous wavelet transform engine.
//!
//! Computes the time-scale decomposition via FFT-based convolution,
//! following Torrence & Compo (1998): one forward transform of the padded
//! series, then a spectral multiply and inverse transform per scale.
//! Significance thresholds test wavelet power against a lag-1 autoregressive
//! background using the chi-squared method.

use num_complex::Complex;
use rayon::prelude::*;
use rustfft::FftPlanner;
use statrs::distribution::{ChiSquared, ContinuousCDF};
use std::collections::HashMap;
use std::f64::consts::PI;
use tracing::debug;

use crate::error::WaveletError;
use crate::mother::{Mother, MotherConstants};

/// Zero-padding policy applied before the forward FFT.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PadMode {
    /// No padding; the FFT runs on the raw series length.
    None,
    /// Pad with zeroes up to the power of two above the nearest-power base.
    #[default]
    NextPow2,
    /// Pad to the nearest-power base itself, never below the series length.
    Pow2,
}

impl PadMode {
    /// Returns the FFT length for a series of `n` samples.
    pub fn padded_len(&self, n: usize) -> usize {
        match self {
            PadMode::None => n,
            PadMode::NextPow2 => 1 << (base_two(n) + 1),
            PadMode::Pow2 => (1 << base_two(n)).max(n),
        }
    }
}

/// Power-of-two base nearest to `n`: `floor(log2(n) + 0.4999)`.
fn base_two(n: usize) -> u32 {
    ((n as f64).log2() + 0.4999).floor() as u32
}

/// Configuration for the core wavelet transform.
///
/// Use the builder methods to customize the analysis parameters.
///
/// # Example
///
/// ```ignore
/// use aeolus_wavelet::{CwtConfig, Mother};
///
/// let config = CwtConfig::new()
///     .with_mother(Mother::paul())
///     .with_dt(0.5)
///     .with_dj(0.125);
/// ```
#[derive(Clone, Debug)]
pub struct CwtConfig {
    /// Wavelet family and shape parameter.
    mother: Mother,
    /// Time step between observations.
    dt: f64,
    /// Fractional octave spacing.
    dj: f64,
    /// Smallest scale (None = auto = 2*dt).
    s0: Option<f64>,
    /// Number of scales (None = auto-computed from the series length).
    n_scales: Option<usize>,
    /// Zero-padding policy.
    pad: PadMode,
    /// Lag-1 autocorrelation of the background noise model.
    lag1: f64,
    /// Confidence level for the significance threshold.
    confidence: f64,
    /// Whether to also return centered time-domain daughter wavelets.
    daughters: bool,
    /// Whether to reconstruct the series from the coefficients.
    reconstruct: bool,
}

impl CwtConfig {
    /// Creates a new `CwtConfig` with default parameters.
    ///
    /// Defaults: Morlet wavelet with wavenumber 6, `dt = 1.0`, `dj = 0.25`,
    /// `s0 = None` (auto), `n_scales = None` (auto), `pad = NextPow2`,
    /// `lag1 = 0.0` (white background), `confidence = 0.95`, no daughters,
    /// no reconstruction.
    pub fn new() -> Self {
        Self {
            mother: Mother::morlet(),
            dt: 1.0,
            dj: 0.25,
            s0: None,
            n_scales: None,
            pad: PadMode::NextPow2,
            lag1: 0.0,
            confidence: 0.95,
            daughters: false,
            reconstruct: false,
        }
    }

    /// Sets the wavelet family and shape parameter.
    pub fn with_mother(mut self, mother: Mother) -> Self {
        self.mother = mother;
        self
    }

    /// Sets the time step between observations.
    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    /// Sets the fractional octave spacing.
    pub fn with_dj(mut self, dj: f64) -> Self {
        self.dj = dj;
        self
    }

    /// Sets the smallest scale.
    pub fn with_s0(mut self, s0: f64) -> Self {
        self.s0 = Some(s0);
        self
    }

    /// Sets the number of scales.
    pub fn with_n_scales(mut self, n_scales: usize) -> Self {
        self.n_scales = Some(n_scales);
        self
    }

    /// Sets the zero-padding policy.
    pub fn with_pad(mut self, pad: PadMode) -> Self {
        self.pad = pad;
        self
    }

    /// Sets the lag-1 autocorrelation of the background noise model.
    pub fn with_lag1(mut self, lag1: f64) -> Self {
        self.lag1 = lag1;
        self
    }

    /// Sets the confidence level for the significance threshold.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Sets whether centered time-domain daughters are returned.
    pub fn with_daughters(mut self, daughters: bool) -> Self {
        self.daughters = daughters;
        self
    }

    /// Sets whether the series is reconstructed from the coefficients.
    pub fn with_reconstruct(mut self, reconstruct: bool) -> Self {
        self.reconstruct = reconstruct;
        self
    }

    /// Returns the wavelet family and shape parameter.
    pub fn mother(&self) -> Mother {
        self.mother
    }

    /// Returns the time step.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Returns the fractional octave spacing.
    pub fn dj(&self) -> f64 {
        self.dj
    }

    /// Returns the smallest scale, if explicitly set.
    pub fn s0(&self) -> Option<f64> {
        self.s0
    }

    /// Returns the number of scales, if explicitly set.
    pub fn n_scales(&self) -> Option<usize> {
        self.n_scales
    }

    /// Returns the zero-padding policy.
    pub fn pad(&self) -> PadMode {
        self.pad
    }

    /// Returns the background lag-1 autocorrelation.
    pub fn lag1(&self) -> f64 {
        self.lag1
    }

    /// Returns the confidence level.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Returns whether centered daughters are requested.
    pub fn daughters(&self) -> bool {
        self.daughters
    }

    /// Returns whether reconstruction is requested.
    pub fn reconstruct(&self) -> bool {
        self.reconstruct
    }
}

impl Default for CwtConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a continuous wavelet transform.
///
/// Coefficients are in the units of the demeaned input series; power is
/// `|W|^2` in squared input units. The background spectrum is the
/// unit-variance theoretical noise spectrum, while the significance array
/// already carries the variance and chi-squared factors.
#[derive(Clone, Debug)]
pub struct CwtResult {
    /// Complex wavelet coefficients `[n_scales][n_times]`.
    coefficients: Vec<Vec<Complex<f64>>>,
    /// Scale values.
    scales: Vec<f64>,
    /// Fourier-equivalent periods.
    periods: Vec<f64>,
    /// Cone of influence per time point.
    coi: Vec<f64>,
    /// Significance threshold per scale.
    significance: Vec<f64>,
    /// Unit-variance theoretical background spectrum per scale.
    background: Vec<f64>,
    /// Centered time-domain daughters `[n_scales][n_times]`, if requested.
    daughters: Option<Vec<Vec<Complex<f64>>>>,
    /// Reconstructed series, if requested.
    reconstruction: Option<Vec<f64>>,
    /// Time step used.
    dt: f64,
    /// Scale spacing used.
    dj: f64,
    /// Original signal mean.
    signal_mean: f64,
    /// Original signal sample variance (N-1 denominator).
    signal_variance: f64,
}

impl CwtResult {
    /// Creates a new `CwtResult` (crate-internal constructor).
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        coefficients: Vec<Vec<Complex<f64>>>,
        scales: Vec<f64>,
        periods: Vec<f64>,
        coi: Vec<f64>,
        significance: Vec<f64>,
        background: Vec<f64>,
        daughters: Option<Vec<Vec<Complex<f64>>>>,
        reconstruction: Option<Vec<f64>>,
        dt: f64,
        dj: f64,
        signal_mean: f64,
        signal_variance: f64,
    ) -> Self {
        Self {
            coefficients,
            scales,
            periods,
            coi,
            significance,
            background,
            daughters,
            reconstruction,
            dt,
            dj,
            signal_mean,
            signal_variance,
        }
    }

    /// Returns the complex wavelet coefficients `[n_scales][n_times]`.
    pub fn coefficients(&self) -> &[Vec<Complex<f64>>] {
        &self.coefficients
    }

    /// Returns the scale values.
    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    /// Returns the Fourier-equivalent periods.
    pub fn periods(&self) -> &[f64] {
        &self.periods
    }

    /// Returns the cone of influence per time point.
    pub fn coi(&self) -> &[f64] {
        &self.coi
    }

    /// Returns the significance threshold per scale.
    pub fn significance(&self) -> &[f64] {
        &self.significance
    }

    /// Returns the unit-variance theoretical background spectrum per scale.
    pub fn background(&self) -> &[f64] {
        &self.background
    }

    /// Returns the centered time-domain daughters, if requested.
    pub fn daughters(&self) -> Option<&[Vec<Complex<f64>>]> {
        self.daughters.as_deref()
    }

    /// Returns the reconstructed series, if requested.
    pub fn reconstruction(&self) -> Option<&[f64]> {
        self.reconstruction.as_deref()
    }

    /// Returns the time step used.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Returns the scale spacing used.
    pub fn dj(&self) -> f64 {
        self.dj
    }

    /// Returns the original signal mean.
    pub fn signal_mean(&self) -> f64 {
        self.signal_mean
    }

    /// Returns the original signal sample variance (N-1 denominator).
    pub fn signal_variance(&self) -> f64 {
        self.signal_variance
    }

    /// Returns the number of scales.
    pub fn n_scales(&self) -> usize {
        self.scales.len()
    }

    /// Returns the number of time points.
    pub fn n_times(&self) -> usize {
        self.coi.len()
    }

    /// Computes the wavelet power spectrum `|W(s,t)|^2`.
    ///
    /// Returns a `[n_scales][n_times]` matrix of power values.
    pub fn power(&self) -> Vec<Vec<f64>> {
        self.coefficients
            .iter()
            .map(|row| row.iter().map(|c| c.norm_sqr()).collect())
            .collect()
    }

    /// Computes the global wavelet spectrum.
    ///
    /// For each scale, returns the time-averaged power
    /// `(1/N) * sum_t |W(s,t)|^2`.
    pub fn global_wavelet_spectrum(&self) -> Vec<f64> {
        let n = self.n_times() as f64;
        self.coefficients
            .iter()
            .map(|row| {
                let sum: f64 = row.iter().map(|c| c.norm_sqr()).sum();
                sum / n
            })
            .collect()
    }
}

/// FFT-convolution transform engine.
///
/// Owns the FFT planner, so repeated transforms at equal padded lengths
/// reuse cached plans, and memoizes [`MotherConstants`] per
/// `(family, parameter)` pair.
pub struct CwtEngine {
    planner: FftPlanner<f64>,
    constants: HashMap<(u8, u64), MotherConstants>,
}

impl CwtEngine {
    /// Creates a new engine with an empty plan and constant cache.
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
            constants: HashMap::new(),
        }
    }

    /// Returns the memoized constants for `mother`, computing them on first use.
    pub fn constants_for(&mut self, mother: &Mother) -> MotherConstants {
        *self
            .constants
            .entry(mother.cache_key())
            .or_insert_with(|| mother.constants())
    }

    /// Returns the number of distinct mother wavelets evaluated so far.
    pub fn cached_mothers(&self) -> usize {
        self.constants.len()
    }

    /// Computes the continuous wavelet transform of a real series.
    ///
    /// The series is demeaned internally; the reported coefficients,
    /// significance and reconstruction all refer to the demeaned data plus
    /// the stored mean.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`WaveletError::InvalidParameter`] | mother shape parameter is non-finite or non-positive |
    /// | [`WaveletError::InvalidConfig`] | non-positive `dt`, `dj` or `s0`, zero scale count, `confidence` outside (0, 1), `lag1` outside (-1, 1) |
    /// | [`WaveletError::SeriesTooShort`] | series has fewer than 2 observations |
    /// | [`WaveletError::NonFiniteData`] | series contains NaN or infinite samples |
    /// | [`WaveletError::ReconstructionUndefined`] | reconstruction requested for a mother without a tabulated constant |
    pub fn transform(&mut self, data: &[f64], config: &CwtConfig) -> Result<CwtResult, WaveletError> {
        // 1. Validate config and input
        validate_config(config)?;
        let n = data.len();
        if n < 2 {
            return Err(WaveletError::SeriesTooShort { len: n, min: 2 });
        }
        if data.iter().any(|x| !x.is_finite()) {
            return Err(WaveletError::NonFiniteData);
        }

        let dt = config.dt();
        let mother = config.mother();
        let constants = self.constants_for(&mother);

        // 2. Demean; keep sample variance for the significance scaling
        let mean = aeolus_stats::mean(data);
        let variance = aeolus_stats::variance(data);
        let signal: Vec<f64> = data.iter().map(|&x| x - mean).collect();

        // 3. Zero-pad and forward-transform once. rustfft is unnormalized, so
        //    the conventional 1/N factor is folded into the forward side.
        let npad = config.pad().padded_len(n);
        let mut padded: Vec<Complex<f64>> = signal
            .iter()
            .map(|&x| Complex::new(x, 0.0))
            .chain(std::iter::repeat_n(Complex::new(0.0, 0.0), npad - n))
            .collect();
        let fft_forward = self.planner.plan_fft_forward(npad);
        let fft_inverse = self.planner.plan_fft_inverse(npad);
        fft_forward.process(&mut padded);
        let inv_npad = 1.0 / npad as f64;
        for c in padded.iter_mut() {
            *c *= inv_npad;
        }
        let signal_fft = padded;

        // 4. Scale and wavenumber axes
        let s0 = config.s0().unwrap_or(2.0 * dt);
        let scales = build_scales(n, dt, s0, config.dj(), config.n_scales());
        let k = build_wavenumbers(npad, dt);

        debug!(
            n,
            npad,
            n_scales = scales.len(),
            mother = %mother,
            "wavelet transform"
        );

        // 5. Per-scale convolution
        let want_daughters = config.daughters();
        let rows: Vec<(Vec<Complex<f64>>, f64, Option<Vec<Complex<f64>>>)> = scales
            .par_iter()
            .map(|&scale| {
                let daughter = mother.evaluate(scale, &k, dt);
                let period = daughter.period();
                let mut spectrum = daughter.into_spectrum();

                let mut product: Vec<Complex<f64>> = signal_fft
                    .iter()
                    .zip(spectrum.iter())
                    .map(|(&s, &d)| s * d)
                    .collect();
                fft_inverse.process(&mut product);
                product.truncate(n);

                // Inverse-transform the daughter alone and circularly shift
                // its peak to the window center.
                let centered = if want_daughters {
                    fft_inverse.process(&mut spectrum);
                    for c in spectrum.iter_mut() {
                        *c *= inv_npad;
                    }
                    spectrum.rotate_right(npad / 2);
                    let start = npad / 2 - n / 2;
                    Some(spectrum[start..start + n].to_vec())
                } else {
                    None
                };

                (product, period, centered)
            })
            .collect();

        let mut coefficients = Vec::with_capacity(rows.len());
        let mut periods = Vec::with_capacity(rows.len());
        let mut daughters = want_daughters.then(|| Vec::with_capacity(rows.len()));
        for (row, period, centered) in rows {
            coefficients.push(row);
            periods.push(period);
            if let (Some(list), Some(d)) = (daughters.as_mut(), centered) {
                list.push(d);
            }
        }

        // 6. Cone of influence
        let coi = compute_coi(n, dt, constants.coi_factor);

        // 7. Background spectrum and significance threshold
        let background = ar1_background(config.lag1(), dt, &periods);
        let significance = significance_thresholds(
            &background,
            variance,
            constants.dof_min,
            config.confidence(),
        )?;

        // 8. Optional reconstruction
        let reconstruction = if config.reconstruct() {
            let (cdelta, psi0) = match constants.cdelta {
                Some(cdelta) => (cdelta, constants.psi0),
                None => {
                    return Err(WaveletError::ReconstructionUndefined {
                        mother: mother.to_string(),
                    });
                }
            };
            Some(reconstruct_series(
                &coefficients,
                &scales,
                config.dj(),
                dt,
                cdelta,
                psi0,
                mean,
            ))
        } else {
            None
        };

        Ok(CwtResult::new(
            coefficients,
            scales,
            periods,
            coi,
            significance,
            background,
            daughters,
            reconstruction,
            dt,
            config.dj(),
            mean,
            variance,
        ))
    }
}

impl Default for CwtEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates the transform configuration parameters.
fn validate_config(config: &CwtConfig) -> Result<(), WaveletError> {
    config.mother().validate()?;
    if config.dt() <= 0.0 {
        return Err(WaveletError::InvalidConfig("dt must be > 0".to_string()));
    }
    if config.dj() <= 0.0 {
        return Err(WaveletError::InvalidConfig("dj must be > 0".to_string()));
    }
    if let Some(s0) = config.s0()
        && s0 <= 0.0
    {
        return Err(WaveletError::InvalidConfig("s0 must be > 0".to_string()));
    }
    if config.n_scales() == Some(0) {
        return Err(WaveletError::InvalidConfig(
            "scale count must be at least 1".to_string(),
        ));
    }
    let confidence = config.confidence();
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(WaveletError::InvalidConfig(
            "confidence must be in (0, 1)".to_string(),
        ));
    }
    // |lag1| < 1 keeps the AR(1) background stationary; negative values are
    // blue noise.
    let lag1 = config.lag1();
    if !(lag1 > -1.0 && lag1 < 1.0) {
        return Err(WaveletError::InvalidConfig(
            "lag1 must be in (-1, 1)".to_string(),
        ));
    }
    Ok(())
}

/// Builds the geometric scale array.
///
/// Scales follow `s0 * 2^(j * dj)`. With `n_scales = None` the count is
/// `floor(log2(n*dt/s0) / dj) + 1`, covering the series duration.
pub(crate) fn build_scales(n: usize, dt: f64, s0: f64, dj: f64, n_scales: Option<usize>) -> Vec<f64> {
    let count = match n_scales {
        Some(count) => count,
        None => {
            let j_max = ((n as f64 * dt / s0).log2() / dj).floor();
            if j_max.is_sign_positive() && j_max.is_finite() {
                j_max as usize + 1
            } else {
                1
            }
        }
    };
    (0..count)
        .map(|j| s0 * 2.0_f64.powf(j as f64 * dj))
        .collect()
}

/// Builds the angular wavenumber array for the FFT grid.
///
/// Index 0 is the zero frequency, followed by positive frequencies up to
/// `npad/2`, then the mirrored negative frequencies.
pub(crate) fn build_wavenumbers(npad: usize, dt: f64) -> Vec<f64> {
    let df = 2.0 * PI / (npad as f64 * dt);
    (0..npad)
        .map(|i| {
            if i == 0 {
                0.0
            } else if i <= npad / 2 {
                i as f64 * df
            } else {
                -((npad - i) as f64) * df
            }
        })
        .collect()
}

/// Computes the cone of influence for each time point.
fn compute_coi(n: usize, dt: f64, coi_factor: f64) -> Vec<f64> {
    (0..n)
        .map(|t| {
            let dist = t.min(n - 1 - t) as f64;
            f64::max(coi_factor * dt * dist, 0.0)
        })
        .collect()
}

/// Lag-1 autoregressive background spectrum (Torrence & Compo eq. 16),
/// normalized to unit variance.
fn ar1_background(lag1: f64, dt: f64, periods: &[f64]) -> Vec<f64> {
    periods
        .iter()
        .map(|&period| {
            let cos_term = (2.0 * PI * dt / period).cos();
            (1.0 - lag1 * lag1) / (1.0 - 2.0 * lag1 * cos_term + lag1 * lag1)
        })
        .collect()
}

/// Converts the background spectrum into per-scale significance thresholds
/// at the requested confidence level.
fn significance_thresholds(
    background: &[f64],
    variance: f64,
    dof_min: u32,
    confidence: f64,
) -> Result<Vec<f64>, WaveletError> {
    let dof = f64::from(dof_min);
    let chisq = ChiSquared::new(dof)
        .map_err(|e| WaveletError::InvalidConfig(format!("chi-squared with {dof_min} dof: {e}")))?;
    let quantile = chisq.inverse_cdf(confidence) / dof;
    Ok(background.iter().map(|&b| b * variance * quantile).collect())
}

/// Reconstructs the series from the coefficients (Torrence & Compo eq. 11)
/// and restores the stored mean.
fn reconstruct_series(
    coefficients: &[Vec<Complex<f64>>],
    scales: &[f64],
    dj: f64,
    dt: f64,
    cdelta: f64,
    psi0: f64,
    mean: f64,
) -> Vec<f64> {
    let factor = dj * dt.sqrt() / (cdelta * psi0);
    let n = coefficients.first().map_or(0, Vec::len);
    (0..n)
        .map(|t| {
            let sum: f64 = coefficients
                .iter()
                .zip(scales.iter())
                .map(|(row, &scale)| row[t].re / scale.sqrt())
                .sum();
            mean + factor * sum
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sine(n: usize, period: f64) -> Vec<f64> {
        (0..n).map(|i| (2.0 * PI * i as f64 / period).sin()).collect()
    }

    #[test]
    fn config_defaults() {
        let config = CwtConfig::new();
        assert_eq!(config.mother(), Mother::morlet());
        assert_relative_eq!(config.dt(), 1.0);
        assert_relative_eq!(config.dj(), 0.25);
        assert!(config.s0().is_none());
        assert!(config.n_scales().is_none());
        assert_eq!(config.pad(), PadMode::NextPow2);
        assert_relative_eq!(config.lag1(), 0.0);
        assert_relative_eq!(config.confidence(), 0.95);
        assert!(!config.daughters());
        assert!(!config.reconstruct());
    }

    #[test]
    fn config_builder() {
        let config = CwtConfig::new()
            .with_mother(Mother::dog())
            .with_dt(0.5)
            .with_dj(0.125)
            .with_s0(1.0)
            .with_n_scales(10)
            .with_pad(PadMode::None)
            .with_lag1(0.72)
            .with_confidence(0.99)
            .with_daughters(true)
            .with_reconstruct(true);

        assert_eq!(config.mother(), Mother::dog());
        assert_relative_eq!(config.dt(), 0.5);
        assert_relative_eq!(config.dj(), 0.125);
        assert_relative_eq!(config.s0().unwrap(), 1.0);
        assert_eq!(config.n_scales(), Some(10));
        assert_eq!(config.pad(), PadMode::None);
        assert_relative_eq!(config.lag1(), 0.72);
        assert_relative_eq!(config.confidence(), 0.99);
        assert!(config.daughters());
        assert!(config.reconstruct());
    }

    #[test]
    fn config_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<CwtConfig>();
        assert_impl::<CwtResult>();
        assert_impl::<CwtEngine>();
    }

    #[test]
    fn pad_mode_lengths() {
        assert_eq!(PadMode::None.padded_len(1000), 1000);
        assert_eq!(PadMode::NextPow2.padded_len(1000), 2048);
        assert_eq!(PadMode::Pow2.padded_len(1000), 1024);
        // From exactly a power of two the next mode still grows.
        assert_eq!(PadMode::NextPow2.padded_len(1024), 2048);
        assert_eq!(PadMode::Pow2.padded_len(1024), 1024);
        // Just below a power of two rounds up to the nearest base.
        assert_eq!(PadMode::Pow2.padded_len(1500), 2048);
        // The base clamp never shrinks the series.
        assert_eq!(PadMode::Pow2.padded_len(5), 5);
    }

    #[test]
    fn invalid_config_rejected() {
        let data = sine(64, 8.0);
        let mut engine = CwtEngine::new();
        for config in [
            CwtConfig::new().with_dt(0.0),
            CwtConfig::new().with_dj(-0.1),
            CwtConfig::new().with_s0(-2.0),
            CwtConfig::new().with_n_scales(0),
            CwtConfig::new().with_confidence(1.0),
            CwtConfig::new().with_confidence(f64::NAN),
            CwtConfig::new().with_lag1(1.0),
            CwtConfig::new().with_lag1(-1.0),
            CwtConfig::new().with_lag1(f64::NAN),
        ] {
            let err = engine.transform(&data, &config).unwrap_err();
            assert!(matches!(err, WaveletError::InvalidConfig(_)), "{config:?}");
        }
    }

    #[test]
    fn invalid_mother_parameter_rejected() {
        let data = sine(64, 8.0);
        let mut engine = CwtEngine::new();
        let config = CwtConfig::new().with_mother(Mother::Paul { order: -1.0 });
        let err = engine.transform(&data, &config).unwrap_err();
        assert!(matches!(err, WaveletError::InvalidParameter { .. }));
    }

    #[test]
    fn series_too_short() {
        let mut engine = CwtEngine::new();
        let err = engine.transform(&[1.0], &CwtConfig::new()).unwrap_err();
        assert!(matches!(err, WaveletError::SeriesTooShort { len: 1, min: 2 }));
    }

    #[test]
    fn two_samples_are_enough() {
        let mut engine = CwtEngine::new();
        let result = engine.transform(&[1.0, -1.0], &CwtConfig::new()).unwrap();
        assert_eq!(result.n_times(), 2);
        assert_eq!(result.n_scales(), 1);
        assert_eq!(result.coefficients()[0].len(), 2);
        assert_eq!(result.coi().len(), 2);
    }

    #[test]
    fn non_finite_data_rejected() {
        let mut engine = CwtEngine::new();
        let mut data = sine(64, 8.0);
        data[10] = f64::NAN;
        let err = engine.transform(&data, &CwtConfig::new()).unwrap_err();
        assert!(matches!(err, WaveletError::NonFiniteData));
    }

    #[test]
    fn build_scales_geometric() {
        let s0 = 2.0;
        let dj = 0.25;
        let scales = build_scales(128, 1.0, s0, dj, Some(9));
        assert_eq!(scales.len(), 9);
        for (j, &scale) in scales.iter().enumerate() {
            let expected = s0 * 2.0_f64.powf(j as f64 * dj);
            assert_relative_eq!(scale, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn build_scales_auto_count_spans_duration() {
        let scales = build_scales(1024, 1.0, 2.0, 0.25, None);
        // floor(log2(1024/2) / 0.25) + 1 = floor(36) + 1
        assert_eq!(scales.len(), 37);
        assert!(*scales.last().unwrap() <= 1024.0);
    }

    #[test]
    fn build_scales_degenerate_duration_yields_one() {
        let scales = build_scales(4, 1.0, 100.0, 0.25, None);
        assert_eq!(scales.len(), 1);
        assert_relative_eq!(scales[0], 100.0);
    }

    #[test]
    fn wavenumbers_ordering() {
        let npad = 16;
        let k = build_wavenumbers(npad, 1.0);
        assert_eq!(k.len(), npad);
        assert!(k[0].abs() < f64::EPSILON);
        for (i, &ki) in k.iter().enumerate().take(npad / 2 + 1).skip(1) {
            assert!(ki > 0.0, "k[{i}] = {ki} should be positive");
        }
        for (i, &ki) in k.iter().enumerate().take(npad).skip(npad / 2 + 1) {
            assert!(ki < 0.0, "k[{i}] = {ki} should be negative");
        }
    }

    #[test]
    fn coi_symmetric() {
        let n = 64;
        let coi = compute_coi(n, 1.0, Mother::morlet().coi_factor());
        assert_eq!(coi.len(), n);
        for t in 0..n {
            assert_relative_eq!(coi[t], coi[n - 1 - t], epsilon = 1e-12);
        }
    }

    #[test]
    fn output_dimensions() {
        let n = 100;
        let data = sine(n, 16.0);
        let mut engine = CwtEngine::new();
        let result = engine.transform(&data, &CwtConfig::new()).unwrap();

        assert_eq!(result.n_times(), n);
        assert_eq!(result.coefficients().len(), result.n_scales());
        for row in result.coefficients() {
            assert_eq!(row.len(), n);
        }
        assert_eq!(result.periods().len(), result.n_scales());
        assert_eq!(result.significance().len(), result.n_scales());
        assert_eq!(result.background().len(), result.n_scales());
        assert!(result.daughters().is_none());
        assert!(result.reconstruction().is_none());
    }

    #[test]
    fn periods_monotonic() {
        let data = sine(128, 16.0);
        let mut engine = CwtEngine::new();
        let result = engine.transform(&data, &CwtConfig::new()).unwrap();
        for pair in result.periods().windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn sine_peak_at_known_period() {
        let data = sine(512, 32.0);
        let mut engine = CwtEngine::new();
        let config = CwtConfig::new().with_dj(0.125);
        let result = engine.transform(&data, &config).unwrap();

        let gws = result.global_wavelet_spectrum();
        let (peak_idx, _) = gws
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .unwrap();
        let peak_period = result.periods()[peak_idx];
        let relative_error = ((peak_period - 32.0) / 32.0).abs();
        assert!(
            relative_error < 0.15,
            "peak period {peak_period} is not within 15% of 32"
        );
    }

    #[test]
    fn constant_signal_near_zero_power() {
        let data = vec![42.0; 128];
        let mut engine = CwtEngine::new();
        let result = engine.transform(&data, &CwtConfig::new()).unwrap();
        for row in result.power() {
            for val in row {
                assert!(val < 1e-10, "constant signal should carry no power");
            }
        }
    }

    #[test]
    fn pad_modes_agree_on_peak_scale() {
        let data = sine(300, 16.0);
        let mut engine = CwtEngine::new();
        let mut peaks = Vec::new();
        for pad in [PadMode::None, PadMode::NextPow2, PadMode::Pow2] {
            let config = CwtConfig::new().with_dj(0.125).with_pad(pad);
            let result = engine.transform(&data, &config).unwrap();
            let gws = result.global_wavelet_spectrum();
            let (peak_idx, _) = gws
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
                .unwrap();
            peaks.push(result.periods()[peak_idx]);
        }
        for &peak in &peaks[1..] {
            assert_relative_eq!(peak, peaks[0], max_relative = 0.1);
        }
    }

    #[test]
    fn daughters_centered_and_sized() {
        let n = 200;
        let data = sine(n, 20.0);
        let mut engine = CwtEngine::new();
        let config = CwtConfig::new().with_daughters(true);
        let result = engine.transform(&data, &config).unwrap();

        let daughters = result.daughters().unwrap();
        assert_eq!(daughters.len(), result.n_scales());
        for row in daughters {
            assert_eq!(row.len(), n);
            let (peak_idx, _) = row
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.norm().partial_cmp(&b.norm()).unwrap())
                .unwrap();
            let center = n / 2;
            assert!(
                peak_idx.abs_diff(center) <= 1,
                "daughter peak at {peak_idx}, expected near {center}"
            );
        }
    }

    #[test]
    fn white_background_is_flat() {
        let data = sine(128, 16.0);
        let mut engine = CwtEngine::new();
        let result = engine.transform(&data, &CwtConfig::new()).unwrap();
        for &b in result.background() {
            assert_relative_eq!(b, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn red_background_rises_with_period() {
        let data = sine(256, 16.0);
        let mut engine = CwtEngine::new();
        let config = CwtConfig::new().with_lag1(0.7);
        let result = engine.transform(&data, &config).unwrap();
        let background = result.background();
        assert!(background.last().unwrap() > background.first().unwrap());
    }

    #[test]
    fn blue_background_falls_with_period() {
        // At period = 2*dt the AR(1) spectrum is (1-a^2)/(1+a)^2, exactly 4
        // for a = -0.6; blue noise concentrates at short periods.
        let spot = ar1_background(-0.6, 1.0, &[2.0]);
        assert_relative_eq!(spot[0], 4.0, epsilon = 1e-12);

        let data = sine(256, 16.0);
        let mut engine = CwtEngine::new();
        let config = CwtConfig::new().with_lag1(-0.6);
        let result = engine.transform(&data, &config).unwrap();
        let background = result.background();
        assert!(background.first().unwrap() > background.last().unwrap());
        for (&b, &s) in background.iter().zip(result.significance()) {
            assert!(b.is_finite() && b > 0.0);
            assert!(s.is_finite() && s > 0.0);
        }
    }

    #[test]
    fn significance_grows_with_confidence() {
        let data = sine(256, 16.0);
        let mut engine = CwtEngine::new();
        let low = engine
            .transform(&data, &CwtConfig::new().with_confidence(0.90))
            .unwrap();
        let high = engine
            .transform(&data, &CwtConfig::new().with_confidence(0.99))
            .unwrap();
        for (lo, hi) in low.significance().iter().zip(high.significance()) {
            assert!(hi >= lo, "threshold at 99% should dominate 90%");
        }
    }

    #[test]
    fn significance_scales_with_variance() {
        let base = sine(256, 16.0);
        let scaled: Vec<f64> = base.iter().map(|&x| 10.0 * x).collect();
        let mut engine = CwtEngine::new();
        let config = CwtConfig::new();
        let a = engine.transform(&base, &config).unwrap();
        let b = engine.transform(&scaled, &config).unwrap();
        for (&sa, &sb) in a.significance().iter().zip(b.significance()) {
            assert_relative_eq!(sb, 100.0 * sa, max_relative = 1e-9);
        }
    }

    #[test]
    fn reconstruction_requires_canonical_mother() {
        let data = sine(128, 16.0);
        let mut engine = CwtEngine::new();
        let config = CwtConfig::new()
            .with_mother(Mother::Paul { order: 3.0 })
            .with_reconstruct(true);
        let err = engine.transform(&data, &config).unwrap_err();
        assert!(matches!(err, WaveletError::ReconstructionUndefined { .. }));
    }

    #[test]
    fn reconstruction_recovers_mean() {
        let n = 256;
        let data: Vec<f64> = (0..n)
            .map(|i| 5.0 + (2.0 * PI * i as f64 / 32.0).sin())
            .collect();
        let mut engine = CwtEngine::new();
        let config = CwtConfig::new().with_dj(0.125).with_reconstruct(true);
        let result = engine.transform(&data, &config).unwrap();
        let recon = result.reconstruction().unwrap();
        let recon_mean = aeolus_stats::mean(recon);
        assert_relative_eq!(recon_mean, 5.0, max_relative = 0.05);
    }

    #[test]
    fn reconstruction_rms_error_small() {
        let n = 512;
        let data: Vec<f64> = (0..n)
            .map(|i| {
                let t = i as f64;
                (2.0 * PI * t / 32.0).sin() + 0.5 * (2.0 * PI * t / 80.0).cos()
            })
            .collect();
        let mut engine = CwtEngine::new();
        let config = CwtConfig::new()
            .with_dj(0.125)
            .with_s0(2.0)
            .with_reconstruct(true);
        let result = engine.transform(&data, &config).unwrap();
        let recon = result.reconstruction().unwrap();

        let signal_rms = (data.iter().map(|x| x * x).sum::<f64>() / n as f64).sqrt();
        let err_rms = (data
            .iter()
            .zip(recon)
            .map(|(x, r)| (x - r) * (x - r))
            .sum::<f64>()
            / n as f64)
            .sqrt();
        assert!(
            err_rms < 0.1 * signal_rms,
            "reconstruction RMS error {err_rms} exceeds 10% of signal RMS {signal_rms}"
        );
    }

    #[test]
    fn engine_memoizes_mother_constants() {
        let data = sine(64, 8.0);
        let mut engine = CwtEngine::new();
        assert_eq!(engine.cached_mothers(), 0);
        engine.transform(&data, &CwtConfig::new()).unwrap();
        engine.transform(&data, &CwtConfig::new()).unwrap();
        assert_eq!(engine.cached_mothers(), 1);
        engine
            .transform(&data, &CwtConfig::new().with_mother(Mother::dog()))
            .unwrap();
        assert_eq!(engine.cached_mothers(), 2);
    }

    #[test]
    fn signal_stats_stored() {
        let data: Vec<f64> = (0..64).map(|i| i as f64 * 2.0 + 10.0).collect();
        let mut engine = CwtEngine::new();
        let result = engine.transform(&data, &CwtConfig::new()).unwrap();
        assert_relative_eq!(result.signal_mean(), aeolus_stats::mean(&data), epsilon = 1e-10);
        assert_relative_eq!(
            result.signal_variance(),
            aeolus_stats::variance(&data),
            epsilon = 1e-8
        );
    }
}
