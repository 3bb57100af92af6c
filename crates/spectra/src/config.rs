//! Analysis pipeline configuration.

use aeolus_wavelet::MultiCwtConfig;

use crate::error::SpectraError;
use crate::smoothing::SmoothingKernel;

/// Default cap on the number of samples accepted without an explicit
/// time window.
pub const DEFAULT_MAX_SAMPLES: usize = 1 << 18;

/// Time window selecting the part of a signal to analyze.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimeWindow {
    /// All samples with timestamps in `[start, stop]`.
    Range { start: f64, stop: f64 },
    /// All samples within `half_width` of `center`.
    Around { center: f64, half_width: f64 },
}

impl TimeWindow {
    /// Returns the window as inclusive `(start, stop)` bounds.
    pub(crate) fn bounds(&self) -> (f64, f64) {
        match *self {
            TimeWindow::Range { start, stop } => (start, stop),
            TimeWindow::Around { center, half_width } => {
                (center - half_width, center + half_width)
            }
        }
    }

    fn validate(&self) -> Result<(), SpectraError> {
        let ok = match *self {
            TimeWindow::Range { start, stop } => {
                start.is_finite() && stop.is_finite() && start < stop
            }
            TimeWindow::Around { center, half_width } => {
                center.is_finite() && half_width.is_finite() && half_width > 0.0
            }
        };
        if ok {
            Ok(())
        } else {
            Err(SpectraError::InvalidConfig(format!(
                "time window {self:?} is empty or non-finite"
            )))
        }
    }
}

/// Field-aligned rotation settings.
///
/// `reference` is the fixed direction crossed against the smoothed field
/// to build the perpendicular axes. It must not be the zero vector; when
/// the field happens to align with it, an orthogonal fallback is used.
#[derive(Clone, Copy, Debug)]
pub struct RotationSpec {
    reference: [f64; 3],
}

impl RotationSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fixed reference direction.
    pub fn with_reference(mut self, reference: [f64; 3]) -> Self {
        self.reference = reference;
        self
    }

    pub fn reference(&self) -> [f64; 3] {
        self.reference
    }
}

impl Default for RotationSpec {
    fn default() -> Self {
        Self {
            reference: [1.0, 0.0, 0.0],
        }
    }
}

/// Hermitian eigen-analysis settings.
#[derive(Clone, Copy, Debug, Default)]
pub struct HermitianSpec {
    scale_index: Option<usize>,
}

impl HermitianSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the scale index to analyze. Defaults to the middle of the
    /// scale axis.
    pub fn with_scale_index(mut self, index: usize) -> Self {
        self.scale_index = Some(index);
        self
    }

    pub fn scale_index(&self) -> Option<usize> {
        self.scale_index
    }
}

/// Power normalization policies. The policies are independent and
/// combine multiplicatively; each contributes a weight applied as
/// `sqrt(weight)` on the wavelet coefficients before any power is
/// computed, so derived ratios are unaffected.
#[derive(Clone, Debug, Default)]
pub struct Normalization {
    series: Option<Vec<f64>>,
    fraction_of_mean_square: bool,
    reference_shape: Option<fn(f64) -> f64>,
    frequency_exponent: Option<f64>,
}

impl Normalization {
    pub fn new() -> Self {
        Self::default()
    }

    /// Divides power by this series, smoothed per scale like the other
    /// smoothed quantities. Must match the repaired sample count.
    pub fn with_series(mut self, series: Vec<f64>) -> Self {
        self.series = Some(series);
        self
    }

    /// Divides power by the window's mean squared amplitude, summed over
    /// components.
    pub fn with_fraction_of_mean_square(mut self, enabled: bool) -> Self {
        self.fraction_of_mean_square = enabled;
        self
    }

    /// Divides power by `shape(period)` at each scale, e.g. a Kolmogorov
    /// law `|p| p.powf(5.0 / 3.0)`.
    pub fn with_reference_shape(mut self, shape: fn(f64) -> f64) -> Self {
        self.reference_shape = Some(shape);
        self
    }

    /// Multiplies power by `frequency^exponent` at each scale.
    pub fn with_frequency_exponent(mut self, exponent: f64) -> Self {
        self.frequency_exponent = Some(exponent);
        self
    }

    pub fn series(&self) -> Option<&[f64]> {
        self.series.as_deref()
    }

    pub fn fraction_of_mean_square(&self) -> bool {
        self.fraction_of_mean_square
    }

    pub fn reference_shape(&self) -> Option<fn(f64) -> f64> {
        self.reference_shape
    }

    pub fn frequency_exponent(&self) -> Option<f64> {
        self.frequency_exponent
    }

    /// Returns `true` when no policy is active.
    pub(crate) fn is_identity(&self) -> bool {
        self.series.is_none()
            && !self.fraction_of_mean_square
            && self.reference_shape.is_none()
            && self.frequency_exponent.is_none()
    }
}

/// Configuration for a full named-signal analysis.
///
/// Built with chained `with_*` calls; the default runs a Morlet-6
/// transform over the whole signal with Gaussian smoothing, emitting
/// power and polarization products.
///
/// # Example
///
/// ```ignore
/// use aeolus_spectra::{AnalysisConfig, TimeWindow};
///
/// let config = AnalysisConfig::new()
///     .with_window(TimeWindow::Range { start: 0.0, stop: 3600.0 })
///     .with_coherence(true)
///     .with_reduce_factor(4);
/// ```
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    transform: MultiCwtConfig,
    component: Option<usize>,
    window: Option<TimeWindow>,
    max_samples: usize,
    averaging_periods: f64,
    kernel: SmoothingKernel,
    normalization: Normalization,
    polarization: bool,
    coherence: bool,
    magnitude: bool,
    rotation: Option<RotationSpec>,
    hermitian: Option<HermitianSpec>,
    reduce_factor: Option<usize>,
    prefix: Option<String>,
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the wavelet transform configuration.
    pub fn with_transform(mut self, transform: MultiCwtConfig) -> Self {
        self.transform = transform;
        self
    }

    /// Analyzes a single component of a vector signal.
    pub fn with_component(mut self, component: usize) -> Self {
        self.component = Some(component);
        self
    }

    /// Restricts the analysis to a time window.
    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Sets the sample-count guard applied when no window is given.
    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples;
        self
    }

    /// Sets the smoothing span in wavelet periods.
    pub fn with_averaging_periods(mut self, averaging_periods: f64) -> Self {
        self.averaging_periods = averaging_periods;
        self
    }

    /// Sets the smoothing kernel.
    pub fn with_kernel(mut self, kernel: SmoothingKernel) -> Self {
        self.kernel = kernel;
        self
    }

    /// Sets the power normalization policies.
    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// Enables or disables polarization products.
    pub fn with_polarization(mut self, enabled: bool) -> Self {
        self.polarization = enabled;
        self
    }

    /// Enables or disables coherence products.
    pub fn with_coherence(mut self, enabled: bool) -> Self {
        self.coherence = enabled;
        self
    }

    /// Also transforms the field magnitude and emits its power fraction.
    pub fn with_magnitude(mut self, enabled: bool) -> Self {
        self.magnitude = enabled;
        self
    }

    /// Enables field-aligned rotation products.
    pub fn with_rotation(mut self, rotation: RotationSpec) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// Enables Hermitian eigen-analysis at one scale.
    pub fn with_hermitian(mut self, hermitian: HermitianSpec) -> Self {
        self.hermitian = Some(hermitian);
        self
    }

    /// Block-averages outputs in time by this factor before emitting.
    pub fn with_reduce_factor(mut self, factor: usize) -> Self {
        self.reduce_factor = Some(factor);
        self
    }

    /// Overrides the output name prefix (defaults to the input name).
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn transform(&self) -> &MultiCwtConfig {
        &self.transform
    }

    pub fn component(&self) -> Option<usize> {
        self.component
    }

    pub fn window(&self) -> Option<TimeWindow> {
        self.window
    }

    pub fn max_samples(&self) -> usize {
        self.max_samples
    }

    pub fn averaging_periods(&self) -> f64 {
        self.averaging_periods
    }

    pub fn kernel(&self) -> SmoothingKernel {
        self.kernel
    }

    pub fn normalization(&self) -> &Normalization {
        &self.normalization
    }

    pub fn polarization(&self) -> bool {
        self.polarization
    }

    pub fn coherence(&self) -> bool {
        self.coherence
    }

    pub fn magnitude(&self) -> bool {
        self.magnitude
    }

    pub fn rotation(&self) -> Option<&RotationSpec> {
        self.rotation.as_ref()
    }

    pub fn hermitian(&self) -> Option<&HermitianSpec> {
        self.hermitian.as_ref()
    }

    pub fn reduce_factor(&self) -> Option<usize> {
        self.reduce_factor
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Checks the parts of the configuration that do not depend on the
    /// signal; signal-dependent checks happen in the pipeline.
    pub(crate) fn validate(&self) -> Result<(), SpectraError> {
        if let Some(window) = &self.window {
            window.validate()?;
        }
        if self.max_samples == 0 {
            return Err(SpectraError::InvalidConfig(
                "max samples must be at least 1".to_string(),
            ));
        }
        if !self.averaging_periods.is_finite() || self.averaging_periods <= 0.0 {
            return Err(SpectraError::InvalidConfig(format!(
                "averaging periods must be finite and positive, got {}",
                self.averaging_periods
            )));
        }
        if let Some(rotation) = &self.rotation {
            let r = rotation.reference();
            let norm_sq = r[0] * r[0] + r[1] * r[1] + r[2] * r[2];
            if !norm_sq.is_finite() || norm_sq == 0.0 {
                return Err(SpectraError::InvalidConfig(
                    "rotation reference must be finite and nonzero".to_string(),
                ));
            }
        }
        if let Some(exponent) = self.normalization.frequency_exponent()
            && !exponent.is_finite()
        {
            return Err(SpectraError::InvalidConfig(
                "frequency exponent must be finite".to_string(),
            ));
        }
        if self.reduce_factor == Some(0) {
            return Err(SpectraError::InvalidConfig(
                "reduce factor must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            transform: MultiCwtConfig::default(),
            component: None,
            window: None,
            max_samples: DEFAULT_MAX_SAMPLES,
            averaging_periods: 4.0,
            kernel: SmoothingKernel::default(),
            normalization: Normalization::default(),
            polarization: true,
            coherence: false,
            magnitude: false,
            rotation: None,
            hermitian: None,
            reduce_factor: None,
            prefix: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = AnalysisConfig::default();
        assert!(config.window().is_none());
        assert_eq!(config.max_samples(), DEFAULT_MAX_SAMPLES);
        assert_eq!(config.averaging_periods(), 4.0);
        assert_eq!(config.kernel(), SmoothingKernel::Gaussian);
        assert!(config.polarization());
        assert!(!config.coherence());
        assert!(!config.magnitude());
        assert!(config.rotation().is_none());
        assert!(config.hermitian().is_none());
        assert!(config.normalization().is_identity());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_chains() {
        let config = AnalysisConfig::new()
            .with_component(1)
            .with_window(TimeWindow::Range {
                start: 10.0,
                stop: 20.0,
            })
            .with_max_samples(4096)
            .with_averaging_periods(2.0)
            .with_kernel(SmoothingKernel::Box)
            .with_polarization(false)
            .with_coherence(true)
            .with_magnitude(true)
            .with_rotation(RotationSpec::new().with_reference([0.0, 0.0, 1.0]))
            .with_hermitian(HermitianSpec::new().with_scale_index(7))
            .with_reduce_factor(4)
            .with_prefix("storm");
        assert_eq!(config.component(), Some(1));
        assert_eq!(config.max_samples(), 4096);
        assert_eq!(config.kernel(), SmoothingKernel::Box);
        assert!(!config.polarization());
        assert!(config.coherence());
        assert!(config.magnitude());
        assert_eq!(config.rotation().map(|r| r.reference()), Some([0.0, 0.0, 1.0]));
        assert_eq!(config.hermitian().and_then(|h| h.scale_index()), Some(7));
        assert_eq!(config.reduce_factor(), Some(4));
        assert_eq!(config.prefix(), Some("storm"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn window_bounds() {
        let range = TimeWindow::Range {
            start: 5.0,
            stop: 9.0,
        };
        assert_eq!(range.bounds(), (5.0, 9.0));
        let around = TimeWindow::Around {
            center: 10.0,
            half_width: 2.5,
        };
        assert_eq!(around.bounds(), (7.5, 12.5));
    }

    #[test]
    fn invalid_windows_rejected() {
        let inverted = AnalysisConfig::new().with_window(TimeWindow::Range {
            start: 9.0,
            stop: 5.0,
        });
        assert!(matches!(
            inverted.validate(),
            Err(SpectraError::InvalidConfig(_))
        ));
        let degenerate = AnalysisConfig::new().with_window(TimeWindow::Around {
            center: 0.0,
            half_width: 0.0,
        });
        assert!(degenerate.validate().is_err());
    }

    #[test]
    fn invalid_scalars_rejected() {
        assert!(AnalysisConfig::new().with_max_samples(0).validate().is_err());
        assert!(AnalysisConfig::new()
            .with_averaging_periods(0.0)
            .validate()
            .is_err());
        assert!(AnalysisConfig::new()
            .with_averaging_periods(f64::NAN)
            .validate()
            .is_err());
        assert!(AnalysisConfig::new().with_reduce_factor(0).validate().is_err());
    }

    #[test]
    fn zero_rotation_reference_rejected() {
        let config = AnalysisConfig::new()
            .with_rotation(RotationSpec::new().with_reference([0.0, 0.0, 0.0]));
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_finite_frequency_exponent_rejected() {
        let config = AnalysisConfig::new().with_normalization(
            Normalization::new().with_frequency_exponent(f64::INFINITY),
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn normalization_policies_combine() {
        let normalization = Normalization::new()
            .with_fraction_of_mean_square(true)
            .with_frequency_exponent(5.0 / 3.0)
            .with_reference_shape(|period| period.powf(5.0 / 3.0));
        assert!(!normalization.is_identity());
        assert!(normalization.fraction_of_mean_square());
        assert_eq!(normalization.frequency_exponent(), Some(5.0 / 3.0));
        let shape = normalization.reference_shape().unwrap();
        assert!((shape(8.0) - 8.0f64.powf(5.0 / 3.0)).abs() < 1e-12);
    }

    #[test]
    fn config_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<AnalysisConfig>();
    }
}
