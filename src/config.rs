use std::path::PathBuf;

use serde::Deserialize;

/// Top-level Aeolus configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AeolusConfig {
    /// Signal selection settings.
    #[serde(default)]
    pub signal: SignalToml,

    /// Wavelet transform settings.
    #[serde(default)]
    pub transform: TransformToml,

    /// Spectral smoothing settings.
    #[serde(default)]
    pub smoothing: SmoothingToml,

    /// Power normalization settings.
    #[serde(default)]
    pub normalization: NormalizationToml,

    /// Derived product toggles.
    #[serde(default)]
    pub products: ProductsToml,

    /// Output settings.
    #[serde(default)]
    pub output: OutputToml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignalToml {
    /// Input signal JSON path.
    pub input: Option<PathBuf>,
    #[serde(default = "default_signal_name")]
    pub name: String,
    #[serde(default)]
    pub component: Option<usize>,
    #[serde(default)]
    pub window: Option<WindowToml>,
    #[serde(default)]
    pub max_samples: Option<usize>,
}

impl Default for SignalToml {
    fn default() -> Self {
        Self {
            input: None,
            name: default_signal_name(),
            component: None,
            window: None,
            max_samples: None,
        }
    }
}

fn default_signal_name() -> String {
    "signal".to_string()
}

/// Time window selection. Exactly one of the `start`/`stop` or
/// `center`/`half_width` pairs should be set.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowToml {
    #[serde(default)]
    pub start: Option<f64>,
    #[serde(default)]
    pub stop: Option<f64>,
    #[serde(default)]
    pub center: Option<f64>,
    #[serde(default)]
    pub half_width: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformToml {
    #[serde(default = "default_mother")]
    pub mother: String,
    /// Shape parameter: Morlet wavenumber or Paul/DOG order.
    #[serde(default)]
    pub param: Option<f64>,
    #[serde(default = "default_pad")]
    pub pad: String,
    #[serde(default)]
    pub dj: Option<f64>,
    #[serde(default)]
    pub period_range: Option<[f64; 2]>,
    #[serde(default)]
    pub frequency_range: Option<[f64; 2]>,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// Fixed background lag-1 autocorrelation; estimated when absent.
    #[serde(default)]
    pub lag1: Option<f64>,
}

impl Default for TransformToml {
    fn default() -> Self {
        Self {
            mother: default_mother(),
            param: None,
            pad: default_pad(),
            dj: None,
            period_range: None,
            frequency_range: None,
            confidence: default_confidence(),
            lag1: None,
        }
    }
}

fn default_mother() -> String {
    "morlet".to_string()
}
fn default_pad() -> String {
    "next_pow2".to_string()
}
fn default_confidence() -> f64 {
    0.95
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmoothingToml {
    #[serde(default = "default_avg_periods")]
    pub avg_periods: f64,
    #[serde(default = "default_kernel")]
    pub kernel: String,
}

impl Default for SmoothingToml {
    fn default() -> Self {
        Self {
            avg_periods: default_avg_periods(),
            kernel: default_kernel(),
        }
    }
}

fn default_avg_periods() -> f64 {
    4.0
}
fn default_kernel() -> String {
    "gaussian".to_string()
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct NormalizationToml {
    #[serde(default)]
    pub fraction_of_mean_square: bool,
    /// Multiply power by frequency raised to this exponent.
    #[serde(default)]
    pub frequency_exponent: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductsToml {
    #[serde(default = "default_true")]
    pub polarization: bool,
    #[serde(default)]
    pub coherence: bool,
    #[serde(default)]
    pub magnitude: bool,
    #[serde(default)]
    pub rotation: bool,
    /// Reference direction for the field-aligned frame.
    #[serde(default)]
    pub reference: Option<[f64; 3]>,
    #[serde(default)]
    pub hermitian: bool,
    #[serde(default)]
    pub hermitian_scale_index: Option<usize>,
}

impl Default for ProductsToml {
    fn default() -> Self {
        Self {
            polarization: true,
            coherence: false,
            magnitude: false,
            rotation: false,
            reference: None,
            hermitian: false,
            hermitian_scale_index: None,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct OutputToml {
    /// Output JSON path.
    pub path: Option<PathBuf>,
    /// Integer divisor applied to the emitted time axis.
    #[serde(default)]
    pub reduce: Option<usize>,
    /// Name prefix for emitted products; the signal name when absent.
    #[serde(default)]
    pub prefix: Option<String>,
}
