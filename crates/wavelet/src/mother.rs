//! Mother wavelet library: Morlet, Paul and derivative-of-Gaussian families.
//!
//! Each family is evaluated directly in the Fourier domain following
//! Torrence & Compo (1998), Table 1. All families are analytic here: the
//! spectrum is exactly zero at non-positive wavenumbers.

use num_complex::Complex;
use statrs::function::gamma::gamma;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::WaveletError;

/// Exponent floor applied before exponentiation. Entries whose exponent falls
/// at or below the floor are masked to exact zero instead of denormal noise.
const EXPONENT_FLOOR: f64 = -100.0;

/// A mother wavelet family carrying its shape parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mother {
    /// Complex Morlet wavelet with non-dimensional wavenumber `k0`.
    Morlet {
        /// Non-dimensional wavenumber (canonical value 6).
        wavenumber: f64,
    },
    /// Paul wavelet of order `m`.
    Paul {
        /// Order (canonical value 4).
        order: f64,
    },
    /// Derivative-of-Gaussian wavelet of order `m` (m = 2 is the Mexican hat).
    Dog {
        /// Derivative order (canonical value 2).
        order: f64,
    },
}

/// Scale-independent constants of a mother wavelet.
///
/// Memoized per `(family, parameter)` by the transform engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotherConstants {
    /// Ratio of Fourier period to scale.
    pub fourier_factor: f64,
    /// E-folding factor for the cone of influence.
    pub coi_factor: f64,
    /// Minimum degrees of freedom for significance testing.
    pub dof_min: u32,
    /// Reconstruction constant; defined only at canonical parameter values.
    pub cdelta: Option<f64>,
    /// Time-domain value of the wavelet at t = 0.
    pub psi0: f64,
}

/// One evaluated daughter wavelet: the Fourier-domain spectrum at a fixed
/// scale, plus the equivalent Fourier period.
#[derive(Clone, Debug)]
pub struct Daughter {
    spectrum: Vec<Complex<f64>>,
    period: f64,
}

impl Daughter {
    /// Returns the Fourier-domain spectrum over the wavenumber axis.
    pub fn spectrum(&self) -> &[Complex<f64>] {
        &self.spectrum
    }

    /// Consumes the daughter, returning the spectrum buffer.
    pub fn into_spectrum(self) -> Vec<Complex<f64>> {
        self.spectrum
    }

    /// Returns the Fourier period equivalent to the evaluated scale.
    pub fn period(&self) -> f64 {
        self.period
    }
}

impl Mother {
    /// Morlet wavelet at the canonical wavenumber 6.
    pub fn morlet() -> Self {
        Mother::Morlet { wavenumber: 6.0 }
    }

    /// Paul wavelet at the canonical order 4.
    pub fn paul() -> Self {
        Mother::Paul { order: 4.0 }
    }

    /// Derivative-of-Gaussian wavelet at the canonical order 2.
    pub fn dog() -> Self {
        Mother::Dog { order: 2.0 }
    }

    /// Builds a mother wavelet from a family name and optional parameter.
    ///
    /// Names are matched case-insensitively; a missing parameter selects the
    /// family's canonical value.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`WaveletError::UnknownMother`] | name is not `morlet`, `paul` or `dog` |
    /// | [`WaveletError::InvalidParameter`] | parameter is non-finite or non-positive |
    pub fn from_name(name: &str, parameter: Option<f64>) -> Result<Self, WaveletError> {
        let mother = match name.trim().to_ascii_lowercase().as_str() {
            "morlet" => Mother::Morlet {
                wavenumber: parameter.unwrap_or(6.0),
            },
            "paul" => Mother::Paul {
                order: parameter.unwrap_or(4.0),
            },
            "dog" => Mother::Dog {
                order: parameter.unwrap_or(2.0),
            },
            _ => return Err(WaveletError::UnknownMother(name.trim().to_string())),
        };
        mother.validate()?;
        Ok(mother)
    }

    /// Checks that the shape parameter is finite and positive.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`WaveletError::InvalidParameter`] | parameter is non-finite or non-positive |
    pub fn validate(&self) -> Result<(), WaveletError> {
        let value = self.parameter();
        if !value.is_finite() || value <= 0.0 {
            return Err(WaveletError::InvalidParameter {
                mother: self.name(),
                value,
            });
        }
        Ok(())
    }

    /// Returns the family name.
    pub fn name(&self) -> &'static str {
        match self {
            Mother::Morlet { .. } => "morlet",
            Mother::Paul { .. } => "paul",
            Mother::Dog { .. } => "dog",
        }
    }

    /// Returns the shape parameter.
    pub fn parameter(&self) -> f64 {
        match *self {
            Mother::Morlet { wavenumber } => wavenumber,
            Mother::Paul { order } => order,
            Mother::Dog { order } => order,
        }
    }

    /// Ratio of Fourier period to scale.
    pub fn fourier_factor(&self) -> f64 {
        match *self {
            Mother::Morlet { wavenumber: k0 } => 4.0 * PI / (k0 + (2.0 + k0 * k0).sqrt()),
            Mother::Paul { order: m } => 4.0 * PI / (2.0 * m + 1.0),
            Mother::Dog { order: m } => 2.0 * PI * (2.0 / (2.0 * m + 1.0)).sqrt(),
        }
    }

    /// Fourier period equivalent to `scale`.
    pub fn fourier_period(&self, scale: f64) -> f64 {
        scale * self.fourier_factor()
    }

    /// E-folding factor for the cone of influence.
    pub fn coi_factor(&self) -> f64 {
        match self {
            Mother::Morlet { .. } => self.fourier_factor() / 2.0_f64.sqrt(),
            Mother::Paul { .. } => self.fourier_factor() * 2.0_f64.sqrt(),
            Mother::Dog { .. } => self.fourier_factor() / 2.0_f64.sqrt(),
        }
    }

    /// Minimum degrees of freedom for chi-squared significance testing.
    pub fn dof_min(&self) -> u32 {
        match self {
            Mother::Morlet { .. } | Mother::Paul { .. } => 2,
            Mother::Dog { .. } => 1,
        }
    }

    /// Reconstruction constant, tabulated only at canonical parameters:
    /// Morlet k0 = 6, Paul m = 4, DOG m = 2 or 6. `None` everywhere else.
    pub fn cdelta(&self) -> Option<f64> {
        let close = |a: f64, b: f64| (a - b).abs() < 1e-9;
        match *self {
            Mother::Morlet { wavenumber } if close(wavenumber, 6.0) => Some(0.776),
            Mother::Paul { order } if close(order, 4.0) => Some(1.132),
            Mother::Dog { order } if close(order, 2.0) => Some(3.541),
            Mother::Dog { order } if close(order, 6.0) => Some(1.966),
            _ => None,
        }
    }

    /// Time-domain wavelet value at t = 0, used for reconstruction.
    ///
    /// For DOG this is the even-order closed form
    /// `(-1)^(m/2+1) (m-1)!! / sqrt(Γ(m+1/2))`; odd orders evaluate to zero
    /// (their reconstruction constant is undefined anyway).
    pub fn psi0(&self) -> f64 {
        match *self {
            Mother::Morlet { .. } => PI.powf(-0.25),
            Mother::Paul { order: m } => {
                2.0_f64.powf(m) * gamma(m + 1.0) / (PI * gamma(2.0 * m + 1.0)).sqrt()
            }
            Mother::Dog { order: m } => {
                if m.fract() != 0.0 || (m as u64) % 2 != 0 {
                    return 0.0;
                }
                let m_int = m as u64;
                let sign = if (m_int / 2 + 1) % 2 == 0 { 1.0 } else { -1.0 };
                sign * double_factorial(m_int - 1) / gamma(m + 0.5).sqrt()
            }
        }
    }

    /// Recommended scale-octave fraction for this family's bandwidth.
    pub fn default_dj(&self) -> f64 {
        match *self {
            Mother::Morlet { wavenumber } => (2.0 * PI / wavenumber) / 8.0,
            Mother::Paul { .. } | Mother::Dog { .. } => 0.125,
        }
    }

    /// Bundles the scale-independent constants.
    pub fn constants(&self) -> MotherConstants {
        MotherConstants {
            fourier_factor: self.fourier_factor(),
            coi_factor: self.coi_factor(),
            dof_min: self.dof_min(),
            cdelta: self.cdelta(),
            psi0: self.psi0(),
        }
    }

    /// Key for memoizing [`MotherConstants`] per `(family, parameter)`.
    pub(crate) fn cache_key(&self) -> (u8, u64) {
        match *self {
            Mother::Morlet { wavenumber } => (0, wavenumber.to_bits()),
            Mother::Paul { order } => (1, order.to_bits()),
            Mother::Dog { order } => (2, order.to_bits()),
        }
    }

    /// Evaluates the daughter wavelet at `scale` over a wavenumber axis.
    ///
    /// The spectrum carries the `sqrt(2π scale/dt)` energy normalization of
    /// Torrence & Compo eq. 6: on an FFT wavenumber grid the squared spectrum
    /// sums to the grid length, so white noise has flat expected power equal
    /// to the series variance. `scale` must be positive.
    pub fn evaluate(&self, scale: f64, wavenumbers: &[f64], dt: f64) -> Daughter {
        let energy_norm = (2.0 * PI * scale / dt).sqrt();
        let zero = Complex::new(0.0, 0.0);

        let spectrum = match *self {
            Mother::Morlet { wavenumber: k0 } => {
                let norm = energy_norm * PI.powf(-0.25);
                wavenumbers
                    .iter()
                    .map(|&k| {
                        if k <= 0.0 {
                            return zero;
                        }
                        let exponent = -0.5 * (scale * k - k0).powi(2);
                        if exponent <= EXPONENT_FLOOR {
                            zero
                        } else {
                            Complex::new(norm * exponent.exp(), 0.0)
                        }
                    })
                    .collect()
            }
            Mother::Paul { order: m } => {
                let norm = energy_norm * 2.0_f64.powf(m) / (m * gamma(2.0 * m)).sqrt();
                wavenumbers
                    .iter()
                    .map(|&k| {
                        if k <= 0.0 {
                            return zero;
                        }
                        let sk = scale * k;
                        if -sk <= EXPONENT_FLOOR {
                            zero
                        } else {
                            Complex::new(norm * sk.powf(m) * (-sk).exp(), 0.0)
                        }
                    })
                    .collect()
            }
            Mother::Dog { order: m } => {
                let norm = energy_norm * (1.0 / gamma(m + 0.5)).sqrt();
                // -i^m, constant across the axis.
                let phase = -Complex::from_polar(1.0, 0.5 * PI * m);
                wavenumbers
                    .iter()
                    .map(|&k| {
                        if k <= 0.0 {
                            return zero;
                        }
                        let sk = scale * k;
                        let exponent = -0.5 * sk * sk;
                        if exponent <= EXPONENT_FLOOR {
                            zero
                        } else {
                            phase * (norm * sk.powf(m) * exponent.exp())
                        }
                    })
                    .collect()
            }
        };

        Daughter {
            spectrum,
            period: self.fourier_period(scale),
        }
    }
}

impl fmt::Display for Mother {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.parameter())
    }
}

impl FromStr for Mother {
    type Err = WaveletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mother::from_name(s, None)
    }
}

/// Odd double factorial `n!! = n(n-2)(n-4)…`, with `0!! = 1`.
fn double_factorial(n: u64) -> f64 {
    let mut acc = 1.0;
    let mut i = n;
    while i > 1 {
        acc *= i as f64;
        i -= 2;
    }
    acc
}
