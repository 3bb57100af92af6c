//! Error types for the aeolus-wavelet crate.

/// Error type for all fallible operations in the aeolus-wavelet crate.
///
/// Covers validation failures, shape mismatches, and numerically undefined
/// requests. Data insufficiency (an interval too short to analyze) is not an
/// error; see [`MultiCwtOutcome`](crate::MultiCwtOutcome).
#[derive(Debug, Clone, thiserror::Error)]
pub enum WaveletError {
    /// Returned when a mother wavelet family name is not recognized.
    #[error("unknown mother wavelet: {0}")]
    UnknownMother(String),

    /// Returned when a mother wavelet shape parameter is unusable.
    #[error("invalid {mother} parameter {value}: must be finite and positive")]
    InvalidParameter {
        /// Family whose parameter was rejected.
        mother: &'static str,
        /// Value that was rejected.
        value: f64,
    },

    /// Returned when transform configuration parameters are invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Returned when the input series is shorter than the minimum required length.
    #[error("series too short: got {len} observations, need at least {min}")]
    SeriesTooShort {
        /// Number of observations provided.
        len: usize,
        /// Minimum number of observations required.
        min: usize,
    },

    /// Returned when the input data contains non-finite values (NaN or infinity).
    #[error("input data contains non-finite values")]
    NonFiniteData,

    /// Returned when multi-component inputs have unequal lengths.
    #[error("component {index} has {len} samples, expected {expected}")]
    ComponentMismatch {
        /// Index of the offending component.
        index: usize,
        /// Length found.
        len: usize,
        /// Length of component 0.
        expected: usize,
    },

    /// Returned when more components are supplied than the wrapper supports.
    #[error("too many components: got {got}, max {max}")]
    TooManyComponents {
        /// Number of components supplied.
        got: usize,
        /// Maximum supported.
        max: usize,
    },

    /// Returned when an empty component list is supplied.
    #[error("no components provided")]
    NoComponents,

    /// Returned when reconstruction is requested for a parameter value with no
    /// tabulated reconstruction constant. Reported distinctly so callers never
    /// mistake an undefined inverse for a zero signal.
    #[error("reconstruction constant undefined for {mother}: defined only at canonical parameters")]
    ReconstructionUndefined {
        /// Rendered mother wavelet, e.g. `morlet(6.5)`.
        mother: String,
    },
}
