//! Error types for the aeolus-spectra crate.

use aeolus_rebin::RebinError;
use aeolus_store::StoreError;
use aeolus_wavelet::WaveletError;

/// Error type for all fallible operations in the aeolus-spectra crate.
///
/// Covers store lookups, wavelet transform failures, rebinning failures,
/// and the pipeline's own input validation. Data-insufficiency conditions
/// (empty window, too-short interval, all samples bad) are not errors; they
/// are reported through [`AnalysisOutcome`](crate::AnalysisOutcome).
#[derive(Debug, Clone, thiserror::Error)]
pub enum SpectraError {
    /// Named-variable store error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Wavelet transform error.
    #[error(transparent)]
    Wavelet(#[from] WaveletError),

    /// Array rebinning error.
    #[error(transparent)]
    Rebin(#[from] RebinError),

    /// Returned when a signal fails structural validation.
    #[error("invalid signal: {0}")]
    InvalidSignal(String),

    /// Returned when a requested component index does not exist.
    #[error("component index {index} out of range: signal has {n_components} component(s)")]
    ComponentOutOfRange {
        /// Requested component index.
        index: usize,
        /// Number of components in the signal.
        n_components: usize,
    },

    /// Returned when an explicitly requested product needs a component
    /// count the signal does not have.
    #[error("{operation} requires {required} components, signal has {got}")]
    WrongComponentCount {
        /// Product that was requested.
        operation: &'static str,
        /// Component count the product needs.
        required: usize,
        /// Component count the signal has.
        got: usize,
    },

    /// Returned when analysis configuration parameters are invalid.
    #[error("invalid analysis config: {0}")]
    InvalidConfig(String),
}
