//! # aeolus-spectra
//!
//! Named-signal wavelet analysis pipeline: pulls a time series out of the
//! variable store, repairs its sampling grid, runs the multi-component
//! wavelet transform, and writes derived spectra (power, polarization,
//! coherence, field-aligned and eigen products) back into the store.
//!
//! ```mermaid
//! graph LR
//!     Store[variable store] --> Ingest
//!     Ingest --> Repair[sampling repair]
//!     Repair --> Transform[multi-component CWT]
//!     Transform --> Smooth[smoothing + mask]
//!     Smooth --> Derive[derived products]
//!     Derive --> Reduce[resolution reduction]
//!     Reduce --> Store
//! ```
//!
//! The pipeline distinguishes configuration errors ([`SpectraError`])
//! from expected data shortfalls ([`Insufficiency`]), so a batch run over
//! many signals can skip the empty ones and still fail loudly on a bad
//! setup.
//!
//! ## Quick start
//!
//! ```ignore
//! use aeolus_spectra::{AnalysisConfig, AnalysisOutcome, analyze};
//! use aeolus_store::{Variable, VariableStore};
//! use aeolus_wavelet::CwtEngine;
//!
//! let mut store = VariableStore::new();
//! store.insert("bfield", Variable::scalar(times, values)?);
//!
//! let mut engine = CwtEngine::new();
//! let config = AnalysisConfig::new().with_coherence(true);
//! match analyze(&mut engine, &mut store, "bfield", &config)? {
//!     AnalysisOutcome::Ready(report) => println!("stored {:?}", report.emitted()),
//!     AnalysisOutcome::Insufficient(reason) => println!("skipped: {reason}"),
//! }
//! ```

mod coherence;
mod config;
mod error;
mod hermitian;
mod pipeline;
mod rotation;
mod sampling;
mod signal;
mod smoothing;

pub use error::SpectraError;

pub use config::{
    AnalysisConfig, DEFAULT_MAX_SAMPLES, HermitianSpec, Normalization, RotationSpec, TimeWindow,
};
pub use pipeline::{AnalysisOutcome, AnalysisReport, Insufficiency, analyze};
pub use signal::SampledSignal;
pub use smoothing::SmoothingKernel;
