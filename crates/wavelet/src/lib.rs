//! # aeolus-wavelet
//!
//! Continuous wavelet transforms for time-frequency signal analysis,
//! following Torrence & Compo (1998).
//!
//! ## Analysis Pipeline
//!
//! ```mermaid
//! graph LR
//!     A["Mother::morlet()"] --> B["CwtConfig"]
//!     B -->|"engine.transform(&data, &config)?"| C["CwtResult"]
//!     C --> D[".power()"]
//!     C --> E[".significance()"]
//!     C --> F[".reconstruction()"]
//!     A --> G["MultiCwtConfig"]
//!     G -->|"multi_cwt(&mut engine, &components, dt, &config)?"| H["MultiCwtOutcome"]
//!     H --> I["MultiCwt"]
//! ```
//!
//! ## Supported Mother Wavelets
//!
//! | Mother | Parameter | Canonical | Reconstruction |
//! |--------|-----------|-----------|----------------|
//! | [`Mother::Morlet`] | wavenumber | 6 | at wavenumber 6 |
//! | [`Mother::Paul`] | order | 4 | at order 4 |
//! | [`Mother::Dog`] | order | 2 | at orders 2 and 6 |
//!
//! ## Quick Start
//!
//! ```ignore
//! use aeolus_wavelet::{CwtConfig, CwtEngine, Mother};
//!
//! let mut engine = CwtEngine::new();
//! let config = CwtConfig::new()
//!     .with_mother(Mother::morlet())
//!     .with_dt(0.5)
//!     .with_dj(0.125);
//! let result = engine.transform(&data, &config)?;
//!
//! for (period, threshold) in result.periods().iter().zip(result.significance()) {
//!     println!("period {period}: 95% level {threshold}");
//! }
//! ```

mod error;
mod mother;
mod multi;
mod transform;

pub use error::WaveletError;
pub use mother::{Daughter, Mother, MotherConstants};
pub use multi::{MAX_COMPONENTS, MultiCwt, MultiCwtConfig, MultiCwtOutcome, multi_cwt};
pub use transform::{CwtConfig, CwtEngine, CwtResult, PadMode};
