//! Integer-ratio array rebinning for the aeolus toolkit.
//!
//! Resizes 1-D, 2-D and 3-D arrays where every output dimension is an integer
//! multiple or divisor of the corresponding input dimension. Compression
//! block-averages (or block-samples); expansion interpolates linearly (or
//! repeats samples), with the fractional source position `i*n/m` and the
//! final value repeated past the last interior point.
//!
//! Anything that is not an integer size relationship is rejected: this crate
//! never resamples fractionally.
//!
//! # Quick start
//!
//! ```ignore
//! use aeolus_rebin::{Mode, rebin_1d};
//!
//! let halved = rebin_1d(&data, data.len() / 2, Mode::Average)?;
//! let doubled = rebin_1d(&data, data.len() * 2, Mode::Average)?;
//! ```

mod error;
mod rebin;

pub use error::RebinError;
pub use rebin::{Mode, rebin_1d, rebin_2d, rebin_3d};
