//! In-memory named-variable store for the aeolus toolkit.
//!
//! Holds time-tagged scalar and matrix variables with display metadata, so
//! analysis stages can exchange signals and spectrograms by name without any
//! file-format or plotting dependencies.
//!
//! # Quick start
//!
//! ```ignore
//! use aeolus_store::{DisplayOptions, Variable, VariableStore};
//!
//! let mut store = VariableStore::new();
//! let var = Variable::scalar(times, values)?
//!     .with_options(DisplayOptions::new().with_axis_title("B (nT)"));
//! store.insert("bx", var);
//! let bx = store.get("bx")?;
//! ```

mod error;
mod store;
mod variable;

pub use error::StoreError;
pub use store::VariableStore;
pub use variable::{DisplayOptions, Values, Variable};
