//! Component-major view of a stored time series.

use aeolus_store::{Values, Variable};

use crate::error::SpectraError;

/// A sampled signal extracted from a store variable.
///
/// Holds the timestamp axis and one value series per component, in
/// component-major layout (`components[c][t]`). Scalar variables become a
/// single component; matrix variables contribute one component per column.
///
/// The timestamps are whatever the store holds. Uniformity is not assumed
/// here; the sampling-repair stage decides whether the cadence is usable.
#[derive(Clone, Debug)]
pub struct SampledSignal {
    times: Vec<f64>,
    components: Vec<Vec<f64>>,
}

impl SampledSignal {
    /// Builds a signal from raw parts.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`SpectraError::InvalidSignal`] | no components, or a component length differs from the timestamp length |
    pub fn new(times: Vec<f64>, components: Vec<Vec<f64>>) -> Result<Self, SpectraError> {
        if components.is_empty() {
            return Err(SpectraError::InvalidSignal(
                "signal must have at least one component".to_string(),
            ));
        }
        for (index, component) in components.iter().enumerate() {
            if component.len() != times.len() {
                return Err(SpectraError::InvalidSignal(format!(
                    "component {index} has {} samples, timestamp axis has {}",
                    component.len(),
                    times.len()
                )));
            }
        }
        Ok(Self { times, components })
    }

    /// Builds a signal from a store variable.
    ///
    /// Matrix variables are stored time-major (one row per sample); the
    /// rows are transposed here into per-component series.
    pub fn from_variable(variable: &Variable) -> Self {
        let times = variable.times().to_vec();
        let components = match variable.values() {
            Values::Scalar(values) => vec![values.clone()],
            Values::Matrix(rows) => {
                let width = variable.n_columns();
                let mut columns = vec![Vec::with_capacity(rows.len()); width];
                for row in rows {
                    for (column, &value) in columns.iter_mut().zip(row.iter()) {
                        column.push(value);
                    }
                }
                columns
            }
        };
        Self { times, components }
    }

    /// Returns a single-component signal holding component `index`.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`SpectraError::ComponentOutOfRange`] | `index >= n_components` |
    pub fn select_component(&self, index: usize) -> Result<Self, SpectraError> {
        let component =
            self.components
                .get(index)
                .ok_or_else(|| SpectraError::ComponentOutOfRange {
                    index,
                    n_components: self.components.len(),
                })?;
        Ok(Self {
            times: self.times.clone(),
            components: vec![component.clone()],
        })
    }

    /// Returns the sub-signal whose timestamps fall in `[start, stop]`,
    /// or `None` when no sample does.
    pub fn slice_window(&self, start: f64, stop: f64) -> Option<Self> {
        let keep: Vec<usize> = self
            .times
            .iter()
            .enumerate()
            .filter(|&(_, &t)| t >= start && t <= stop)
            .map(|(i, _)| i)
            .collect();
        if keep.is_empty() {
            return None;
        }
        let times = keep.iter().map(|&i| self.times[i]).collect();
        let components = self
            .components
            .iter()
            .map(|component| keep.iter().map(|&i| component[i]).collect())
            .collect();
        Some(Self { times, components })
    }

    /// Returns the timestamp axis.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Returns the per-component value series.
    pub fn components(&self) -> &[Vec<f64>] {
        &self.components
    }

    /// Returns the number of samples.
    pub fn n_samples(&self) -> usize {
        self.times.len()
    }

    /// Returns the number of components.
    pub fn n_components(&self) -> usize {
        self.components.len()
    }
}
