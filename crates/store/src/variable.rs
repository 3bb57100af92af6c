//! Time-tagged variables and their display metadata.

use serde::Serialize;

use crate::error::StoreError;

/// Display hints attached to a stored variable.
///
/// These carry plotting intent (log axes, color ranges, titles) without this
/// crate knowing anything about rendering.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DisplayOptions {
    /// Log-scale the value axis.
    axis_log: bool,
    /// Log-scale the color axis.
    color_log: bool,
    /// Explicit color range hint `(low, high)`.
    color_range: Option<(f64, f64)>,
    /// Label for the value axis.
    axis_title: Option<String>,
    /// Label for the color axis.
    color_title: Option<String>,
}

impl DisplayOptions {
    /// Creates display options with everything linear and untitled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether the value axis is log-scaled.
    pub fn with_axis_log(mut self, axis_log: bool) -> Self {
        self.axis_log = axis_log;
        self
    }

    /// Sets whether the color axis is log-scaled.
    pub fn with_color_log(mut self, color_log: bool) -> Self {
        self.color_log = color_log;
        self
    }

    /// Sets the color range hint.
    pub fn with_color_range(mut self, low: f64, high: f64) -> Self {
        self.color_range = Some((low, high));
        self
    }

    /// Sets the value-axis label.
    pub fn with_axis_title(mut self, title: impl Into<String>) -> Self {
        self.axis_title = Some(title.into());
        self
    }

    /// Sets the color-axis label.
    pub fn with_color_title(mut self, title: impl Into<String>) -> Self {
        self.color_title = Some(title.into());
        self
    }

    /// Returns whether the value axis is log-scaled.
    pub fn axis_log(&self) -> bool {
        self.axis_log
    }

    /// Returns whether the color axis is log-scaled.
    pub fn color_log(&self) -> bool {
        self.color_log
    }

    /// Returns the color range hint, if set.
    pub fn color_range(&self) -> Option<(f64, f64)> {
        self.color_range
    }

    /// Returns the value-axis label, if set.
    pub fn axis_title(&self) -> Option<&str> {
        self.axis_title.as_deref()
    }

    /// Returns the color-axis label, if set.
    pub fn color_title(&self) -> Option<&str> {
        self.color_title.as_deref()
    }
}

/// Payload of a variable: one series, or time-major rows over a column axis.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Values {
    /// A single series, one value per sample.
    Scalar(Vec<f64>),
    /// Rows of equal width, one row per sample.
    Matrix(Vec<Vec<f64>>),
}

/// A named signal or derived product: timestamps, values, an optional column
/// axis (e.g. frequencies for a spectrogram) and display hints.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Variable {
    times: Vec<f64>,
    values: Values,
    axis: Option<Vec<f64>>,
    options: DisplayOptions,
}

impl Variable {
    /// Creates a scalar variable.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`StoreError::Empty`] | `times` is empty |
    /// | [`StoreError::LengthMismatch`] | `values` length differs from `times` |
    pub fn scalar(times: Vec<f64>, values: Vec<f64>) -> Result<Self, StoreError> {
        if times.is_empty() {
            return Err(StoreError::Empty);
        }
        if values.len() != times.len() {
            return Err(StoreError::LengthMismatch {
                what: "values",
                got: values.len(),
                expected: times.len(),
            });
        }
        Ok(Self {
            times,
            values: Values::Scalar(values),
            axis: None,
            options: DisplayOptions::default(),
        })
    }

    /// Creates a matrix variable with an optional column axis.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`StoreError::Empty`] | `times` or the first row is empty |
    /// | [`StoreError::LengthMismatch`] | row count or axis length disagrees |
    /// | [`StoreError::RaggedMatrix`] | rows have differing widths |
    pub fn matrix(
        times: Vec<f64>,
        rows: Vec<Vec<f64>>,
        axis: Option<Vec<f64>>,
    ) -> Result<Self, StoreError> {
        if times.is_empty() || rows.first().is_none_or(|r| r.is_empty()) {
            return Err(StoreError::Empty);
        }
        if rows.len() != times.len() {
            return Err(StoreError::LengthMismatch {
                what: "rows",
                got: rows.len(),
                expected: times.len(),
            });
        }
        let width = rows[0].len();
        for (row, r) in rows.iter().enumerate() {
            if r.len() != width {
                return Err(StoreError::RaggedMatrix {
                    row,
                    got: r.len(),
                    expected: width,
                });
            }
        }
        if let Some(ref ax) = axis
            && ax.len() != width
        {
            return Err(StoreError::LengthMismatch {
                what: "axis",
                got: ax.len(),
                expected: width,
            });
        }
        Ok(Self {
            times,
            values: Values::Matrix(rows),
            axis,
            options: DisplayOptions::default(),
        })
    }

    /// Attaches display options.
    pub fn with_options(mut self, options: DisplayOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the timestamps.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Returns the payload.
    pub fn values(&self) -> &Values {
        &self.values
    }

    /// Returns the column axis, if any.
    pub fn axis(&self) -> Option<&[f64]> {
        self.axis.as_deref()
    }

    /// Returns the display options.
    pub fn options(&self) -> &DisplayOptions {
        &self.options
    }

    /// Returns the number of samples.
    pub fn n_samples(&self) -> usize {
        self.times.len()
    }

    /// Returns the number of columns (1 for scalar variables).
    pub fn n_columns(&self) -> usize {
        match &self.values {
            Values::Scalar(_) => 1,
            Values::Matrix(rows) => rows[0].len(),
        }
    }

    /// Returns the scalar series, if this variable is scalar.
    pub fn as_scalar(&self) -> Option<&[f64]> {
        match &self.values {
            Values::Scalar(v) => Some(v),
            Values::Matrix(_) => None,
        }
    }

    /// Returns the matrix rows, if this variable is a matrix.
    pub fn as_matrix(&self) -> Option<&[Vec<f64>]> {
        match &self.values {
            Values::Scalar(_) => None,
            Values::Matrix(rows) => Some(rows),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_roundtrip() {
        let v = Variable::scalar(vec![0.0, 1.0], vec![5.0, 6.0]).unwrap();
        assert_eq!(v.n_samples(), 2);
        assert_eq!(v.n_columns(), 1);
        assert_eq!(v.as_scalar().unwrap(), &[5.0, 6.0]);
        assert!(v.as_matrix().is_none());
    }

    #[test]
    fn scalar_length_mismatch() {
        let err = Variable::scalar(vec![0.0, 1.0], vec![5.0]).unwrap_err();
        assert!(matches!(
            err,
            StoreError::LengthMismatch {
                what: "values",
                got: 1,
                expected: 2
            }
        ));
    }

    #[test]
    fn scalar_empty() {
        let err = Variable::scalar(vec![], vec![]).unwrap_err();
        assert!(matches!(err, StoreError::Empty));
    }

    #[test]
    fn matrix_roundtrip() {
        let v = Variable::matrix(
            vec![0.0, 1.0],
            vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
            Some(vec![10.0, 20.0, 30.0]),
        )
        .unwrap();
        assert_eq!(v.n_columns(), 3);
        assert_eq!(v.axis().unwrap(), &[10.0, 20.0, 30.0]);
        assert!(v.as_scalar().is_none());
    }

    #[test]
    fn matrix_ragged_rejected() {
        let err = Variable::matrix(
            vec![0.0, 1.0],
            vec![vec![1.0, 2.0], vec![3.0]],
            None,
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::RaggedMatrix { row: 1, .. }));
    }

    #[test]
    fn matrix_axis_length_checked() {
        let err = Variable::matrix(
            vec![0.0],
            vec![vec![1.0, 2.0]],
            Some(vec![1.0, 2.0, 3.0]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            StoreError::LengthMismatch { what: "axis", .. }
        ));
    }

    #[test]
    fn matrix_row_count_checked() {
        let err = Variable::matrix(vec![0.0, 1.0], vec![vec![1.0, 2.0]], None).unwrap_err();
        assert!(matches!(err, StoreError::LengthMismatch { what: "rows", .. }));
    }

    #[test]
    fn options_builder() {
        let opts = DisplayOptions::new()
            .with_axis_log(true)
            .with_color_log(true)
            .with_color_range(1e-3, 1e1)
            .with_axis_title("f (Hz)")
            .with_color_title("power");
        assert!(opts.axis_log());
        assert!(opts.color_log());
        assert_eq!(opts.color_range(), Some((1e-3, 1e1)));
        assert_eq!(opts.axis_title(), Some("f (Hz)"));
        assert_eq!(opts.color_title(), Some("power"));
    }

    #[test]
    fn options_default_is_linear() {
        let opts = DisplayOptions::default();
        assert!(!opts.axis_log());
        assert!(!opts.color_log());
        assert!(opts.color_range().is_none());
    }

    #[test]
    fn variable_serializes() {
        let v = Variable::scalar(vec![0.0], vec![1.0])
            .unwrap()
            .with_options(DisplayOptions::new().with_axis_title("B (nT)"));
        let json = serde_json::to_string(&v).unwrap();
        assert!(json.contains("B (nT)"));
        assert!(json.contains("Scalar"));
    }

    #[test]
    fn variable_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<Variable>();
        assert_impl::<DisplayOptions>();
    }
}
