//! Error types for the aeolus-rebin crate.

/// Error type for all fallible operations in the aeolus-rebin crate.
///
/// Rebinning only supports integer size relationships; everything else is
/// rejected up front rather than silently resampled.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RebinError {
    /// Returned when an output size is neither a multiple nor a divisor of the input size.
    #[error("cannot rebin axis {axis} from {from} to {to}: sizes must be integer multiples")]
    NonIntegerRatio {
        /// Axis index (0 = slowest-varying).
        axis: usize,
        /// Input size along the axis.
        from: usize,
        /// Requested output size along the axis.
        to: usize,
    },

    /// Returned when the input array is empty along any axis.
    #[error("input array is empty")]
    EmptyInput,

    /// Returned when a requested output size is zero.
    #[error("requested output size is zero on axis {axis}")]
    ZeroSize {
        /// Axis index with the zero request.
        axis: usize,
    },

    /// Returned when a nested input array is not rectangular.
    #[error("ragged input: row {row} has length {got}, expected {expected}")]
    RaggedInput {
        /// Index of the offending row.
        row: usize,
        /// Length found.
        got: usize,
        /// Length expected from the first row.
        expected: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_non_integer_ratio() {
        let err = RebinError::NonIntegerRatio {
            axis: 1,
            from: 6,
            to: 4,
        };
        assert_eq!(
            err.to_string(),
            "cannot rebin axis 1 from 6 to 4: sizes must be integer multiples"
        );
    }

    #[test]
    fn error_empty_input() {
        assert_eq!(RebinError::EmptyInput.to_string(), "input array is empty");
    }

    #[test]
    fn error_zero_size() {
        let err = RebinError::ZeroSize { axis: 0 };
        assert_eq!(err.to_string(), "requested output size is zero on axis 0");
    }

    #[test]
    fn error_ragged_input() {
        let err = RebinError::RaggedInput {
            row: 2,
            got: 3,
            expected: 5,
        };
        assert_eq!(
            err.to_string(),
            "ragged input: row 2 has length 3, expected 5"
        );
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<RebinError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<RebinError>();
    }
}
