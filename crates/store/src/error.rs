//! Error types for the aeolus-store crate.

/// Error type for all fallible operations in the aeolus-store crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// Returned when a variable name is not present in the store.
    #[error("variable '{0}' not found")]
    NotFound(String),

    /// Returned when an array length does not match the time axis.
    #[error("length mismatch: {what} has {got} entries, expected {expected}")]
    LengthMismatch {
        /// Which array disagreed.
        what: &'static str,
        /// Length found.
        got: usize,
        /// Length required.
        expected: usize,
    },

    /// Returned when a matrix variable is not rectangular.
    #[error("ragged matrix: row {row} has {got} columns, expected {expected}")]
    RaggedMatrix {
        /// Index of the offending row.
        row: usize,
        /// Columns found.
        got: usize,
        /// Columns expected from the first row.
        expected: usize,
    },

    /// Returned when a variable is created with no samples.
    #[error("variable has no samples")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_not_found() {
        let err = StoreError::NotFound("bfield".into());
        assert_eq!(err.to_string(), "variable 'bfield' not found");
    }

    #[test]
    fn error_length_mismatch() {
        let err = StoreError::LengthMismatch {
            what: "values",
            got: 9,
            expected: 10,
        };
        assert_eq!(
            err.to_string(),
            "length mismatch: values has 9 entries, expected 10"
        );
    }

    #[test]
    fn error_ragged_matrix() {
        let err = StoreError::RaggedMatrix {
            row: 4,
            got: 2,
            expected: 3,
        };
        assert_eq!(err.to_string(), "ragged matrix: row 4 has 2 columns, expected 3");
    }

    #[test]
    fn error_empty() {
        assert_eq!(StoreError::Empty.to_string(), "variable has no samples");
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<StoreError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<StoreError>();
    }
}
