//! Error types for climet-array.

/// Error type for all fallible operations in the climet-array crate.
///
/// Covers construction problems (rank and size mismatches), alignment
/// failures, and the conflicts detected while merging, concatenating or
/// combining datasets.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArrayError {
    /// Returned when a dimension has an unexpected size.
    #[error("dimension '{name}' mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Name of the dimension.
        name: String,
        /// Expected size.
        expected: usize,
        /// Actual size.
        got: usize,
    },

    /// Returned when indexes along a dimension cannot be joined.
    #[error("cannot align along dimension '{dim}': {reason}")]
    AlignmentConflict {
        /// Dimension that failed to align.
        dim: String,
        /// Description of the conflict.
        reason: String,
    },

    /// Returned when two inputs disagree about the same variable.
    #[error("conflicting values for variable '{name}': {reason}")]
    MergeConflict {
        /// Variable or coordinate name.
        name: String,
        /// Description of the conflict.
        reason: String,
    },

    /// Returned when a variable cannot be concatenated.
    #[error("cannot concatenate variable '{name}': {reason}")]
    ConcatConflict {
        /// Variable or coordinate name.
        name: String,
        /// Description of the conflict.
        reason: String,
    },

    /// Returned when a variable is present in some inputs but not others.
    #[error("variable '{name}' is missing from input {position}")]
    MissingVariable {
        /// Name of the missing variable.
        name: String,
        /// Zero-based position of the input lacking it.
        position: usize,
    },

    /// Returned when an index is required to be monotonic and is not.
    #[error("coordinate '{dim}' is not monotonic: {reason}")]
    NonMonotonic {
        /// Dimension whose index is not monotonic.
        dim: String,
        /// Description of where monotonicity was lost.
        reason: String,
    },

    /// Returned when combine-by-coords cannot order its inputs.
    #[error("cannot combine datasets: {reason}")]
    Combine {
        /// Description of the failure.
        reason: String,
    },

    /// Returned when an operation needs at least one input.
    #[error("at least one dataset is required")]
    Empty,

    /// Returned when one or more validation checks fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },

    /// Wraps a shape error from ndarray.
    #[error("shape error: {reason}")]
    Shape {
        /// Description of the underlying shape failure.
        reason: String,
    },
}

impl From<ndarray::ShapeError> for ArrayError {
    fn from(e: ndarray::ShapeError) -> Self {
        ArrayError::Shape {
            reason: e.to_string(),
        }
    }
}
