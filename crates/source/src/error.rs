//! Error types for climet-source.

use climet_array::ArrayError;
use climet_io::IoError;

/// Error type for all fallible operations in the climet-source crate.
///
/// Covers plugin lookup, argument parsing for the builtin sources and
/// datasets, and failures propagated from the array engine and the I/O layer.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Returned when no source plugin is registered under a name.
    #[error("unknown source '{name}'")]
    UnknownSource {
        /// Requested plugin name.
        name: String,
    },

    /// Returned when no dataset plugin is registered under a name.
    #[error("unknown dataset '{name}'")]
    UnknownDataset {
        /// Requested plugin name.
        name: String,
    },

    /// Returned when plugin arguments cannot be parsed or are inconsistent.
    #[error("invalid arguments for '{plugin}': {reason}")]
    InvalidArguments {
        /// Plugin whose arguments were rejected.
        plugin: String,
        /// Description of the problem.
        reason: String,
    },

    /// Returned when the dummy source is asked for a format it cannot emulate.
    #[error("unsupported kind '{kind}' (expected 'netcdf')")]
    UnsupportedKind {
        /// Requested kind.
        kind: String,
    },

    /// Returned when fields cannot be stacked into one array.
    #[error("shape mismatch: {reason}")]
    ShapeMismatch {
        /// Description of the mismatch.
        reason: String,
    },

    /// Returned when a field index is past the end.
    #[error("field index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of fields.
        len: usize,
    },

    /// Wraps an error from climet-array.
    #[error(transparent)]
    Array(#[from] ArrayError),

    /// Wraps an error from climet-io.
    #[error(transparent)]
    Io(#[from] IoError),
}

impl SourceError {
    /// Shorthand for [`SourceError::InvalidArguments`].
    pub(crate) fn invalid(plugin: &str, reason: impl Into<String>) -> Self {
        SourceError::InvalidArguments {
            plugin: plugin.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unknown_source() {
        let e = SourceError::UnknownSource {
            name: "grib".to_string(),
        };
        assert_eq!(e.to_string(), "unknown source 'grib'");
    }

    #[test]
    fn display_invalid_arguments() {
        let e = SourceError::invalid("dummy-source", "missing field `dims`");
        assert_eq!(
            e.to_string(),
            "invalid arguments for 'dummy-source': missing field `dims`"
        );
    }

    #[test]
    fn display_index_out_of_range() {
        let e = SourceError::IndexOutOfRange { index: 4, len: 2 };
        assert_eq!(e.to_string(), "field index 4 out of range (len 2)");
    }

    #[test]
    fn array_error_is_transparent() {
        let e: SourceError = ArrayError::Empty.into();
        assert_eq!(e.to_string(), ArrayError::Empty.to_string());
        assert!(matches!(e, SourceError::Array(ArrayError::Empty)));
    }
}
