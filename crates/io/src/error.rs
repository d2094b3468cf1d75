//! Error types for climet-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the climet-io crate.
///
/// Covers missing files, format-specific failures from NetCDF, Arrow and
/// Parquet, and problems raised by the labelled-array layer while building
/// or combining the datasets that were read.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an error originating from the NetCDF library.
    #[error("netcdf error: {reason}")]
    Netcdf {
        /// Description of the underlying NetCDF failure.
        reason: String,
    },

    /// Wraps an error originating from the Parquet or Arrow libraries.
    #[error("parquet error: {reason}")]
    Parquet {
        /// Description of the underlying Parquet failure.
        reason: String,
    },

    /// Wraps an error from climet-array.
    #[error(transparent)]
    Array(#[from] climet_array::ArrayError),

    /// Returned when a variable cannot be represented in the target format.
    #[error("variable '{name}' unsupported: {reason}")]
    UnsupportedVariable {
        /// Name of the variable.
        name: String,
        /// Why it cannot be handled.
        reason: String,
    },

    /// Returned when one or more validation checks fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },

    /// Wraps a filesystem error that is not specific to a format.
    #[error("i/o error: {reason}")]
    Filesystem {
        /// Description of the underlying failure.
        reason: String,
    },
}

impl From<netcdf::Error> for IoError {
    fn from(e: netcdf::Error) -> Self {
        IoError::Netcdf {
            reason: e.to_string(),
        }
    }
}

impl From<parquet::errors::ParquetError> for IoError {
    fn from(e: parquet::errors::ParquetError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}

impl From<arrow::error::ArrowError> for IoError {
    fn from(e: arrow::error::ArrowError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Filesystem {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use super::*;

    #[test]
    fn missing_file_names_path() {
        let err = IoError::FileNotFound {
            path: PathBuf::from("/data/era5/t2m_2001.nc"),
        };
        assert_eq!(err.to_string(), "file not found: /data/era5/t2m_2001.nc");
    }

    #[test]
    fn scalar_variable_message() {
        let err = IoError::UnsupportedVariable {
            name: "height".to_string(),
            reason: "zero-dimensional variables cannot be written".to_string(),
        };
        assert!(err.to_string().starts_with("variable 'height' unsupported"));
    }

    #[test]
    fn library_errors_keep_their_text() {
        let err = IoError::from(netcdf::Error::Str("NetCDF: Unknown file format".to_string()));
        assert_eq!(err.to_string(), "netcdf error: NetCDF: Unknown file format");

        let err = IoError::from(arrow::error::ArrowError::SchemaError("no column".to_string()));
        assert!(matches!(err, IoError::Parquet { ref reason } if reason.contains("no column")));

        let err = IoError::from(std::io::Error::new(ErrorKind::PermissionDenied, "read-only"));
        assert!(matches!(err, IoError::Filesystem { .. }));
    }

    #[test]
    fn array_error_stays_matchable() {
        let inner = climet_array::ArrayError::Combine {
            reason: "tiles do not form a hypercube".to_string(),
        };
        let err = IoError::from(inner.clone());
        assert_eq!(err.to_string(), inner.to_string());
        assert!(matches!(err, IoError::Array(ref e) if *e == inner));
    }
}
