//! Scratch NetCDF files handed to external tools.

use std::path::Path;

use climet_array::ArrayDataset;
use tempfile::TempDir;
use tracing::debug;

use crate::error::IoError;
use crate::reader::read_netcdf;
use crate::writer::write_netcdf;

/// File name used inside the scratch directory.
const FILE_NAME: &str = "dataset.nc";

/// A dataset written to a private scratch directory.
///
/// The path can be passed to any NetCDF-aware tool. The directory and the
/// file are removed when the handle is dropped.
#[derive(Debug)]
pub struct NetcdfHandle {
    dir: TempDir,
}

impl NetcdfHandle {
    /// Writes `ds` into a fresh scratch directory.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Filesystem`] if the directory cannot be created and
    /// any error from [`write_netcdf`].
    pub fn create(ds: &ArrayDataset) -> Result<Self, IoError> {
        let dir = tempfile::Builder::new().prefix("climet-").tempdir()?;
        write_netcdf(&dir.path().join(FILE_NAME), ds)?;
        debug!(path = %dir.path().display(), "created scratch NetCDF handle");
        Ok(Self { dir })
    }

    /// Path of the NetCDF file.
    pub fn path(&self) -> std::path::PathBuf {
        self.dir.path().join(FILE_NAME)
    }

    /// Scratch directory holding the file.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Reads the file back.
    ///
    /// # Errors
    ///
    /// Returns any error from [`read_netcdf`].
    pub fn open(&self) -> Result<ArrayDataset, IoError> {
        read_netcdf(&self.path())
    }
}
