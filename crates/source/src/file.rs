//! A source backed by one NetCDF file on disk.

use std::path::{Path, PathBuf};

use climet_array::ArrayDataset;
use climet_io::read_netcdf;
use serde::Deserialize;

use crate::error::SourceError;
use crate::source::Source;

/// Plugin name of [`FileSource`].
pub(crate) const NAME: &str = "file";

/// Arguments of the `file` plugin.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileOptions {
    /// Path of the NetCDF file.
    pub path: PathBuf,
}

/// Reads a NetCDF file each time its array view is requested.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Creates a source for `path`. The file is not opened until used.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Source for FileSource {
    fn name(&self) -> &str {
        NAME
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn to_array_dataset(&self) -> Result<ArrayDataset, SourceError> {
        Ok(read_netcdf(&self.path)?)
    }
}
