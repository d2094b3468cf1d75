//! High-level NetCDF and Parquet writers.

use std::path::Path;

use climet_array::{ArrayDataset, AttrValue};
use parquet::file::properties::WriterProperties;
use tracing::info;

use crate::error::IoError;
use crate::netcdf_write;
use crate::parquet_write;
use crate::reader::COORDINATES_ATTR;
use crate::table::dataset_to_record_batch;

/// Write a dataset to a NetCDF file, replacing any existing file.
///
/// Dimensions, index coordinates, data variables and all attributes are
/// written. Non-index coordinates are listed in each data variable's
/// `coordinates` attribute so that [`read_netcdf`](crate::read_netcdf)
/// restores them as coordinates.
///
/// # Errors
///
/// Returns [`IoError::UnsupportedVariable`] for zero-dimensional variables
/// and [`IoError::Netcdf`] for library failures.
pub fn write_netcdf(path: &Path, ds: &ArrayDataset) -> Result<(), IoError> {
    let mut file = netcdf::create(path)?;

    for (name, size) in ds.dims() {
        file.add_dimension(&name, size)?;
    }
    for (name, value) in ds.attrs() {
        file.add_attribute(name, netcdf_write::attr_to_nc(value))?;
    }

    let indexed = ds.indexed_dims();
    let extra_coords: Vec<&str> = ds
        .coords()
        .keys()
        .filter(|name| !indexed.contains(*name))
        .map(String::as_str)
        .collect();

    for (name, var) in ds.coords() {
        netcdf_write::write_variable(&mut file, name, var, var.attrs())?;
    }
    for (name, var) in ds.data_vars() {
        let mut attrs = var.attrs().clone();
        if !extra_coords.is_empty() {
            attrs
                .entry(COORDINATES_ATTR.to_string())
                .or_insert_with(|| AttrValue::Str(extra_coords.join(" ")));
        }
        netcdf_write::write_variable(&mut file, name, var, &attrs)?;
    }

    info!(path = %path.display(), n_vars = ds.len(), "wrote NetCDF dataset");
    Ok(())
}

/// Parquet column codec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// Plain pages.
    None,
    /// Snappy, the Parquet default.
    #[default]
    Snappy,
    /// Zstandard at [`WriterConfig`]'s level.
    Zstd,
}

impl Compression {
    fn codec(self, zstd_level: i32) -> Result<parquet::basic::Compression, IoError> {
        use parquet::basic::{Compression as Codec, ZstdLevel};

        let codec = match self {
            Compression::None => Codec::UNCOMPRESSED,
            Compression::Snappy => Codec::SNAPPY,
            Compression::Zstd => Codec::ZSTD(ZstdLevel::try_new(zstd_level)?),
        };
        Ok(codec)
    }
}

/// Parquet export settings for [`write_parquet`].
#[derive(Debug, Clone, PartialEq)]
pub struct WriterConfig {
    compression: Compression,
    zstd_level: i32,
    row_group_size: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Snappy,
            zstd_level: 3,
            row_group_size: 1_000_000,
        }
    }
}

impl WriterConfig {
    /// Uses `compression` for every column.
    pub fn with_compression(self, compression: Compression) -> Self {
        Self {
            compression,
            ..self
        }
    }

    /// Sets the Zstandard level (1 to 22), used with [`Compression::Zstd`].
    pub fn with_zstd_level(self, zstd_level: i32) -> Self {
        Self { zstd_level, ..self }
    }

    /// Caps the number of rows per row group.
    pub fn with_row_group_size(self, row_group_size: usize) -> Self {
        Self {
            row_group_size,
            ..self
        }
    }

    /// Codec in use.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Rows per row group.
    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }

    fn check(&self) -> Result<(), IoError> {
        let mut problems = Vec::new();
        if self.row_group_size == 0 {
            problems.push("row_group_size must be at least 1".to_string());
        }
        if !(1..=22).contains(&self.zstd_level) {
            problems.push(format!("zstd_level {} outside 1..=22", self.zstd_level));
        }
        if problems.is_empty() {
            return Ok(());
        }
        Err(IoError::Validation {
            count: problems.len(),
            details: problems.join("; "),
        })
    }

    fn properties(&self) -> Result<WriterProperties, IoError> {
        self.check()?;
        Ok(WriterProperties::builder()
            .set_compression(self.compression.codec(self.zstd_level)?)
            .set_max_row_group_size(self.row_group_size)
            .build())
    }
}

/// Write the tabular view of a dataset to a Parquet file.
///
/// Columns follow [`dataset_to_record_batch`](crate::dataset_to_record_batch).
///
/// # Errors
///
/// [`IoError::Validation`] for a bad configuration, otherwise
/// [`IoError::Parquet`] when conversion or writing fails.
pub fn write_parquet(path: &Path, ds: &ArrayDataset, config: &WriterConfig) -> Result<(), IoError> {
    let props = config.properties()?;
    let batch = dataset_to_record_batch(ds)?;
    parquet_write::write_batches(path, &[batch], props)?;

    info!(
        path = %path.display(),
        rows = ds.dims().values().product::<usize>(),
        compression = ?config.compression,
        "wrote Parquet table"
    );
    Ok(())
}
