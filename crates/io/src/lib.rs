//! # climet-io
//!
//! Move labelled datasets between memory and files: NetCDF in both
//! directions, Parquet for the flattened tabular view, and scratch NetCDF
//! handles for external tools.

mod error;
mod handle;
mod netcdf_read;
mod netcdf_write;
mod parquet_write;
mod reader;
mod table;
mod writer;

pub use error::IoError;
pub use handle::NetcdfHandle;
pub use reader::{expand_paths, open_multi_netcdf, read_netcdf};
pub use table::dataset_to_record_batch;
pub use writer::{Compression, WriterConfig, write_netcdf, write_parquet};
