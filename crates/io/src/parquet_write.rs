//! Low-level Parquet writing.

use std::path::Path;

use arrow::array::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;

use crate::error::IoError;

/// Writes a sequence of [`RecordBatch`]es sharing one schema to a Parquet
/// file at `path`.
///
/// # Errors
///
/// Returns [`IoError::Validation`] when `batches` is empty, and
/// [`IoError::Parquet`] if file creation, batch writing, or file
/// finalisation fails.
pub(crate) fn write_batches(
    path: &Path,
    batches: &[RecordBatch],
    props: WriterProperties,
) -> Result<(), IoError> {
    let schema = batches
        .first()
        .map(RecordBatch::schema)
        .ok_or_else(|| IoError::Validation {
            count: 1,
            details: "no record batches to write".to_string(),
        })?;

    let file = std::fs::File::create(path).map_err(|e| IoError::Parquet {
        reason: e.to_string(),
    })?;
    let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;

    for batch in batches {
        writer.write(batch)?;
    }

    writer.close()?;
    Ok(())
}
