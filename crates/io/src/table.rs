//! Tabular view of a labelled dataset.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, RecordBatch};
use arrow::datatypes::{DataType, Field, Schema};
use climet_array::ArrayDataset;

use crate::error::IoError;

/// Flattens a dataset into one Arrow [`RecordBatch`].
///
/// There is one row per point of the full grid, in C order over the
/// dimensions sorted by name. The leading columns hold each dimension's
/// label (or position when it has no index), followed by non-index
/// coordinates and then data variables, each broadcast over the grid.
///
/// # Errors
///
/// Returns [`IoError::Array`] if a variable cannot be broadcast, or
/// [`IoError::Parquet`] if the batch cannot be assembled.
pub fn dataset_to_record_batch(ds: &ArrayDataset) -> Result<RecordBatch, IoError> {
    let sizes = ds.dims();
    let dims: Vec<String> = sizes.keys().cloned().collect();
    let shape: Vec<usize> = sizes.values().copied().collect();
    let n_rows: usize = shape.iter().product();

    let mut fields = Vec::new();
    let mut columns: Vec<ArrayRef> = Vec::new();

    for (k, dim) in dims.iter().enumerate() {
        let stride: usize = shape[k + 1..].iter().product();
        let labels = ds
            .index(dim)
            .unwrap_or_else(|| (0..shape[k]).map(|i| i as f64).collect());
        let column: Vec<f64> = (0..n_rows)
            .map(|row| labels[(row / stride) % shape[k]])
            .collect();
        fields.push(Field::new(dim, DataType::Float64, false));
        columns.push(Arc::new(Float64Array::from(column)));
    }

    let indexed = ds.indexed_dims();
    let extra_coords = ds
        .coords()
        .iter()
        .filter(|(name, _)| !indexed.contains(*name));
    for (name, var) in extra_coords.chain(ds.data_vars()) {
        let full = var.broadcast_to(&dims, &sizes)?;
        fields.push(Field::new(name, DataType::Float64, false));
        columns.push(Arc::new(Float64Array::from(full.values())));
    }

    let schema = Arc::new(Schema::new(fields));
    if columns.is_empty() {
        return Ok(RecordBatch::new_empty(schema));
    }
    Ok(RecordBatch::try_new(schema, columns)?)
}
