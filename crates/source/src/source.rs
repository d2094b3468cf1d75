//! The [`Source`] trait and the [`Field`] it yields.

use std::fmt;
use std::path::Path;

use arrow::array::RecordBatch;
use climet_array::{ArrayDataset, Variable};
use climet_io::{NetcdfHandle, dataset_to_record_batch, write_netcdf};
use ndarray::{ArrayD, ArrayViewD, Axis, IxDyn};
use tracing::info;

use crate::error::SourceError;

/// One named variable taken from a source.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    variable: Variable,
}

impl Field {
    /// Creates a field.
    pub fn new(name: impl Into<String>, variable: Variable) -> Self {
        Self {
            name: name.into(),
            variable,
        }
    }

    /// Variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The labelled variable.
    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    /// Dimension names of the values.
    pub fn dims(&self) -> &[String] {
        self.variable.dims()
    }

    /// Copy of the values as a plain array.
    pub fn to_ndarray(&self) -> ArrayD<f64> {
        self.variable.data().clone()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.variable.dims().join(", "))
    }
}

/// Stacks field values along a new leading axis. No fields give an empty
/// 1-D array.
///
/// # Errors
///
/// Returns [`SourceError::ShapeMismatch`] when the fields differ in shape.
pub(crate) fn stack_fields(fields: &[Field]) -> Result<ArrayD<f64>, SourceError> {
    let Some(first) = fields.first() else {
        return Ok(ArrayD::zeros(IxDyn(&[0])));
    };
    if let Some(other) = fields
        .iter()
        .find(|f| f.variable.shape() != first.variable.shape())
    {
        return Err(SourceError::ShapeMismatch {
            reason: format!(
                "field '{}' has shape {:?}, field '{}' has shape {:?}",
                first.name,
                first.variable.shape(),
                other.name,
                other.variable.shape()
            ),
        });
    }

    let views: Vec<ArrayViewD<'_, f64>> =
        fields.iter().map(|f| f.variable.data().view()).collect();
    ndarray::stack(Axis(0), &views).map_err(|e| SourceError::ShapeMismatch {
        reason: e.to_string(),
    })
}

/// A provider of labelled array data.
///
/// Implementors supply the array view; fields, indexing and the other
/// conversions derive from it. Composite sources expose their inputs
/// through [`children`](Source::children).
pub trait Source: fmt::Debug {
    /// Plugin name the source was loaded under.
    fn name(&self) -> &str;

    /// One-line description used by [`graph`](Source::graph).
    fn describe(&self) -> String;

    /// The labelled-array view of the source.
    ///
    /// # Errors
    ///
    /// Returns any error raised while reading or combining the data.
    fn to_array_dataset(&self) -> Result<ArrayDataset, SourceError>;

    /// Child sources, empty for leaf sources.
    fn children(&self) -> &[Box<dyn Source>] {
        &[]
    }

    /// One field per data variable, in name order.
    ///
    /// # Errors
    ///
    /// Returns any error from [`to_array_dataset`](Source::to_array_dataset).
    fn fields(&self) -> Result<Vec<Field>, SourceError> {
        let ds = self.to_array_dataset()?;
        Ok(ds
            .data_vars()
            .iter()
            .map(|(name, var)| Field::new(name.as_str(), var.clone()))
            .collect())
    }

    /// Number of fields.
    ///
    /// # Errors
    ///
    /// Returns any error from [`fields`](Source::fields).
    fn len(&self) -> Result<usize, SourceError> {
        Ok(self.fields()?.len())
    }

    /// Whether the source has no fields.
    ///
    /// # Errors
    ///
    /// Returns any error from [`fields`](Source::fields).
    fn is_empty(&self) -> Result<bool, SourceError> {
        Ok(self.len()? == 0)
    }

    /// Field at position `n`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::IndexOutOfRange`] past the last field.
    fn get(&self, n: usize) -> Result<Field, SourceError> {
        let mut fields = self.fields()?;
        let len = fields.len();
        if n >= len {
            return Err(SourceError::IndexOutOfRange { index: n, len });
        }
        Ok(fields.swap_remove(n))
    }

    /// Every field's values stacked along a new leading axis.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::ShapeMismatch`] when the fields differ in shape.
    fn to_ndarray(&self) -> Result<ArrayD<f64>, SourceError> {
        stack_fields(&self.fields()?)
    }

    /// Flattened tabular view, one row per grid point.
    ///
    /// # Errors
    ///
    /// Returns any error from the array view or the Arrow conversion.
    fn to_table(&self) -> Result<RecordBatch, SourceError> {
        Ok(dataset_to_record_batch(&self.to_array_dataset()?)?)
    }

    /// Writes the data to a scratch NetCDF file for external tools.
    ///
    /// # Errors
    ///
    /// Returns any error from the array view or the NetCDF writer.
    fn to_netcdf_handle(&self) -> Result<NetcdfHandle, SourceError> {
        Ok(NetcdfHandle::create(&self.to_array_dataset()?)?)
    }

    /// Saves the array view as a NetCDF file.
    ///
    /// # Errors
    ///
    /// Returns any error from the array view or the NetCDF writer.
    fn save(&self, path: &Path) -> Result<(), SourceError> {
        write_netcdf(path, &self.to_array_dataset()?)?;
        info!(source = self.name(), path = %path.display(), "saved source");
        Ok(())
    }

    /// Indented tree of this source and its children.
    fn graph(&self) -> String {
        let mut out = format!("{}: {}\n", self.name(), self.describe());
        for child in self.children() {
            for line in child.graph().lines() {
                out.push_str("  ");
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }
}
