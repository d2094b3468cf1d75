//! The dataset facade and its plugin registry.

use std::collections::BTreeMap;
use std::path::PathBuf;

use arrow::array::RecordBatch;
use climet_array::ArrayDataset;
use climet_io::{NetcdfHandle, expand_paths};
use ndarray::ArrayD;
use serde::Deserialize;
use tracing::{debug, info};

use crate::dummy::{DummyOptions, DummySource};
use crate::error::SourceError;
use crate::file::FileSource;
use crate::multi::MultiSource;
use crate::registry::{normalise, parse_args};
use crate::source::{Field, Source};

/// A named dataset backed by one source.
///
/// Every method forwards to the source.
#[derive(Debug)]
pub struct Dataset {
    name: String,
    source: Box<dyn Source>,
}

impl Dataset {
    /// Wraps `source` under `name`.
    pub fn new(name: impl Into<String>, source: Box<dyn Source>) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }

    /// Dataset name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying source.
    pub fn source(&self) -> &dyn Source {
        self.source.as_ref()
    }

    /// Number of fields.
    ///
    /// # Errors
    ///
    /// Returns any error from the source.
    pub fn len(&self) -> Result<usize, SourceError> {
        self.source.len()
    }

    /// Whether the dataset has no fields.
    ///
    /// # Errors
    ///
    /// Returns any error from the source.
    pub fn is_empty(&self) -> Result<bool, SourceError> {
        self.source.is_empty()
    }

    /// Field at position `n`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::IndexOutOfRange`] past the last field.
    pub fn get(&self, n: usize) -> Result<Field, SourceError> {
        self.source.get(n)
    }

    /// Every field's values stacked along a new leading axis.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::ShapeMismatch`] when the fields differ in shape.
    pub fn to_ndarray(&self) -> Result<ArrayD<f64>, SourceError> {
        self.source.to_ndarray()
    }

    /// Labelled-array view.
    ///
    /// # Errors
    ///
    /// Returns any error from the source.
    pub fn to_array_dataset(&self) -> Result<ArrayDataset, SourceError> {
        self.source.to_array_dataset()
    }

    /// Flattened tabular view.
    ///
    /// # Errors
    ///
    /// Returns any error from the source or the Arrow conversion.
    pub fn to_table(&self) -> Result<RecordBatch, SourceError> {
        self.source.to_table()
    }

    /// Scratch NetCDF file for external tools.
    ///
    /// # Errors
    ///
    /// Returns any error from the source or the NetCDF writer.
    pub fn to_netcdf_handle(&self) -> Result<NetcdfHandle, SourceError> {
        self.source.to_netcdf_handle()
    }
}

/// Builds a dataset from plugin arguments.
pub type DatasetFactory = fn(&toml::Table) -> Result<Dataset, SourceError>;

/// A table of dataset plugins keyed by normalised name.
#[derive(Debug, Clone, Default)]
pub struct DatasetRegistry {
    factories: BTreeMap<String, (String, DatasetFactory)>,
}

impl DatasetRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding `dummy` and `netcdf-files`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("dummy", load_dummy);
        registry.register("netcdf-files", load_netcdf_files);
        registry
    }

    /// Registers `factory` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: &str, factory: DatasetFactory) {
        self.factories.insert(normalise(name), (name.to_string(), factory));
    }

    /// Registered plugin names.
    pub fn names(&self) -> Vec<&str> {
        self.factories.values().map(|(name, _)| name.as_str()).collect()
    }

    /// Loads the dataset plugin `name` with `args`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::UnknownDataset`] when no plugin answers to
    /// `name`, and any error raised by the plugin itself.
    pub fn load(&self, name: &str, args: &toml::Table) -> Result<Dataset, SourceError> {
        let (_, factory) = self
            .factories
            .get(&normalise(name))
            .ok_or_else(|| SourceError::UnknownDataset {
                name: name.to_string(),
            })?;
        debug!(dataset = name, "loading dataset");
        factory(args)
    }
}

/// Loads a builtin dataset plugin.
///
/// # Errors
///
/// See [`DatasetRegistry::load`].
pub fn load_dataset(name: &str, args: &toml::Table) -> Result<Dataset, SourceError> {
    DatasetRegistry::with_builtins().load(name, args)
}

fn load_dummy(args: &toml::Table) -> Result<Dataset, SourceError> {
    let options: DummyOptions = parse_args("dummy", args)?;
    Ok(Dataset::new("dummy", Box::new(DummySource::new(options)?)))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NetcdfFilesOptions {
    paths: Vec<PathBuf>,
}

fn load_netcdf_files(args: &toml::Table) -> Result<Dataset, SourceError> {
    let options: NetcdfFilesOptions = parse_args("netcdf-files", args)?;
    let paths = expand_paths(&options.paths)?;
    if paths.is_empty() {
        return Err(SourceError::invalid("netcdf-files", "no NetCDF files found"));
    }

    info!(n_files = paths.len(), "loading NetCDF files dataset");
    let children: Vec<Box<dyn Source>> = paths
        .into_iter()
        .map(|p| Box::new(FileSource::new(p)) as Box<dyn Source>)
        .collect();
    Ok(Dataset::new("netcdf-files", Box::new(MultiSource::new(children))))
}
