//! Synthetic gridded data with reproducible values.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use climet_array::{ArrayDataset, Variable};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing::debug;

use crate::error::SourceError;
use crate::source::Source;

/// Plugin name of [`DummySource`].
pub(crate) const NAME: &str = "dummy-source";

/// Options of the dummy source, as read from plugin arguments.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DummyOptions {
    /// File format being emulated. Only `netcdf` is supported.
    #[serde(default = "default_kind")]
    pub kind: String,
    /// Dimension names, in axis order.
    #[serde(default = "default_dims")]
    pub dims: Vec<String>,
    /// Data variable names.
    #[serde(default = "default_variables")]
    pub variables: Vec<String>,
    /// Explicit labels replacing the default ones of a dimension.
    #[serde(default)]
    pub coord_values: BTreeMap<String, Vec<f64>>,
    /// Seed of the value generator.
    #[serde(default)]
    pub seed: u64,
    /// Reference date of the `time` axis, `YYYY-MM-DD`.
    #[serde(default = "default_start_date")]
    pub start_date: String,
}

fn default_kind() -> String {
    "netcdf".to_string()
}

fn default_dims() -> Vec<String> {
    vec!["lat".to_string(), "lon".to_string()]
}

fn default_variables() -> Vec<String> {
    vec!["a".to_string()]
}

fn default_start_date() -> String {
    "2000-01-01".to_string()
}

impl Default for DummyOptions {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            dims: default_dims(),
            variables: default_variables(),
            coord_values: BTreeMap::new(),
            seed: 0,
            start_date: default_start_date(),
        }
    }
}

impl DummyOptions {
    /// Sets the dimension names.
    pub fn with_dims<S: Into<String>>(mut self, dims: impl IntoIterator<Item = S>) -> Self {
        self.dims = dims.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the data variable names.
    pub fn with_variables<S: Into<String>>(
        mut self,
        variables: impl IntoIterator<Item = S>,
    ) -> Self {
        self.variables = variables.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the labels of one dimension.
    pub fn with_coord_values(mut self, dim: &str, values: Vec<f64>) -> Self {
        self.coord_values.insert(dim.to_string(), values);
        self
    }

    /// Sets the generator seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the kind of file being emulated.
    pub fn with_kind(mut self, kind: &str) -> Self {
        self.kind = kind.to_string();
        self
    }

    /// Checks the options, reporting every problem at once.
    fn validate(&self) -> Result<NaiveDate, SourceError> {
        if self.kind != "netcdf" {
            return Err(SourceError::UnsupportedKind {
                kind: self.kind.clone(),
            });
        }

        let mut problems = Vec::new();
        let mut seen = BTreeSet::new();
        for dim in &self.dims {
            if !seen.insert(dim.as_str()) {
                problems.push(format!("duplicate dimension '{dim}'"));
            }
        }
        let mut seen_vars = BTreeSet::new();
        for var in &self.variables {
            if !seen_vars.insert(var.as_str()) {
                problems.push(format!("duplicate variable '{var}'"));
            }
            if seen.contains(var.as_str()) {
                problems.push(format!("variable '{var}' shadows a dimension"));
            }
        }
        for (dim, values) in &self.coord_values {
            if !seen.contains(dim.as_str()) {
                problems.push(format!("coord_values given for unknown dimension '{dim}'"));
            }
            if values.is_empty() {
                problems.push(format!("coord_values for '{dim}' is empty"));
            }
        }
        let start = NaiveDate::parse_from_str(&self.start_date, "%Y-%m-%d");
        if let Err(e) = &start {
            problems.push(format!("start_date '{}': {e}", self.start_date));
        }

        match start {
            Ok(date) if problems.is_empty() => Ok(date),
            _ => Err(SourceError::invalid(NAME, problems.join("; "))),
        }
    }
}

/// Default labels and attributes of a dimension.
fn default_axis(dim: &str, start: NaiveDate) -> Variable {
    match dim {
        "lat" => Variable::index(dim, vec![-90.0, -45.0, 0.0, 45.0, 90.0])
            .with_attr("units", "degrees_north")
            .with_attr("standard_name", "latitude"),
        "lon" => Variable::index(dim, vec![0.0, 90.0, 180.0, 270.0])
            .with_attr("units", "degrees_east")
            .with_attr("standard_name", "longitude"),
        "time" => Variable::index(dim, vec![0.0, 1.0, 2.0])
            .with_attr("units", format!("days since {}", start.format("%Y-%m-%d")))
            .with_attr("standard_name", "time"),
        "level" => Variable::index(dim, vec![1000.0, 850.0, 500.0])
            .with_attr("units", "hPa")
            .with_attr("standard_name", "air_pressure"),
        _ => Variable::index(dim, vec![0.0, 1.0, 2.0]),
    }
}

/// A source generating uniform random fields on a labelled grid.
///
/// The grid and the values are built once, at construction. Two sources with
/// the same options hold the same data.
#[derive(Debug, Clone)]
pub struct DummySource {
    options: DummyOptions,
    dataset: ArrayDataset,
}

impl DummySource {
    /// Builds the grid and draws the values.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::UnsupportedKind`] for a kind other than
    /// `netcdf` and [`SourceError::InvalidArguments`] for inconsistent
    /// options.
    pub fn new(options: DummyOptions) -> Result<Self, SourceError> {
        let start = options.validate()?;

        let mut ds = ArrayDataset::new().with_attr("title", "climet dummy data");
        let mut shape = Vec::with_capacity(options.dims.len());
        for dim in &options.dims {
            let mut axis = default_axis(dim, start);
            if let Some(values) = options.coord_values.get(dim) {
                axis = Variable::index(dim, values.clone()).with_attrs(axis.attrs().clone());
            }
            shape.push(axis.shape()[0]);
            ds.insert_coord(dim, axis)?;
        }

        let size: usize = shape.iter().product();
        let mut rng = StdRng::seed_from_u64(options.seed);
        for name in &options.variables {
            let values: Vec<f64> = (0..size).map(|_| rng.random::<f64>()).collect();
            let var = Variable::from_vec(options.dims.iter().map(String::as_str), &shape, values)?
                .with_attr("long_name", format!("dummy field {name}"));
            ds.insert_var(name, var)?;
        }

        debug!(
            dims = ?options.dims,
            variables = ?options.variables,
            seed = options.seed,
            "generated dummy data"
        );
        Ok(Self {
            options,
            dataset: ds,
        })
    }

    /// Options the source was built from.
    pub fn options(&self) -> &DummyOptions {
        &self.options
    }
}

impl Source for DummySource {
    fn name(&self) -> &str {
        NAME
    }

    fn describe(&self) -> String {
        format!(
            "{} [{}] over ({})",
            self.options.kind,
            self.options.variables.join(", "),
            self.options.dims.join(", ")
        )
    }

    fn to_array_dataset(&self) -> Result<ArrayDataset, SourceError> {
        Ok(self.dataset.clone())
    }
}
