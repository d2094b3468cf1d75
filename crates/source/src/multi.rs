//! A source combining the array views of several child sources.

use std::fmt;

use climet_array::{ArrayDataset, combine_by_coords, concat, merge};
use tracing::info;

use crate::error::SourceError;
use crate::source::{Field, Source};

/// Plugin name of [`MultiSource`].
pub(crate) const NAME: &str = "multi";

/// How a [`MultiSource`] combines its children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Merger {
    /// Decide from the coordinates: tiles holding the same variables are
    /// concatenated in label order, distinct variable sets are merged.
    #[default]
    ByCoords,
    /// Union of variables over the outer-joined grid.
    Merge,
    /// Concatenation along one dimension, in child order.
    Concat {
        /// Dimension to concatenate along.
        dim: String,
    },
}

impl Merger {
    /// Builds a merger from a strategy name and an optional dimension.
    ///
    /// Accepted names are `by-coords`, `merge` and `concat`; `concat`
    /// requires `dim`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidArguments`] for an unknown strategy or
    /// a missing or unexpected `dim`.
    pub fn from_parts(strategy: &str, dim: Option<&str>) -> Result<Self, SourceError> {
        let merger = match (strategy, dim) {
            ("by-coords" | "by_coords", None) => Merger::ByCoords,
            ("merge", None) => Merger::Merge,
            ("concat", Some(dim)) => Merger::Concat {
                dim: dim.to_string(),
            },
            ("concat", None) => {
                return Err(SourceError::invalid(NAME, "strategy 'concat' requires 'dim'"));
            }
            ("by-coords" | "by_coords" | "merge", Some(_)) => {
                return Err(SourceError::invalid(
                    NAME,
                    format!("'dim' is only valid with strategy 'concat', not '{strategy}'"),
                ));
            }
            (other, _) => {
                return Err(SourceError::invalid(
                    NAME,
                    format!("unknown strategy '{other}' (expected by-coords, merge or concat)"),
                ));
            }
        };
        Ok(merger)
    }

    /// Applies the merger to array views.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Array`] when the views cannot be combined.
    pub fn apply(&self, datasets: &[ArrayDataset]) -> Result<ArrayDataset, SourceError> {
        let combined = match self {
            Merger::ByCoords => combine_by_coords(datasets)?,
            Merger::Merge => merge(datasets)?,
            Merger::Concat { dim } => concat(datasets, dim)?,
        };
        Ok(combined)
    }
}

impl fmt::Display for Merger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Merger::ByCoords => f.write_str("by-coords"),
            Merger::Merge => f.write_str("merge"),
            Merger::Concat { dim } => write!(f, "concat along '{dim}'"),
        }
    }
}

/// A source whose data is the combination of its children's data.
#[derive(Debug, Default)]
pub struct MultiSource {
    sources: Vec<Box<dyn Source>>,
    merger: Merger,
}

impl MultiSource {
    /// Combines `sources` with the default [`Merger::ByCoords`].
    pub fn new(sources: Vec<Box<dyn Source>>) -> Self {
        Self {
            sources,
            merger: Merger::default(),
        }
    }

    /// Sets how the children are combined.
    pub fn with_merger(mut self, merger: Merger) -> Self {
        self.merger = merger;
        self
    }

    /// Appends a child source.
    pub fn push(&mut self, source: Box<dyn Source>) {
        self.sources.push(source);
    }

    /// The merger in use.
    pub fn merger(&self) -> &Merger {
        &self.merger
    }
}

impl Source for MultiSource {
    fn name(&self) -> &str {
        NAME
    }

    fn describe(&self) -> String {
        format!("{} sources, {}", self.sources.len(), self.merger)
    }

    fn to_array_dataset(&self) -> Result<ArrayDataset, SourceError> {
        let views = self
            .sources
            .iter()
            .map(|s| s.to_array_dataset())
            .collect::<Result<Vec<_>, _>>()?;
        info!(n_sources = views.len(), merger = %self.merger, "combining sources");
        self.merger.apply(&views)
    }

    fn children(&self) -> &[Box<dyn Source>] {
        &self.sources
    }

    /// Fields of every child, in child order.
    fn fields(&self) -> Result<Vec<Field>, SourceError> {
        let mut fields = Vec::new();
        for source in &self.sources {
            fields.extend(source.fields()?);
        }
        Ok(fields)
    }
}
