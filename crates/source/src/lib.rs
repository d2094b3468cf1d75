//! # climet-source
//!
//! Plugin-style loading of gridded data. A [`Source`] yields a labelled
//! [`ArrayDataset`](climet_array::ArrayDataset) and derives fields, arrays,
//! tables and NetCDF handles from it. Sources are created by name through
//! [`load_source`]; a [`MultiSource`] combines several of them with the
//! same semantics as the array engine's merge, concat and combine
//! operations. [`Dataset`] is a thin named facade over one source, loaded
//! with [`load_dataset`].
//!
//! ```no_run
//! use climet_source::load_source;
//!
//! let args: toml::Table = r#"
//!     [[sources]]
//!     name = "dummy-source"
//!     variables = ["a", "b"]
//!
//!     [[sources]]
//!     name = "dummy-source"
//!     variables = ["c", "d"]
//! "#
//! .parse()?;
//! let multi = load_source("multi", &args)?;
//! println!("{}", multi.graph());
//! let merged = multi.to_array_dataset()?;
//! assert_eq!(merged.len(), 4);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod dataset;
mod dummy;
mod error;
mod file;
mod multi;
mod registry;
mod source;

pub use dataset::{Dataset, DatasetFactory, DatasetRegistry, load_dataset};
pub use dummy::{DummyOptions, DummySource};
pub use error::SourceError;
pub use file::{FileOptions, FileSource};
pub use multi::{Merger, MultiSource};
pub use registry::{SourceFactory, SourceRegistry, load_source};
pub use source::{Field, Source};
