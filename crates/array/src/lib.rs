//! # climet-array
//!
//! Labelled n-dimensional arrays for gridded weather data. A [`Variable`]
//! names the axes of an `ndarray` array; an [`ArrayDataset`] groups
//! variables that share dimensions, with index coordinates labelling them.
//!
//! Several datasets combine with [`merge`] (union of variables over an
//! outer-joined grid), [`concat`] (stacking along one dimension) or
//! [`combine_by_coords`] (which picks between the two from the labels).

mod align;
mod attrs;
mod combine;
mod concat;
mod dataset;
mod error;
mod index;
mod merge;
mod validate;
mod variable;

pub use align::align_outer;
pub use attrs::{AttrValue, Attributes};
pub use combine::combine_by_coords;
pub use concat::concat;
pub use dataset::ArrayDataset;
pub use error::ArrayError;
pub use index::{Monotonic, monotonic};
pub use merge::merge;
pub use variable::Variable;
