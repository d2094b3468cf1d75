//! Labelled n-dimensional variable.

use std::collections::BTreeMap;

use ndarray::{ArrayD, ArrayViewD, Axis, IxDyn};

use crate::attrs::{AttrValue, Attributes};
use crate::error::ArrayError;
use crate::validate;

/// An n-dimensional `f64` array with named dimensions and attributes.
///
/// The rank of `data` always equals the number of dimension names, and
/// dimension names are unique within a variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    dims: Vec<String>,
    data: ArrayD<f64>,
    attrs: Attributes,
}

impl Variable {
    /// Creates a variable after checking rank and dimension-name uniqueness.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::Validation`] if the rank of `data` differs from
    /// the number of dimension names or a name is repeated.
    pub fn new<S: Into<String>>(
        dims: impl IntoIterator<Item = S>,
        data: ArrayD<f64>,
    ) -> Result<Self, ArrayError> {
        let dims: Vec<String> = dims.into_iter().map(Into::into).collect();

        validate::validate_dims(&dims, data.ndim()).finish()?;

        Ok(Self {
            dims,
            data,
            attrs: Attributes::new(),
        })
    }

    /// Creates a variable from flat values in C order.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::Shape`] if `values` does not fill `shape`, or
    /// any error from [`Variable::new`].
    pub fn from_vec<S: Into<String>>(
        dims: impl IntoIterator<Item = S>,
        shape: &[usize],
        values: Vec<f64>,
    ) -> Result<Self, ArrayError> {
        let data = ArrayD::from_shape_vec(IxDyn(shape), values)?;
        Self::new(dims, data)
    }

    /// Creates a 1-D index variable for dimension `dim`.
    pub fn index(dim: &str, values: Vec<f64>) -> Self {
        Self {
            dims: vec![dim.to_string()],
            data: ndarray::Array1::from(values).into_dyn(),
            attrs: Attributes::new(),
        }
    }

    /// Adds or replaces one attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Replaces the whole attribute map.
    pub fn with_attrs(mut self, attrs: Attributes) -> Self {
        self.attrs = attrs;
        self
    }

    /// Dimension names in axis order.
    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    /// Underlying array.
    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    /// Attribute map.
    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    /// Array shape in axis order.
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Position of `dim` among this variable's axes.
    pub fn axis_of(&self, dim: &str) -> Option<usize> {
        self.dims.iter().position(|d| d == dim)
    }

    /// Size of `dim`, if this variable spans it.
    pub fn size_of(&self, dim: &str) -> Option<usize> {
        self.axis_of(dim).map(|ax| self.data.shape()[ax])
    }

    /// Values in C order.
    pub fn values(&self) -> Vec<f64> {
        self.data.iter().copied().collect()
    }

    /// Consumes the variable and returns its array.
    pub fn into_data(self) -> ArrayD<f64> {
        self.data
    }

    /// Reorders axes to `order`, which must be a permutation of this
    /// variable's dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::Validation`] if `order` is not a permutation of
    /// the current dimensions.
    pub fn transpose_to(&self, order: &[String]) -> Result<Self, ArrayError> {
        if order == self.dims.as_slice() {
            return Ok(self.clone());
        }
        if order.len() != self.dims.len() {
            return Err(ArrayError::Validation {
                count: 1,
                details: format!("cannot transpose {:?} to {:?}", self.dims, order),
            });
        }
        let perm = order
            .iter()
            .map(|d| {
                self.axis_of(d).ok_or_else(|| ArrayError::Validation {
                    count: 1,
                    details: format!("cannot transpose {:?} to {:?}", self.dims, order),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let data = self
            .data
            .clone()
            .permuted_axes(perm.as_slice())
            .as_standard_layout()
            .into_owned();
        Ok(Self {
            dims: order.to_vec(),
            data,
            attrs: self.attrs.clone(),
        })
    }

    /// Broadcasts to `dims`, inserting missing dimensions with sizes taken
    /// from `sizes`.
    ///
    /// Every current dimension must appear in `dims`.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::DimensionMismatch`] if a size in `sizes`
    /// disagrees with the current shape, or [`ArrayError::Validation`] when
    /// a dimension is dropped or has no known size.
    pub fn broadcast_to(
        &self,
        dims: &[String],
        sizes: &BTreeMap<String, usize>,
    ) -> Result<Self, ArrayError> {
        if dims == self.dims.as_slice() {
            return Ok(self.clone());
        }
        if let Some(dropped) = self.dims.iter().find(|d| !dims.contains(d)) {
            return Err(ArrayError::Validation {
                count: 1,
                details: format!("broadcast target {dims:?} drops dimension '{dropped}'"),
            });
        }

        let mut target_shape = Vec::with_capacity(dims.len());
        for d in dims {
            let size = match (self.size_of(d), sizes.get(d)) {
                (Some(own), Some(&given)) if own != given => {
                    return Err(ArrayError::DimensionMismatch {
                        name: d.clone(),
                        expected: given,
                        got: own,
                    });
                }
                (Some(own), _) => own,
                (None, Some(&given)) => given,
                (None, None) => {
                    return Err(ArrayError::Validation {
                        count: 1,
                        details: format!("no size known for dimension '{d}'"),
                    });
                }
            };
            target_shape.push(size);
        }

        // Append length-1 axes for the new dimensions, then permute into place.
        let mut data = self.data.clone();
        let mut current = self.dims.clone();
        for d in dims {
            if !current.contains(d) {
                let nd = data.ndim();
                data = data.insert_axis(Axis(nd));
                current.push(d.clone());
            }
        }
        let perm: Vec<usize> = dims
            .iter()
            .filter_map(|d| current.iter().position(|c| c == d))
            .collect();
        let data = data.permuted_axes(perm.as_slice());

        let view = data
            .broadcast(target_shape.as_slice())
            .ok_or_else(|| ArrayError::Shape {
                reason: format!("cannot broadcast {:?} to {target_shape:?}", self.shape()),
            })?;

        Ok(Self {
            dims: dims.to_vec(),
            data: view.to_owned(),
            attrs: self.attrs.clone(),
        })
    }

    /// Reindexes along the dimensions in `maps`.
    ///
    /// Each map gives, for every position of the new axis, the position in
    /// the current axis to take the value from, or `None` to fill with NaN.
    pub fn reindex(&self, maps: &BTreeMap<String, Vec<Option<usize>>>) -> Self {
        let axis_maps: Vec<Option<&Vec<Option<usize>>>> =
            self.dims.iter().map(|d| maps.get(d)).collect();
        if axis_maps.iter().all(Option::is_none) {
            return self.clone();
        }

        let new_shape: Vec<usize> = axis_maps
            .iter()
            .zip(self.data.shape())
            .map(|(m, &n)| m.map_or(n, |m| m.len()))
            .collect();

        let mut out = ArrayD::from_elem(IxDyn(&new_shape), f64::NAN);
        let mut old_idx = vec![0usize; self.ndim()];
        for (idx, value) in out.indexed_iter_mut() {
            let mut present = true;
            for (ax, m) in axis_maps.iter().enumerate() {
                match m {
                    Some(m) => match m[idx[ax]] {
                        Some(pos) => old_idx[ax] = pos,
                        None => {
                            present = false;
                            break;
                        }
                    },
                    None => old_idx[ax] = idx[ax],
                }
            }
            if present {
                *value = self.data[old_idx.as_slice()];
            }
        }

        Self {
            dims: self.dims.clone(),
            data: out,
            attrs: self.attrs.clone(),
        }
    }

    /// Concatenates variables along `dim`, which every input must span.
    ///
    /// Inputs are transposed to the dimension order of the first one.
    /// Attributes of the first input are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::Empty`] for no inputs, or a shape error when the
    /// other dimensions disagree.
    pub fn concat(vars: &[Variable], dim: &str) -> Result<Self, ArrayError> {
        let first = vars.first().ok_or(ArrayError::Empty)?;
        let axis = first.axis_of(dim).ok_or_else(|| ArrayError::ConcatConflict {
            name: dim.to_string(),
            reason: format!("dimension '{dim}' missing from {:?}", first.dims),
        })?;

        let ordered = vars
            .iter()
            .map(|v| v.transpose_to(&first.dims))
            .collect::<Result<Vec<_>, _>>()?;
        let views: Vec<ArrayViewD<'_, f64>> = ordered.iter().map(|v| v.data.view()).collect();
        let data = ndarray::concatenate(Axis(axis), &views)?;

        Ok(Self {
            dims: first.dims.clone(),
            data,
            attrs: first.attrs.clone(),
        })
    }

    /// Returns `true` when dimensions, shape and values match, treating NaN
    /// as equal to NaN. Attributes are ignored.
    pub fn values_equal(&self, other: &Variable) -> bool {
        self.dims == other.dims
            && self.shape() == other.shape()
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| a == b || (a.is_nan() && b.is_nan()))
    }

    /// [`values_equal`](Self::values_equal) plus equal attributes.
    pub fn identical(&self, other: &Variable) -> bool {
        self.values_equal(other) && self.attrs == other.attrs
    }
}
