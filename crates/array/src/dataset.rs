//! Labelled dataset: coordinates, data variables and attributes.

use std::collections::BTreeMap;
use std::fmt;

use crate::attrs::{AttrValue, Attributes};
use crate::error::ArrayError;
use crate::variable::Variable;

/// A collection of variables sharing named dimensions.
///
/// Coordinates and data variables live in separate maps; a name belongs to
/// at most one of them. A coordinate whose only dimension carries its own
/// name is the *index* of that dimension. Every dimension has exactly one
/// size across all variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayDataset {
    coords: BTreeMap<String, Variable>,
    data_vars: BTreeMap<String, Variable>,
    attrs: Attributes,
}

impl ArrayDataset {
    /// Creates an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an index coordinate for dimension `name`.
    ///
    /// # Errors
    ///
    /// See [`insert_coord`](Self::insert_coord).
    pub fn with_coord(self, name: &str, values: Vec<f64>) -> Result<Self, ArrayError> {
        self.with_coord_var(name, Variable::index(name, values))
    }

    /// Adds a coordinate variable.
    ///
    /// # Errors
    ///
    /// See [`insert_coord`](Self::insert_coord).
    pub fn with_coord_var(mut self, name: &str, var: Variable) -> Result<Self, ArrayError> {
        self.insert_coord(name, var)?;
        Ok(self)
    }

    /// Adds a data variable.
    ///
    /// # Errors
    ///
    /// See [`insert_var`](Self::insert_var).
    pub fn with_var(mut self, name: &str, var: Variable) -> Result<Self, ArrayError> {
        self.insert_var(name, var)?;
        Ok(self)
    }

    /// Adds or replaces one dataset attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Replaces the whole attribute map.
    pub fn with_attrs(mut self, attrs: Attributes) -> Self {
        self.attrs = attrs;
        self
    }

    /// Inserts or replaces a coordinate variable.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::Validation`] if `name` is already a data
    /// variable, or [`ArrayError::DimensionMismatch`] if the variable
    /// disagrees with an existing dimension size.
    pub fn insert_coord(&mut self, name: &str, var: Variable) -> Result<(), ArrayError> {
        if self.data_vars.contains_key(name) {
            return Err(ArrayError::Validation {
                count: 1,
                details: format!("'{name}' is already a data variable"),
            });
        }
        self.check_sizes(name, &var)?;
        self.coords.insert(name.to_string(), var);
        Ok(())
    }

    /// Inserts or replaces a data variable.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::Validation`] if `name` is already a coordinate,
    /// or [`ArrayError::DimensionMismatch`] if the variable disagrees with an
    /// existing dimension size.
    pub fn insert_var(&mut self, name: &str, var: Variable) -> Result<(), ArrayError> {
        if self.coords.contains_key(name) {
            return Err(ArrayError::Validation {
                count: 1,
                details: format!("'{name}' is already a coordinate"),
            });
        }
        self.check_sizes(name, &var)?;
        self.data_vars.insert(name.to_string(), var);
        Ok(())
    }

    fn check_sizes(&self, name: &str, var: &Variable) -> Result<(), ArrayError> {
        let dims = self.dims_excluding(name);
        for (d, &got) in var.dims().iter().zip(var.shape()) {
            if let Some(&expected) = dims.get(d)
                && expected != got
            {
                return Err(ArrayError::DimensionMismatch {
                    name: d.clone(),
                    expected,
                    got,
                });
            }
        }
        Ok(())
    }

    fn dims_excluding(&self, skip: &str) -> BTreeMap<String, usize> {
        let mut dims = BTreeMap::new();
        for (name, var) in self.coords.iter().chain(&self.data_vars) {
            if name == skip {
                continue;
            }
            for (d, &n) in var.dims().iter().zip(var.shape()) {
                dims.entry(d.clone()).or_insert(n);
            }
        }
        dims
    }

    /// Dimension names and sizes, sorted by name.
    pub fn dims(&self) -> BTreeMap<String, usize> {
        self.dims_excluding("")
    }

    /// Index labels of `dim`, if the dataset has an index coordinate for it.
    pub fn index(&self, dim: &str) -> Option<Vec<f64>> {
        self.coords
            .get(dim)
            .filter(|v| v.dims().len() == 1 && v.dims()[0] == dim)
            .map(Variable::values)
    }

    /// Names of dimensions that have an index coordinate.
    pub fn indexed_dims(&self) -> Vec<String> {
        self.coords
            .iter()
            .filter(|(name, v)| v.dims().len() == 1 && &v.dims()[0] == *name)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Looks up a data variable or coordinate by name.
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.data_vars.get(name).or_else(|| self.coords.get(name))
    }

    /// Coordinate map.
    pub fn coords(&self) -> &BTreeMap<String, Variable> {
        &self.coords
    }

    /// Data-variable map.
    pub fn data_vars(&self) -> &BTreeMap<String, Variable> {
        &self.data_vars
    }

    /// Dataset attributes.
    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    /// Data-variable names in sorted order.
    pub fn data_var_names(&self) -> Vec<String> {
        self.data_vars.keys().cloned().collect()
    }

    /// Coordinate names in sorted order.
    pub fn coord_names(&self) -> Vec<String> {
        self.coords.keys().cloned().collect()
    }

    /// Number of data variables.
    pub fn len(&self) -> usize {
        self.data_vars.len()
    }

    /// Returns `true` if the dataset has no data variables.
    pub fn is_empty(&self) -> bool {
        self.data_vars.is_empty()
    }

    /// Same variable names, dimensions and values. Attributes are ignored.
    pub fn equals(&self, other: &ArrayDataset) -> bool {
        maps_match(&self.coords, &other.coords, Variable::values_equal)
            && maps_match(&self.data_vars, &other.data_vars, Variable::values_equal)
    }

    /// [`equals`](Self::equals) plus identical variable and dataset
    /// attributes.
    pub fn identical(&self, other: &ArrayDataset) -> bool {
        self.attrs == other.attrs
            && maps_match(&self.coords, &other.coords, Variable::identical)
            && maps_match(&self.data_vars, &other.data_vars, Variable::identical)
    }

    /// Same variable names, with values equal once each pair is broadcast
    /// to the union of its dimensions.
    pub fn broadcast_equals(&self, other: &ArrayDataset) -> bool {
        let mut sizes = self.dims();
        for (d, n) in other.dims() {
            if sizes.get(&d).is_some_and(|&own| own != n) {
                return false;
            }
            sizes.insert(d, n);
        }
        let compare = |a: &Variable, b: &Variable| {
            let mut dims = a.dims().to_vec();
            for d in b.dims() {
                if !dims.contains(d) {
                    dims.push(d.clone());
                }
            }
            match (a.broadcast_to(&dims, &sizes), b.broadcast_to(&dims, &sizes)) {
                (Ok(x), Ok(y)) => x.values_equal(&y),
                _ => false,
            }
        };
        maps_match(&self.coords, &other.coords, compare)
            && maps_match(&self.data_vars, &other.data_vars, compare)
    }
}

fn maps_match(
    a: &BTreeMap<String, Variable>,
    b: &BTreeMap<String, Variable>,
    eq: impl Fn(&Variable, &Variable) -> bool,
) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .all(|(name, va)| b.get(name).is_some_and(|vb| eq(va, vb)))
}

fn preview(values: &[f64]) -> String {
    const SHOWN: usize = 4;
    let head: Vec<String> = values.iter().take(SHOWN).map(|v| v.to_string()).collect();
    if values.len() > SHOWN {
        format!("{} ...", head.join(" "))
    } else {
        head.join(" ")
    }
}

impl fmt::Display for ArrayDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<ArrayDataset>")?;
        let dims: Vec<String> = self
            .dims()
            .iter()
            .map(|(d, n)| format!("{d}: {n}"))
            .collect();
        writeln!(f, "Dimensions:  ({})", dims.join(", "))?;

        writeln!(f, "Coordinates:")?;
        for (name, var) in &self.coords {
            let marker = if var.dims() == [name.clone()] { "*" } else { " " };
            writeln!(
                f,
                "  {marker} {name:<10} ({}) {}",
                var.dims().join(", "),
                preview(&var.values())
            )?;
        }

        writeln!(f, "Data variables:")?;
        for (name, var) in &self.data_vars {
            writeln!(
                f,
                "    {name:<10} ({}) {}",
                var.dims().join(", "),
                preview(&var.values())
            )?;
        }

        if !self.attrs.is_empty() {
            writeln!(f, "Attributes:")?;
            for (name, value) in &self.attrs {
                writeln!(f, "    {name}: {value}")?;
            }
        }
        Ok(())
    }
}
