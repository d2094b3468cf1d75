//! Merge several datasets into one.

use std::collections::BTreeMap;

use ndarray::Zip;
use tracing::{debug, info};

use crate::align::align_outer;
use crate::dataset::ArrayDataset;
use crate::error::ArrayError;
use crate::variable::Variable;

/// Merges datasets into one, taking the union of their variables.
///
/// Inputs are first aligned with an outer join. Variables that share a name
/// are broadcast against each other and combined value by value: a NaN on
/// one side takes the other side's value, while two different non-NaN values
/// are a conflict. Attributes of the first occurrence win, both for
/// variables and for the dataset itself.
///
/// An empty input yields an empty dataset.
///
/// # Errors
///
/// Returns [`ArrayError::MergeConflict`] on conflicting values or when a
/// name is a coordinate in one input and a data variable in another, and
/// [`ArrayError::AlignmentConflict`] when the inputs cannot be aligned.
pub fn merge(datasets: &[ArrayDataset]) -> Result<ArrayDataset, ArrayError> {
    let Some(first) = datasets.first() else {
        return Ok(ArrayDataset::new());
    };
    info!(n_inputs = datasets.len(), "merging datasets");

    let aligned = align_outer(datasets, &[])?;

    let mut coords: BTreeMap<String, Variable> = BTreeMap::new();
    let mut data_vars: BTreeMap<String, Variable> = BTreeMap::new();

    for ds in &aligned {
        for (name, var) in ds.coords() {
            if data_vars.contains_key(name) {
                return Err(role_conflict(name));
            }
            merge_into(&mut coords, name, var)?;
        }
        for (name, var) in ds.data_vars() {
            if coords.contains_key(name) {
                return Err(role_conflict(name));
            }
            merge_into(&mut data_vars, name, var)?;
        }
    }

    let mut out = ArrayDataset::new().with_attrs(first.attrs().clone());
    for (name, var) in coords {
        out.insert_coord(&name, var)?;
    }
    for (name, var) in data_vars {
        out.insert_var(&name, var)?;
    }
    debug!(
        n_coords = out.coords().len(),
        n_vars = out.len(),
        "merge complete"
    );
    Ok(out)
}

fn role_conflict(name: &str) -> ArrayError {
    ArrayError::MergeConflict {
        name: name.to_string(),
        reason: "used both as coordinate and as data variable".to_string(),
    }
}

fn merge_into(
    target: &mut BTreeMap<String, Variable>,
    name: &str,
    incoming: &Variable,
) -> Result<(), ArrayError> {
    let merged = match target.get(name) {
        None => incoming.clone(),
        Some(existing) => combine_no_conflicts(name, existing, incoming)?,
    };
    target.insert(name.to_string(), merged);
    Ok(())
}

/// Combines two same-named variables, filling NaNs from either side.
fn combine_no_conflicts(
    name: &str,
    existing: &Variable,
    incoming: &Variable,
) -> Result<Variable, ArrayError> {
    let mut dims = existing.dims().to_vec();
    for d in incoming.dims() {
        if !dims.contains(d) {
            dims.push(d.clone());
        }
    }
    let mut sizes = BTreeMap::new();
    for var in [existing, incoming] {
        for (d, &n) in var.dims().iter().zip(var.shape()) {
            if let Some(&prev) = sizes.get(d)
                && prev != n
            {
                return Err(ArrayError::MergeConflict {
                    name: name.to_string(),
                    reason: format!("dimension '{d}' has sizes {prev} and {n}"),
                });
            }
            sizes.insert(d.clone(), n);
        }
    }

    let left = existing.broadcast_to(&dims, &sizes)?;
    let right = incoming.broadcast_to(&dims, &sizes)?;

    let mut conflicts = 0usize;
    let mut data = left.data().clone();
    Zip::from(&mut data).and(right.data()).for_each(|l, &r| {
        if l.is_nan() {
            *l = r;
        } else if !r.is_nan() && *l != r {
            conflicts += 1;
        }
    });
    if conflicts > 0 {
        return Err(ArrayError::MergeConflict {
            name: name.to_string(),
            reason: format!("{conflicts} element(s) differ"),
        });
    }

    Variable::new(dims, data).map(|v| v.with_attrs(existing.attrs().clone()))
}
