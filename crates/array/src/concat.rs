//! Concatenate datasets along one dimension.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use crate::align::align_outer;
use crate::dataset::ArrayDataset;
use crate::error::ArrayError;
use crate::variable::Variable;

/// Concatenates `datasets` along `dim`, in input order.
///
/// All other dimensions are aligned with an outer join first. Every data
/// variable is concatenated; one that lacks `dim` gains it, with length 1
/// when its input has no such dimension (which makes `dim` a new, unindexed
/// dimension when no input has it). The index of `dim` is concatenated as
/// is, without sorting. Coordinates that do not span `dim` are kept when
/// identical in every input and concatenated otherwise. Attributes come
/// from the first input.
///
/// # Errors
///
/// - [`ArrayError::Empty`] when `datasets` is empty.
/// - [`ArrayError::MissingVariable`] when a data variable is not present in
///   every input.
/// - [`ArrayError::ConcatConflict`] when a variable lacks a non-concat
///   dimension that other inputs carry, or an index of `dim` is present in
///   only some inputs.
pub fn concat(datasets: &[ArrayDataset], dim: &str) -> Result<ArrayDataset, ArrayError> {
    let first = datasets.first().ok_or(ArrayError::Empty)?;
    info!(n_inputs = datasets.len(), dim, "concatenating datasets");

    let aligned = align_outer(datasets, &[dim])?;

    let var_names: BTreeSet<String> = first.data_vars().keys().cloned().collect();
    for (position, ds) in aligned.iter().enumerate() {
        let names: BTreeSet<String> = ds.data_vars().keys().cloned().collect();
        if let Some(name) = var_names.symmetric_difference(&names).next() {
            let position = if names.contains(name) { 0 } else { position };
            return Err(ArrayError::MissingVariable {
                name: name.clone(),
                position,
            });
        }
    }

    let dim_lens: Vec<usize> = aligned
        .iter()
        .map(|ds| ds.dims().get(dim).copied().unwrap_or(1))
        .collect();

    let mut out = ArrayDataset::new().with_attrs(first.attrs().clone());

    // Coordinates first so that the index of `dim` is in place.
    let coord_names: BTreeSet<String> = aligned
        .iter()
        .flat_map(|ds| ds.coords().keys().cloned())
        .collect();
    for name in &coord_names {
        let present: Vec<&Variable> = aligned
            .iter()
            .filter_map(|ds| ds.coords().get(name))
            .collect();

        if name == dim {
            if present.len() != aligned.len() {
                return Err(ArrayError::ConcatConflict {
                    name: name.clone(),
                    reason: format!(
                        "index present in {} of {} inputs",
                        present.len(),
                        aligned.len()
                    ),
                });
            }
            out.insert_coord(name, Variable::concat(&owned(&present), dim)?)?;
            continue;
        }

        let spans_dim = present.iter().any(|v| v.axis_of(dim).is_some());
        let all_identical = present.len() == aligned.len()
            && present.iter().all(|v| v.values_equal(present[0]));
        if !spans_dim && all_identical {
            out.insert_coord(name, present[0].clone())?;
            continue;
        }
        if present.len() != aligned.len() {
            return Err(ArrayError::ConcatConflict {
                name: name.clone(),
                reason: "coordinate differs between inputs and is not present in all".to_string(),
            });
        }
        let var = concat_variable(name, &aligned, &dim_lens, dim, |ds| ds.coords().get(name))?;
        out.insert_coord(name, var)?;
    }

    for name in &var_names {
        debug!(variable = %name, dim, "concatenating variable");
        let var = concat_variable(name, &aligned, &dim_lens, dim, |ds| {
            ds.data_vars().get(name)
        })?;
        out.insert_var(name, var)?;
    }

    Ok(out)
}

fn owned(vars: &[&Variable]) -> Vec<Variable> {
    vars.iter().map(|&v| v.clone()).collect()
}

/// Brings one named variable of every input to common dimensions and
/// concatenates along `dim`.
fn concat_variable<'a>(
    name: &str,
    datasets: &'a [ArrayDataset],
    dim_lens: &[usize],
    dim: &str,
    lookup: impl Fn(&'a ArrayDataset) -> Option<&'a Variable>,
) -> Result<Variable, ArrayError> {
    let vars: Vec<&Variable> = datasets
        .iter()
        .enumerate()
        .map(|(position, ds)| {
            lookup(ds).ok_or_else(|| ArrayError::MissingVariable {
                name: name.to_string(),
                position,
            })
        })
        .collect::<Result<_, _>>()?;

    let mut common: Vec<String> = Vec::new();
    for var in &vars {
        for d in var.dims() {
            if !common.contains(d) {
                common.push(d.clone());
            }
        }
    }
    if !common.iter().any(|d| d == dim) {
        common.insert(0, dim.to_string());
    }

    let mut expanded = Vec::with_capacity(vars.len());
    for (position, (var, ds)) in vars.iter().zip(datasets).enumerate() {
        let ds_dims = ds.dims();
        let mut sizes: BTreeMap<String, usize> = BTreeMap::new();
        for d in &common {
            if d == dim {
                sizes.insert(d.clone(), dim_lens[position]);
            } else if let Some(&n) = ds_dims.get(d) {
                sizes.insert(d.clone(), n);
            } else {
                return Err(ArrayError::ConcatConflict {
                    name: name.to_string(),
                    reason: format!("input {position} has no dimension '{d}'"),
                });
            }
        }
        expanded.push(var.broadcast_to(&common, &sizes)?);
    }

    Variable::concat(&expanded, dim)
}
