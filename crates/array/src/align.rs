//! Outer-join alignment of several datasets.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::dataset::ArrayDataset;
use crate::error::ArrayError;
use crate::index;
use crate::variable::Variable;

/// Aligns `datasets` on every dimension except those in `exclude`.
///
/// Indexed dimensions are joined with [`index::union`]; every variable along
/// a reindexed dimension gets NaN where its input had no label. A dataset
/// that carries a dimension without an index must already match the joined
/// length, and unindexed dimensions must agree in size everywhere. An index
/// with repeated labels can only take part when it needs no reindexing.
///
/// # Errors
///
/// Returns [`ArrayError::AlignmentConflict`] when sizes cannot be reconciled
/// or a non-unique index would have to be reindexed.
pub fn align_outer(
    datasets: &[ArrayDataset],
    exclude: &[&str],
) -> Result<Vec<ArrayDataset>, ArrayError> {
    let all_dims: BTreeSet<String> = datasets
        .iter()
        .flat_map(|ds| ds.dims().into_keys())
        .filter(|d| !exclude.contains(&d.as_str()))
        .collect();

    // Per dataset, the reindex maps to apply and the joined labels to install.
    let mut maps: Vec<BTreeMap<String, Vec<Option<usize>>>> = vec![BTreeMap::new(); datasets.len()];
    let mut joined_indexes: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for dim in &all_dims {
        let indexes: Vec<Option<Vec<f64>>> = datasets.iter().map(|ds| ds.index(dim)).collect();
        let present: Vec<&[f64]> = indexes.iter().flatten().map(Vec::as_slice).collect();

        if present.is_empty() {
            let sizes: BTreeSet<usize> = datasets
                .iter()
                .filter_map(|ds| ds.dims().get(dim).copied())
                .collect();
            if sizes.len() > 1 {
                return Err(ArrayError::AlignmentConflict {
                    dim: dim.clone(),
                    reason: format!("conflicting sizes {sizes:?} and no index to reindex with"),
                });
            }
            continue;
        }

        let joined = index::union(&present);

        for (i, ds) in datasets.iter().enumerate() {
            match &indexes[i] {
                Some(own) if !index::same_labels(own, &joined) => {
                    if !index::is_unique(own) {
                        return Err(ArrayError::AlignmentConflict {
                            dim: dim.clone(),
                            reason: format!(
                                "input {i} has repeated labels and cannot be reindexed"
                            ),
                        });
                    }
                    maps[i].insert(dim.clone(), index::positions(&joined, own));
                }
                Some(_) => {}
                None => {
                    if let Some(&n) = ds.dims().get(dim)
                        && n != joined.len()
                    {
                        return Err(ArrayError::AlignmentConflict {
                            dim: dim.clone(),
                            reason: format!(
                                "input {i} has size {n} without an index, joined index has {}",
                                joined.len()
                            ),
                        });
                    }
                }
            }
        }
        joined_indexes.insert(dim.clone(), joined);
    }

    datasets
        .iter()
        .zip(maps)
        .enumerate()
        .map(|(i, (ds, dim_maps))| {
            if dim_maps.is_empty() {
                return Ok(ds.clone());
            }
            debug!(
                input = i,
                dims = ?dim_maps.keys().collect::<Vec<_>>(),
                "reindexing for alignment"
            );
            reindex_dataset(ds, &dim_maps, &joined_indexes)
        })
        .collect()
}

fn reindex_dataset(
    ds: &ArrayDataset,
    maps: &BTreeMap<String, Vec<Option<usize>>>,
    joined: &BTreeMap<String, Vec<f64>>,
) -> Result<ArrayDataset, ArrayError> {
    let mut out = ArrayDataset::new().with_attrs(ds.attrs().clone());
    for (name, var) in ds.coords() {
        let var = match joined.get(name) {
            Some(labels) if maps.contains_key(name) && var.dims() == [name.clone()] => {
                Variable::index(name, labels.clone()).with_attrs(var.attrs().clone())
            }
            _ => var.reindex(maps),
        };
        out.insert_coord(name, var)?;
    }
    for (name, var) in ds.data_vars() {
        out.insert_var(name, var.reindex(maps))?;
    }
    Ok(out)
}
