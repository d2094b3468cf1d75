//! Combine datasets by inspecting their coordinates.
//!
//! Inputs holding the same data variables are tiles of one larger dataset;
//! their index labels decide where each tile goes. Tiles are concatenated
//! into one dataset per variable set, and those are merged.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::concat::concat;
use crate::dataset::ArrayDataset;
use crate::error::ArrayError;
use crate::index::{self, Monotonic};
use crate::merge::merge;

/// Combines datasets by grouping on data-variable names, concatenating each
/// group along the dimensions whose indexes differ, and merging the groups.
///
/// Within a group every differing index must be monotonic in one shared
/// direction; tiles are ordered by the dense rank of their first label and
/// must form a complete hypercube. The concatenated index must be monotonic
/// as well. A single input is returned unchanged and no input yields an
/// empty dataset.
///
/// # Errors
///
/// - [`ArrayError::NonMonotonic`] when an input index or the resulting
///   global index is not monotonic.
/// - [`ArrayError::Combine`] when a group cannot be ordered, a dimension
///   lacks an index in some tile, or the tiles do not form a hypercube.
/// - Any error from [`concat`] or [`merge`].
pub fn combine_by_coords(datasets: &[ArrayDataset]) -> Result<ArrayDataset, ArrayError> {
    match datasets {
        [] => return Ok(ArrayDataset::new()),
        [single] => return Ok(single.clone()),
        _ => {}
    }
    info!(n_inputs = datasets.len(), "combining datasets by coordinates");

    // Groups keep the order in which their variable set first appears.
    let mut groups: Vec<(Vec<String>, Vec<&ArrayDataset>)> = Vec::new();
    for ds in datasets {
        let key = ds.data_var_names();
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(ds),
            None => groups.push((key, vec![ds])),
        }
    }

    let combined = groups
        .iter()
        .map(|(key, members)| {
            debug!(variables = ?key, n_tiles = members.len(), "combining group");
            combine_group(members)
        })
        .collect::<Result<Vec<_>, _>>()?;

    merge(&combined)
}

fn combine_group(members: &[&ArrayDataset]) -> Result<ArrayDataset, ArrayError> {
    if let [single] = members {
        return Ok((*single).clone());
    }

    let (concat_dims, tile_ids) = infer_tile_ids(members)?;
    if concat_dims.is_empty() {
        return Err(ArrayError::Combine {
            reason: "could not find any dimension coordinates to use to order the datasets \
                     for concatenation"
                .to_string(),
        });
    }
    check_hypercube(&tile_ids)?;

    let mut tiles: Vec<(Vec<usize>, ArrayDataset)> = tile_ids
        .into_iter()
        .zip(members.iter().map(|&ds| ds.clone()))
        .collect();

    // Collapse one tile axis per concat dimension, first axis first.
    for dim in &concat_dims {
        tiles.sort_by(|(a, _), (b, _)| a[1..].cmp(&b[1..]).then(a[0].cmp(&b[0])));
        let mut next: Vec<(Vec<usize>, ArrayDataset)> = Vec::new();
        let mut start = 0;
        while start < tiles.len() {
            let rest = tiles[start].0[1..].to_vec();
            let end = tiles[start..]
                .iter()
                .position(|(id, _)| id[1..] != rest[..])
                .map_or(tiles.len(), |p| start + p);
            let row: Vec<ArrayDataset> = tiles[start..end]
                .iter()
                .map(|(_, ds)| ds.clone())
                .collect();
            next.push((rest, concat(&row, dim)?));
            start = end;
        }
        tiles = next;
    }

    let (_, combined) = tiles.pop().ok_or(ArrayError::Empty)?;
    for dim in &concat_dims {
        if let Some(labels) = combined.index(dim)
            && index::monotonic(&labels).is_none()
        {
            return Err(ArrayError::NonMonotonic {
                dim: dim.clone(),
                reason: "resulting object does not have monotonic global indexes".to_string(),
            });
        }
    }
    Ok(combined)
}

/// Finds the dimensions whose indexes differ across `members` and the
/// position of every member along each of them.
fn infer_tile_ids(members: &[&ArrayDataset]) -> Result<(Vec<String>, Vec<Vec<usize>>), ArrayError> {
    let first = members[0];
    let mut concat_dims = Vec::new();
    let mut tile_ids: Vec<Vec<usize>> = vec![Vec::new(); members.len()];

    for dim in first.indexed_dims() {
        let indexes = members
            .iter()
            .map(|ds| {
                ds.index(&dim).ok_or_else(|| ArrayError::Combine {
                    reason: format!(
                        "every dimension needs a coordinate for inferring concatenation \
                         order; '{dim}' has none in some inputs"
                    ),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if indexes.iter().all(|ix| ix == &indexes[0]) {
            continue;
        }

        let directions: BTreeSet<_> = indexes
            .iter()
            .map(|ix| index::monotonic(ix).map(|m| m == Monotonic::Decreasing))
            .collect();
        let descending = match directions.into_iter().collect::<Vec<_>>().as_slice() {
            [Some(desc)] => *desc,
            _ => {
                return Err(ArrayError::NonMonotonic {
                    dim,
                    reason: "neither monotonically increasing nor monotonically decreasing \
                             on all datasets"
                        .to_string(),
                });
            }
        };

        let firsts = indexes
            .iter()
            .map(|ix| {
                ix.first().copied().ok_or_else(|| ArrayError::Combine {
                    reason: format!("cannot order by empty index '{dim}'"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (id, rank) in tile_ids.iter_mut().zip(index::dense_rank(&firsts, descending)) {
            id.push(rank);
        }
        concat_dims.push(dim);
    }

    Ok((concat_dims, tile_ids))
}

fn check_hypercube(tile_ids: &[Vec<usize>]) -> Result<(), ArrayError> {
    let unique: BTreeSet<&Vec<usize>> = tile_ids.iter().collect();
    let axes = tile_ids.first().map_or(0, Vec::len);
    let expected: usize = (0..axes)
        .map(|ax| {
            tile_ids
                .iter()
                .map(|id| id[ax])
                .collect::<BTreeSet<_>>()
                .len()
        })
        .product();

    if unique.len() != tile_ids.len() || expected != tile_ids.len() {
        return Err(ArrayError::Combine {
            reason: format!(
                "the supplied objects do not form a hypercube: {} tile(s) for {expected} slot(s)",
                tile_ids.len()
            ),
        });
    }
    Ok(())
}
