//! High-level NetCDF reading.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use climet_array::{ArrayDataset, AttrValue, combine_by_coords};
use tracing::{debug, info};

use crate::error::IoError;
use crate::netcdf_read;

/// Variable attribute listing the non-index coordinates of a data variable.
pub(crate) const COORDINATES_ATTR: &str = "coordinates";

/// Read every variable of a NetCDF file into an [`ArrayDataset`].
///
/// A 1-D variable named after its dimension becomes an index coordinate.
/// Variables named in a data variable's `coordinates` attribute become
/// coordinates too; the attribute itself is dropped.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if `path` does not exist,
/// [`IoError::Netcdf`] on library failures and [`IoError::Array`] if the
/// file's variables are inconsistent.
pub fn read_netcdf(path: &Path) -> Result<ArrayDataset, IoError> {
    let file = netcdf_read::open_file(path)?;

    let mut coord_names: BTreeSet<String> = BTreeSet::new();
    let mut variables = Vec::new();
    for nc_var in file.variables() {
        let name = nc_var.name();
        let mut var = netcdf_read::read_variable(&nc_var)?;

        if let Some(AttrValue::Str(list)) = var.attrs().get(COORDINATES_ATTR) {
            coord_names.extend(list.split_whitespace().map(String::from));
            let mut attrs = var.attrs().clone();
            attrs.remove(COORDINATES_ATTR);
            var = var.with_attrs(attrs);
        }
        debug!(variable = %name, dims = ?var.dims(), "read variable");
        variables.push((name, var));
    }

    let mut ds = ArrayDataset::new().with_attrs(netcdf_read::read_attributes(file.attributes())?);
    for (name, var) in variables {
        let is_index = var.dims().len() == 1 && var.dims()[0] == name;
        if is_index || coord_names.contains(&name) {
            ds.insert_coord(&name, var)?;
        } else {
            ds.insert_var(&name, var)?;
        }
    }

    info!(
        path = %path.display(),
        n_vars = ds.len(),
        n_coords = ds.coords().len(),
        "read NetCDF dataset"
    );
    Ok(ds)
}

/// Read several NetCDF files and combine them by their coordinates.
///
/// Files holding different variables on a shared grid are merged; files
/// holding the same variables on adjacent coordinate ranges are
/// concatenated in label order. See [`combine_by_coords`].
///
/// # Errors
///
/// Returns any error from [`read_netcdf`], and [`IoError::Array`] when the
/// files cannot be combined.
pub fn open_multi_netcdf<P: AsRef<Path>>(paths: &[P]) -> Result<ArrayDataset, IoError> {
    let datasets = paths
        .iter()
        .map(|p| read_netcdf(p.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    info!(n_files = datasets.len(), "combining NetCDF files");
    Ok(combine_by_coords(&datasets)?)
}

/// Expand a list of paths, replacing directories by the `.nc` and
/// `.netcdf` files they contain, in name order.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] for a path that does not exist and
/// [`IoError::Filesystem`] if a directory cannot be listed.
pub fn expand_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PathBuf>, IoError> {
    let mut out = Vec::new();
    for p in paths {
        let p = p.as_ref();
        if p.is_dir() {
            let mut found: Vec<PathBuf> = std::fs::read_dir(p)?
                .map(|entry| entry.map(|e| e.path()))
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .filter(|f| {
                    f.extension()
                        .is_some_and(|ext| ext == "nc" || ext == "netcdf")
                })
                .collect();
            found.sort();
            out.extend(found);
        } else if p.exists() {
            out.push(p.to_path_buf());
        } else {
            return Err(IoError::FileNotFound {
                path: p.to_path_buf(),
            });
        }
    }
    Ok(out)
}
