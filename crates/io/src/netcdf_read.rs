//! Low-level NetCDF extraction helpers.

use std::path::Path;

use climet_array::{AttrValue, Attributes, Variable};
use ndarray::{ArrayD, IxDyn};
use netcdf::AttributeValue;
use tracing::debug;

use crate::error::IoError;

/// Open a NetCDF file at `path`, returning [`IoError::FileNotFound`] if the
/// path does not exist on disk.
pub(crate) fn open_file(path: &Path) -> Result<netcdf::File, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(netcdf::open(path)?)
}

/// Convert a NetCDF attribute into an [`AttrValue`].
///
/// Integer and single-precision values are widened to `f64`. Kinds without
/// a counterpart (unsigned 64-bit, string arrays) yield `None`.
pub(crate) fn attr_from_nc(value: AttributeValue) -> Option<AttrValue> {
    Some(match value {
        AttributeValue::Str(s) => AttrValue::Str(s),
        AttributeValue::Double(v) => AttrValue::F64(v),
        AttributeValue::Doubles(v) => AttrValue::F64s(v),
        AttributeValue::Float(v) => AttrValue::F64(f64::from(v)),
        AttributeValue::Floats(v) => AttrValue::F64s(v.into_iter().map(f64::from).collect()),
        AttributeValue::Int(v) => AttrValue::F64(f64::from(v)),
        AttributeValue::Ints(v) => AttrValue::F64s(v.into_iter().map(f64::from).collect()),
        AttributeValue::Short(v) => AttrValue::F64(f64::from(v)),
        AttributeValue::Shorts(v) => AttrValue::F64s(v.into_iter().map(f64::from).collect()),
        AttributeValue::Schar(v) => AttrValue::F64(f64::from(v)),
        AttributeValue::Uchar(v) => AttrValue::F64(f64::from(v)),
        _ => return None,
    })
}

/// Collect attributes into an ordered map, skipping kinds that
/// [`attr_from_nc`] cannot represent.
pub(crate) fn read_attributes<'a>(
    attrs: impl Iterator<Item = netcdf::Attribute<'a>>,
) -> Result<Attributes, IoError> {
    let mut out = Attributes::new();
    for attr in attrs {
        let name = attr.name().to_string();
        match attr_from_nc(attr.value()?) {
            Some(value) => {
                out.insert(name, value);
            }
            None => debug!(attribute = %name, "skipping attribute of unsupported type"),
        }
    }
    Ok(out)
}

/// Read a whole variable as `f64`, with its dimensions and attributes.
pub(crate) fn read_variable(var: &netcdf::Variable<'_>) -> Result<Variable, IoError> {
    let name = var.name();
    let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
    let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();

    let values = var
        .get_values::<f64, _>(..)
        .map_err(|e| IoError::UnsupportedVariable {
            name: name.clone(),
            reason: format!("cannot read as f64: {e}"),
        })?;
    let data = ArrayD::from_shape_vec(IxDyn(&shape), values).map_err(|e| {
        IoError::UnsupportedVariable {
            name: name.clone(),
            reason: e.to_string(),
        }
    })?;

    let attrs = read_attributes(var.attributes())?;
    Ok(Variable::new(dims, data)?.with_attrs(attrs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_missing_file() {
        let err = open_file(Path::new("/tmp/climet_missing_file.nc")).unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }

    #[test]
    fn attr_widening() {
        assert_eq!(
            attr_from_nc(AttributeValue::Str("K".into())),
            Some(AttrValue::Str("K".into()))
        );
        assert_eq!(
            attr_from_nc(AttributeValue::Float(0.5)),
            Some(AttrValue::F64(0.5))
        );
        assert_eq!(
            attr_from_nc(AttributeValue::Ints(vec![1, 2])),
            Some(AttrValue::F64s(vec![1.0, 2.0]))
        );
        assert_eq!(attr_from_nc(AttributeValue::Ulonglong(7)), None);
    }
}
