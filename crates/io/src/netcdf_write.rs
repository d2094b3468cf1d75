//! Low-level NetCDF writing helpers.

use climet_array::{AttrValue, Attributes, Variable};
use netcdf::AttributeValue;

use crate::error::IoError;

/// Convert an [`AttrValue`] into the NetCDF attribute representation.
pub(crate) fn attr_to_nc(value: &AttrValue) -> AttributeValue {
    match value {
        AttrValue::Str(s) => AttributeValue::Str(s.clone()),
        AttrValue::F64(v) => AttributeValue::Double(*v),
        AttrValue::F64s(v) => AttributeValue::Doubles(v.clone()),
    }
}

/// Define one `f64` variable over already-declared dimensions, attach its
/// attributes and write its values.
///
/// # Errors
///
/// Returns [`IoError::UnsupportedVariable`] for zero-dimensional variables
/// and [`IoError::Netcdf`] for library failures.
pub(crate) fn write_variable(
    file: &mut netcdf::FileMut,
    name: &str,
    var: &Variable,
    attrs: &Attributes,
) -> Result<(), IoError> {
    if var.ndim() == 0 {
        return Err(IoError::UnsupportedVariable {
            name: name.to_string(),
            reason: "zero-dimensional variables cannot be written".to_string(),
        });
    }

    let dims: Vec<&str> = var.dims().iter().map(String::as_str).collect();
    let mut nc_var = file.add_variable::<f64>(name, &dims)?;
    for (key, value) in attrs {
        nc_var.put_attribute(key, attr_to_nc(value))?;
    }
    nc_var.put_values(&var.values(), ..)?;
    Ok(())
}
