//! Attribute values attached to variables and datasets.

use std::collections::BTreeMap;
use std::fmt;

/// Ordered attribute map shared by variables and datasets.
pub type Attributes = BTreeMap<String, AttrValue>;

/// A single attribute value.
///
/// Mirrors the attribute kinds found in CF-style NetCDF files: text, a
/// scalar number, or a vector of numbers.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Text attribute such as `units` or `long_name`.
    Str(String),
    /// Scalar numeric attribute.
    F64(f64),
    /// Vector numeric attribute such as `valid_range`.
    F64s(Vec<f64>),
}

impl AttrValue {
    /// Returns the text value, if this is a [`AttrValue::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the scalar value, if this is a [`AttrValue::F64`].
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl From<Vec<f64>> for AttrValue {
    fn from(v: Vec<f64>) -> Self {
        Self::F64s(v)
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::F64s(v) => {
                let parts: Vec<String> = v.iter().map(|x| x.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}
