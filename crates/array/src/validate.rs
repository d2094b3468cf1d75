//! Accumulated validation utilities.
//!
//! Provides [`ValidationCollector`] for gathering several problems into a
//! single [`ArrayError::Validation`].

use crate::error::ArrayError;

/// Accumulates validation errors and converts them into a single
/// [`ArrayError::Validation`].
pub(crate) struct ValidationCollector {
    errors: Vec<String>,
}

impl ValidationCollector {
    /// Create an empty collector.
    pub(crate) fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record one validation error.
    pub(crate) fn push(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Returns the number of recorded errors.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.errors.len()
    }

    /// Consume the collector and return `Ok(())` if no errors were recorded,
    /// or `Err(ArrayError::Validation { count, details })` otherwise.
    ///
    /// The `details` string joins all messages with `"; "`.
    pub(crate) fn finish(self) -> Result<(), ArrayError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ArrayError::Validation {
                count: self.errors.len(),
                details: self.errors.join("; "),
            })
        }
    }
}

/// Check that a variable's dimension names fit an array of rank `ndim` and
/// are unique.
pub(crate) fn validate_dims(dims: &[String], ndim: usize) -> ValidationCollector {
    let mut c = ValidationCollector::new();

    if dims.len() != ndim {
        c.push(format!(
            "{} dimension name(s) for an array of rank {ndim}",
            dims.len()
        ));
    }
    for (i, d) in dims.iter().enumerate() {
        if dims[..i].contains(d) {
            c.push(format!("dimension '{d}' repeated"));
        }
    }

    c
}
