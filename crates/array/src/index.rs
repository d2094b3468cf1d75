//! Helpers for 1-D coordinate labels.

use std::collections::HashMap;

/// Direction of a monotonic index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Monotonic {
    /// Non-decreasing labels.
    Increasing,
    /// Non-increasing labels.
    Decreasing,
}

/// Classifies `labels` as increasing, decreasing or neither.
///
/// Empty and single-label indexes count as increasing. Equal neighbours are
/// allowed in both directions, so a constant index is increasing.
pub fn monotonic(labels: &[f64]) -> Option<Monotonic> {
    let increasing = labels.windows(2).all(|w| w[0] <= w[1]);
    if increasing {
        return Some(Monotonic::Increasing);
    }
    let decreasing = labels.windows(2).all(|w| w[0] >= w[1]);
    decreasing.then_some(Monotonic::Decreasing)
}

/// Returns `true` when both indexes hold the same labels in the same order.
pub(crate) fn same_labels(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| x == y || (x.is_nan() && y.is_nan()))
}

/// Folds `-0.0` onto `0.0` so both name the same label.
fn canonical(v: f64) -> f64 {
    v + 0.0
}

/// Returns `true` when no label appears twice.
pub(crate) fn is_unique(labels: &[f64]) -> bool {
    let mut sorted: Vec<f64> = labels.iter().copied().map(canonical).collect();
    sorted.sort_by(f64::total_cmp);
    sorted.windows(2).all(|w| w[0].total_cmp(&w[1]).is_ne())
}

/// Outer join of several indexes.
///
/// When every index is identical the first is returned unchanged;
/// otherwise the result is the sorted, de-duplicated union of all labels.
pub(crate) fn union(indexes: &[&[f64]]) -> Vec<f64> {
    let Some(first) = indexes.first() else {
        return Vec::new();
    };
    if indexes.iter().all(|ix| same_labels(first, ix)) {
        return first.to_vec();
    }

    let mut all: Vec<f64> = indexes
        .iter()
        .flat_map(|ix| ix.iter().copied().map(canonical))
        .collect();
    all.sort_by(f64::total_cmp);
    all.dedup_by(|a, b| a.total_cmp(b).is_eq());
    all
}

/// For every label in `target`, the position of that label in `source`.
pub(crate) fn positions(target: &[f64], source: &[f64]) -> Vec<Option<usize>> {
    let mut lookup: HashMap<u64, usize> = HashMap::with_capacity(source.len());
    for (i, v) in source.iter().enumerate() {
        lookup.entry(canonical(*v).to_bits()).or_insert(i);
    }
    target
        .iter()
        .map(|v| lookup.get(&canonical(*v).to_bits()).copied())
        .collect()
}

/// Dense rank of each value (0 for the smallest distinct value), or of the
/// largest when `descending`.
pub(crate) fn dense_rank(values: &[f64], descending: bool) -> Vec<usize> {
    let mut distinct: Vec<f64> = values.iter().copied().map(canonical).collect();
    distinct.sort_by(f64::total_cmp);
    distinct.dedup_by(|a, b| a.total_cmp(b).is_eq());
    if descending {
        distinct.reverse();
    }
    values
        .iter()
        .map(|v| {
            distinct
                .iter()
                .position(|d| d.total_cmp(&canonical(*v)).is_eq())
                .unwrap_or(0)
        })
        .collect()
}
