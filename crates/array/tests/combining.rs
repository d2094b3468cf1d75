//! Integration tests: merge, concat and combine-by-coords on small grids.

use approx::assert_abs_diff_eq;
use climet_array::{ArrayDataset, ArrayError, Variable, combine_by_coords, concat, merge};

/// Temperature-like field on a `lat` x `time` grid.
fn field(name: &str, lat: &[f64], time: &[f64], base: f64) -> ArrayDataset {
    let values = lat
        .iter()
        .flat_map(|&l| time.iter().map(move |&t| base + l * 10.0 + t))
        .collect();
    ArrayDataset::new()
        .with_coord("lat", lat.to_vec())
        .expect("lat coordinate")
        .with_coord_var(
            "time",
            Variable::index("time", time.to_vec()).with_attr("units", "days since 2000-01-01"),
        )
        .expect("time coordinate")
        .with_var(
            name,
            Variable::from_vec(["lat", "time"], &[lat.len(), time.len()], values)
                .expect("field values")
                .with_attr("units", "K"),
        )
        .expect("field variable")
        .with_attr("institution", "test")
}

#[test]
fn merge_keeps_variable_attributes() {
    let a = field("t2m", &[0.0, 1.0], &[0.0, 1.0], 273.0);
    let b = field("d2m", &[0.0, 1.0], &[0.0, 1.0], 260.0);
    let out = merge(&[a, b]).expect("merge succeeds");

    assert_eq!(out.data_var_names(), vec!["d2m", "t2m"]);
    let time = out.get("time").expect("time coordinate");
    assert_eq!(time.attrs().get("units").and_then(|v| v.as_str()), Some("days since 2000-01-01"));
    let t2m = out.get("t2m").expect("t2m");
    assert_abs_diff_eq!(t2m.values()[3], 273.0 + 10.0 + 1.0, epsilon = 1e-12);
}

#[test]
fn concat_then_combine_agree() {
    let early = field("t2m", &[0.0, 1.0], &[0.0, 1.0], 273.0);
    let late = field("t2m", &[0.0, 1.0], &[2.0, 3.0], 273.0);

    let concatenated = concat(&[early.clone(), late.clone()], "time").expect("concat succeeds");
    let combined = combine_by_coords(&[late, early]).expect("combine succeeds");

    assert!(combined.identical(&concatenated));
    assert_eq!(combined.index("time"), Some(vec![0.0, 1.0, 2.0, 3.0]));
    assert_eq!(combined.get("t2m").expect("t2m").shape(), &[2, 4]);
}

#[test]
fn combine_mixes_tiles_and_groups() {
    let t_low = field("t2m", &[0.0, 1.0], &[0.0], 273.0);
    let t_high = field("t2m", &[2.0, 3.0], &[0.0], 273.0);
    let d_all = field("d2m", &[0.0, 1.0, 2.0, 3.0], &[0.0], 260.0);

    let out = combine_by_coords(&[t_high.clone(), d_all.clone(), t_low.clone()])
        .expect("combine succeeds");
    let expected = merge(&[concat(&[t_low, t_high], "lat").expect("concat"), d_all])
        .expect("merge");

    assert!(out.identical(&expected));
    assert!(out.broadcast_equals(&expected));
}

#[test]
fn merge_conflict_is_reported() {
    let a = field("t2m", &[0.0], &[0.0], 273.0);
    let b = field("t2m", &[0.0], &[0.0], 274.0);
    let err = merge(&[a, b]).expect_err("values disagree");
    assert!(matches!(err, ArrayError::MergeConflict { .. }));
}
