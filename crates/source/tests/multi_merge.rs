//! Integration test: a multi source must give the same dataset as running
//! the array engine's merge and concat directly on its children.

use std::path::PathBuf;

use approx::assert_abs_diff_eq;
use climet_array::{ArrayDataset, ArrayError, concat, merge};
use climet_io::open_multi_netcdf;
use climet_source::{
    DummyOptions, DummySource, Merger, MultiSource, Source, SourceError, load_dataset, load_source,
};
use tempfile::tempdir;

fn dummy(dims: &[&str], variables: &[&str]) -> DummyOptions {
    DummyOptions::default()
        .with_dims(dims.iter().copied())
        .with_variables(variables.iter().copied())
}

fn build(options: DummyOptions) -> DummySource {
    DummySource::new(options).expect("valid dummy options")
}

/// Every check a caller might use to compare two datasets.
fn assert_same_dataset(x: &ArrayDataset, y: &ArrayDataset) {
    assert!(x.broadcast_equals(y));
    assert!(x.equals(y));
    assert!(x.identical(y), "datasets differ:\n{x}\nvs\n{y}");
    assert_eq!(x.len(), y.len());
    assert_eq!(x.dims(), y.dims());
    assert_eq!(x.data_var_names(), y.data_var_names());
    assert_eq!(x.coords().len(), y.coords().len());
    for name in x.data_var_names() {
        let (xv, yv) = (&x.data_vars()[&name], &y.data_vars()[&name]);
        assert_eq!(xv.shape(), yv.shape());
        for (a, b) in xv.data().iter().zip(yv.data().iter()) {
            assert_abs_diff_eq!(*a, *b);
        }
    }
}

#[test]
fn merge_variables_on_shared_grid() {
    let tmp = tempdir().expect("create temp dir");
    let fn1: PathBuf = tmp.path().join("s1.netcdf");
    let fn2: PathBuf = tmp.path().join("s2.netcdf");

    let s1 = build(dummy(&["lat", "lon", "time"], &["a", "b"]));
    s1.save(&fn1).expect("save s1");
    let ds1 = s1.to_array_dataset().expect("s1 view");

    let s2 = build(dummy(&["lat", "lon", "time"], &["c", "d"]));
    s2.save(&fn2).expect("save s2");
    let ds2 = s2.to_array_dataset().expect("s2 view");

    let target = merge(&[ds1, ds2]).expect("direct merge");
    let multi = MultiSource::new(vec![Box::new(s1), Box::new(s2)]);
    assert!(multi.graph().starts_with("multi: 2 sources"));
    let merged = multi.to_array_dataset().expect("multi view");

    assert_same_dataset(&target, &merged);

    let from_files = open_multi_netcdf(&[fn1, fn2]).expect("open saved files");
    assert_same_dataset(&from_files, &merged);
}

#[test]
fn merge_variables_on_different_dimensions() {
    let s1 = build(dummy(&["lat", "lon"], &["a", "b"]));
    let s2 = build(dummy(&["lat", "time"], &["c", "d"]));
    let target = merge(&[
        s1.to_array_dataset().expect("s1 view"),
        s2.to_array_dataset().expect("s2 view"),
    ])
    .expect("direct merge");

    let merged = MultiSource::new(vec![Box::new(s1), Box::new(s2)])
        .to_array_dataset()
        .expect("multi view");

    assert_same_dataset(&target, &merged);
    assert_eq!(merged.get("a").expect("a").dims(), &["lat", "lon"]);
    assert_eq!(merged.get("c").expect("c").dims(), &["lat", "time"]);
}

fn lat_tiles(first: Vec<f64>, second: Vec<f64>) -> (DummySource, DummySource) {
    let s1 = build(dummy(&["lat", "lon"], &["a"]).with_coord_values("lat", first));
    let s2 = build(
        dummy(&["lat", "lon"], &["a"])
            .with_coord_values("lat", second)
            .with_seed(1),
    );
    (s1, s2)
}

fn concat_parity(first: Vec<f64>, second: Vec<f64>) {
    let (s1, s2) = lat_tiles(first, second);
    let target = concat(
        &[
            s1.to_array_dataset().expect("s1 view"),
            s2.to_array_dataset().expect("s2 view"),
        ],
        "lat",
    )
    .expect("direct concat");

    let multi = MultiSource::new(vec![Box::new(s1), Box::new(s2)])
        .with_merger(Merger::Concat { dim: "lat".into() });
    let merged = multi.to_array_dataset().expect("multi view");

    assert_same_dataset(&target, &merged);
}

#[test]
fn concat_interleaved_labels() {
    concat_parity(vec![1.0, 3.0], vec![2.0, 4.0]);
}

#[test]
fn concat_decreasing_then_increasing_labels() {
    concat_parity(vec![2.0, 1.0], vec![3.0, 4.0]);
}

#[test]
fn by_coords_rejects_interleaved_labels() {
    let (s1, s2) = lat_tiles(vec![1.0, 3.0], vec![2.0, 4.0]);
    let err = MultiSource::new(vec![Box::new(s1), Box::new(s2)])
        .to_array_dataset()
        .unwrap_err();
    assert!(
        matches!(err, SourceError::Array(ArrayError::NonMonotonic { ref dim, .. }) if dim == "lat"),
        "got {err:?}"
    );
}

#[test]
fn by_coords_rejects_mixed_directions() {
    let (s1, s2) = lat_tiles(vec![2.0, 1.0], vec![3.0, 4.0]);
    let err = MultiSource::new(vec![Box::new(s1), Box::new(s2)])
        .to_array_dataset()
        .unwrap_err();
    assert!(
        matches!(err, SourceError::Array(ArrayError::NonMonotonic { .. })),
        "got {err:?}"
    );
}

#[test]
fn concat_with_missing_dimension_rejected() {
    let s1 = build(dummy(&["lat", "lon"], &["a", "b"]).with_coord_values("lat", vec![1.0, 2.0]));
    let s2 = build(dummy(&["lat"], &["a", "b"]).with_coord_values("lat", vec![8.0, 9.0]));

    let direct = concat(
        &[
            s1.to_array_dataset().expect("s1 view"),
            s2.to_array_dataset().expect("s2 view"),
        ],
        "lat",
    );
    assert!(matches!(direct, Err(ArrayError::ConcatConflict { .. })));

    let err = MultiSource::new(vec![Box::new(s1), Box::new(s2)])
        .with_merger(Merger::Concat { dim: "lat".into() })
        .to_array_dataset()
        .unwrap_err();
    assert!(matches!(err, SourceError::Array(ArrayError::ConcatConflict { .. })));
}

#[test]
fn loaded_multi_matches_direct_merge() {
    let args: toml::Table = r#"
        [[sources]]
        name = "dummy-source"
        dims = ["lat", "lon", "time"]
        variables = ["a", "b"]

        [[sources]]
        name = "dummy_source"
        dims = ["lat", "lon", "time"]
        variables = ["c", "d"]
    "#
    .parse()
    .expect("valid toml");
    let multi = load_source("multi", &args).expect("load multi");

    let children: Vec<ArrayDataset> = multi
        .children()
        .iter()
        .map(|c| c.to_array_dataset().expect("child view"))
        .collect();
    let target = merge(&children).expect("direct merge");

    assert_same_dataset(&target, &multi.to_array_dataset().expect("multi view"));
    assert_eq!(multi.len().expect("len"), 4);
}

#[test]
fn netcdf_files_dataset_reads_directory() {
    let tmp = tempdir().expect("create temp dir");
    let (s1, s2) = lat_tiles(vec![10.0, 20.0], vec![-20.0, -10.0]);
    s1.save(&tmp.path().join("north.nc")).expect("save north");
    s2.save(&tmp.path().join("south.nc")).expect("save south");

    let mut args = toml::Table::new();
    args.insert(
        "paths".to_string(),
        toml::Value::Array(vec![toml::Value::String(
            tmp.path().display().to_string(),
        )]),
    );
    let dataset = load_dataset("netcdf-files", &args).expect("load dataset");
    assert_eq!(dataset.source().children().len(), 2);

    let ds = dataset.to_array_dataset().expect("dataset view");
    assert_eq!(ds.index("lat"), Some(vec![-20.0, -10.0, 10.0, 20.0]));
    assert_eq!(dataset.to_ndarray().expect("stacked").shape(), &[2, 2, 4]);

    let handle = dataset.to_netcdf_handle().expect("handle");
    assert_same_dataset(&handle.open().expect("reopen"), &ds);
}
