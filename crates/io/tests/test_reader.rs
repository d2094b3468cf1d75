//! Integration test: NetCDF reading of hand-built files and missing paths.

use std::path::Path;

use climet_array::AttrValue;
use climet_io::{IoError, expand_paths, read_netcdf};
use tempfile::tempdir;

#[test]
fn read_netcdf_file_not_found() {
    let path = Path::new("/tmp/climet_test_nonexistent_file.nc");

    let err = read_netcdf(path).unwrap_err();
    assert!(
        matches!(err, IoError::FileNotFound { .. }),
        "expected FileNotFound, got {err:?}",
    );
}

/// File written directly through the netcdf crate, the way another tool
/// would produce it: float data, an integer attribute and a time axis.
#[test]
fn read_foreign_file() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("foreign.nc");
    {
        let mut file = netcdf::create(&path).expect("create file");
        file.add_dimension("time", 2).expect("add dim time");
        file.add_dimension("lat", 3).expect("add dim lat");
        file.add_attribute("Conventions", "CF-1.8")
            .expect("add global attribute");

        let mut var = file
            .add_variable::<f64>("time", &["time"])
            .expect("add time");
        var.put_values(&[0.0, 1.0], ..).expect("put time values");
        var.put_attribute("units", "days since 2000-01-01")
            .expect("time units");

        let mut var = file
            .add_variable::<f64>("lat", &["lat"])
            .expect("add lat");
        var.put_values(&[-10.0, 0.0, 10.0], ..).expect("put lat values");

        let mut var = file
            .add_variable::<f32>("t2m", &["time", "lat"])
            .expect("add t2m");
        var.put_attribute("scale", 2i32).expect("int attribute");
        var.put_values(&[1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0], ..)
            .expect("put t2m values");
    }

    let ds = read_netcdf(&path).expect("read succeeds");
    assert_eq!(ds.coord_names(), vec!["lat", "time"]);
    assert_eq!(ds.data_var_names(), vec!["t2m"]);
    assert_eq!(ds.index("lat"), Some(vec![-10.0, 0.0, 10.0]));
    assert_eq!(
        ds.attrs().get("Conventions"),
        Some(&AttrValue::Str("CF-1.8".into()))
    );

    let t2m = ds.get("t2m").expect("t2m present");
    assert_eq!(t2m.dims(), &["time".to_string(), "lat".to_string()]);
    assert_eq!(t2m.values(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    assert_eq!(t2m.attrs().get("scale"), Some(&AttrValue::F64(2.0)));
}

#[test]
fn expand_directory_lists_netcdf_files() {
    let dir = tempdir().expect("create temp dir");
    for name in ["b.nc", "a.netcdf", "notes.txt"] {
        std::fs::write(dir.path().join(name), b"").expect("write file");
    }

    let paths = expand_paths(&[dir.path()]).expect("expand succeeds");
    let names: Vec<String> = paths
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    assert_eq!(names, vec!["a.netcdf", "b.nc"]);
}

#[test]
fn expand_missing_path() {
    let err = expand_paths(&["/tmp/climet_missing_dir/x.nc"]).unwrap_err();
    assert!(matches!(err, IoError::FileNotFound { .. }));
}
