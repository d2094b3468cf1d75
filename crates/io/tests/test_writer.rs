//! Integration test: NetCDF round trips, multi-file open and Parquet export.

use arrow::array::{AsArray, RecordBatch};
use arrow::datatypes::Float64Type;
use climet_array::{ArrayDataset, ArrayError, Variable, concat, merge};
use climet_io::{
    Compression, IoError, NetcdfHandle, WriterConfig, open_multi_netcdf, read_netcdf, write_netcdf,
    write_parquet,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use tempfile::tempdir;

/// Small `lat` x `lon` grid holding one variable per name.
fn grid(vars: &[&str], lat: &[f64]) -> ArrayDataset {
    let lon = [0.0, 120.0, 240.0];
    let mut ds = ArrayDataset::new()
        .with_coord_var(
            "lat",
            Variable::index("lat", lat.to_vec()).with_attr("units", "degrees_north"),
        )
        .expect("lat")
        .with_coord("lon", lon.to_vec())
        .expect("lon")
        .with_attr("history", "test fixture");
    for (k, name) in vars.iter().enumerate() {
        let values = (0..lat.len() * lon.len())
            .map(|i| k as f64 * 100.0 + lat[i / lon.len()] + i as f64 * 0.25)
            .collect();
        let var = Variable::from_vec(["lat", "lon"], &[lat.len(), lon.len()], values)
            .expect("values")
            .with_attr("long_name", format!("field {name}"));
        ds.insert_var(name, var).expect("insert var");
    }
    ds
}

#[test]
fn netcdf_round_trip_is_identical() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("grid.nc");
    let ds = grid(&["a", "b"], &[-45.0, 0.0, 45.0]);

    write_netcdf(&path, &ds).expect("write succeeds");
    let back = read_netcdf(&path).expect("read succeeds");

    assert!(back.identical(&ds), "round trip changed dataset:\n{back}\nvs\n{ds}");
}

#[test]
fn non_index_coordinate_survives_round_trip() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("aux.nc");
    let ds = grid(&["a"], &[0.0, 10.0])
        .with_coord_var(
            "cell_area",
            Variable::from_vec(["lat"], &[2], vec![1.0, 0.98]).expect("area"),
        )
        .expect("aux coordinate");

    write_netcdf(&path, &ds).expect("write succeeds");
    let back = read_netcdf(&path).expect("read succeeds");

    assert!(back.coords().contains_key("cell_area"));
    assert!(back.identical(&ds));
}

#[test]
fn open_multi_merges_variables() {
    let dir = tempdir().expect("create temp dir");
    let p1 = dir.path().join("s1.nc");
    let p2 = dir.path().join("s2.nc");
    let ds1 = grid(&["a", "b"], &[0.0, 10.0]);
    let ds2 = grid(&["c", "d"], &[0.0, 10.0]);
    write_netcdf(&p1, &ds1).expect("write s1");
    write_netcdf(&p2, &ds2).expect("write s2");

    let combined = open_multi_netcdf(&[p1, p2]).expect("open succeeds");
    let target = merge(&[ds1, ds2]).expect("merge succeeds");
    assert!(combined.identical(&target));
}

#[test]
fn open_multi_conflict_is_array_error() {
    let dir = tempdir().expect("create temp dir");
    let p1 = dir.path().join("ab.nc");
    let p2 = dir.path().join("ca.nc");
    // `a` is drawn with a different offset in each file.
    write_netcdf(&p1, &grid(&["a", "b"], &[0.0, 10.0])).expect("write ab");
    write_netcdf(&p2, &grid(&["c", "a"], &[0.0, 10.0])).expect("write ca");

    let err = open_multi_netcdf(&[p1, p2]).unwrap_err();
    assert!(
        matches!(err, IoError::Array(ArrayError::MergeConflict { ref name, .. }) if name == "a"),
        "got {err:?}"
    );
}

#[test]
fn open_multi_concatenates_tiles() {
    let dir = tempdir().expect("create temp dir");
    let south = grid(&["a"], &[-20.0, -10.0]);
    let north = grid(&["a"], &[10.0, 20.0]);
    let p_south = dir.path().join("south.nc");
    let p_north = dir.path().join("north.nc");
    write_netcdf(&p_south, &south).expect("write south");
    write_netcdf(&p_north, &north).expect("write north");

    // File order does not matter: labels decide.
    let combined = open_multi_netcdf(&[p_north, p_south]).expect("open succeeds");
    let target = concat(&[south, north], "lat").expect("concat succeeds");
    assert!(combined.identical(&target));
}

#[test]
fn handle_points_at_readable_file() {
    let ds = grid(&["a"], &[1.0, 2.0]);
    let handle = NetcdfHandle::create(&ds).expect("handle created");
    assert!(handle.path().exists());
    assert!(handle.open().expect("reopen").identical(&ds));

    let dir = handle.dir().to_path_buf();
    drop(handle);
    assert!(!dir.exists());
}

#[test]
fn parquet_table_round_trip() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("grid.parquet");
    let ds = grid(&["a", "b"], &[-45.0, 45.0]);

    let config = WriterConfig::default().with_compression(Compression::Zstd);
    write_parquet(&path, &ds, &config).expect("write succeeds");

    let file = std::fs::File::open(&path).expect("open parquet");
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .expect("reader builder")
        .build()
        .expect("build reader");
    let batches: Vec<RecordBatch> = reader.collect::<Result<Vec<_>, _>>().expect("read batches");

    let total_rows: usize = batches.iter().map(|b| b.num_rows()).sum();
    assert_eq!(total_rows, 6);

    let schema = batches[0].schema();
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(names, vec!["lat", "lon", "a", "b"]);

    let lat = batches[0].column(0).as_primitive::<Float64Type>();
    assert_eq!(lat.value(0), -45.0);
    assert_eq!(lat.value(5), 45.0);
    let b = batches[0].column(3).as_primitive::<Float64Type>();
    assert_eq!(b.value(0), 100.0 - 45.0);
}

#[test]
fn parquet_rejects_zero_row_groups() {
    let dir = tempdir().expect("create temp dir");
    let config = WriterConfig::default().with_row_group_size(0);
    let err = write_parquet(&dir.path().join("x.parquet"), &grid(&["a"], &[0.0]), &config)
        .unwrap_err();
    assert!(matches!(err, IoError::Validation { .. }));
}
