//! Integration test: run the `climet` binary against a TOML config.

use std::path::Path;
use std::process::{Command, Output};

use climet_io::read_netcdf;
use tempfile::tempdir;

fn climet(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_climet"))
        .args(args)
        .output()
        .expect("run climet binary")
}

fn write_config(dir: &Path, body: &str) -> String {
    let path = dir.join("climet.toml");
    std::fs::write(&path, body).expect("write config");
    path.display().to_string()
}

const TWO_SOURCES: &str = r#"
[[sources]]
name = "dummy-source"
dims = ["lat", "lon", "time"]
variables = ["a", "b"]

[[sources]]
name = "dummy-source"
dims = ["lat", "lon", "time"]
variables = ["c", "d"]
"#;

#[test]
fn list_shows_builtins() {
    let out = climet(&["list"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("dummy-source"));
    assert!(stdout.contains("multi"));
    assert!(stdout.contains("netcdf-files"));
}

#[test]
fn describe_prints_graph_and_summary() {
    let dir = tempdir().expect("create temp dir");
    let config = write_config(dir.path(), TWO_SOURCES);

    let out = climet(&["describe", "-c", &config]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("multi: 2 sources, by-coords"));
    assert!(stdout.contains("Data variables:"));
    assert!(stdout.contains("Fields: 4"));
}

#[test]
fn merge_writes_netcdf() {
    let dir = tempdir().expect("create temp dir");
    let config = write_config(dir.path(), TWO_SOURCES);
    let output = dir.path().join("merged.nc");

    let out = climet(&["merge", "-c", &config, "-o", &output.display().to_string()]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let ds = read_netcdf(&output).expect("read merged file");
    assert_eq!(ds.data_var_names(), vec!["a", "b", "c", "d"]);
}

#[test]
fn merge_writes_parquet() {
    let dir = tempdir().expect("create temp dir");
    let body = format!(
        "{TWO_SOURCES}\n[output]\npath = \"{}\"\nformat = \"parquet\"\ncompression = \"zstd\"\n",
        dir.path().join("merged.parquet").display()
    );
    let config = write_config(dir.path(), &body);

    let out = climet(&["merge", "-c", &config]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(dir.path().join("merged.parquet").exists());
}

#[test]
fn merge_conflict_exits_with_error() {
    let dir = tempdir().expect("create temp dir");
    let config = write_config(
        dir.path(),
        r#"
[[sources]]
name = "dummy-source"

[[sources]]
name = "dummy-source"
seed = 5

[merge]
strategy = "merge"

[output]
path = "unused.nc"
"#,
    );

    let out = climet(&["merge", "-c", &config]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Error: failed to combine sources"));
    assert!(stderr.contains("conflicting values for variable 'a'"));
}
