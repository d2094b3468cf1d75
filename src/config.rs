use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level climet configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClimetConfig {
    /// Sources to combine. Each entry names a plugin; the remaining keys are
    /// its arguments.
    #[serde(default)]
    pub sources: Vec<toml::Table>,

    /// How the sources are combined.
    #[serde(default)]
    pub merge: MergeToml,

    /// Where and how the combined data is written.
    #[serde(default)]
    pub output: OutputToml,
}

impl ClimetConfig {
    /// Reads and parses a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergeToml {
    #[serde(default = "default_strategy")]
    pub strategy: String,
    #[serde(default)]
    pub dim: Option<String>,
}

impl Default for MergeToml {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            dim: None,
        }
    }
}

fn default_strategy() -> String {
    "by-coords".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputToml {
    pub path: Option<PathBuf>,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_zstd_level")]
    pub zstd_level: i32,
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,
}

impl Default for OutputToml {
    fn default() -> Self {
        Self {
            path: None,
            format: default_format(),
            compression: default_compression(),
            zstd_level: default_zstd_level(),
            row_group_size: default_row_group_size(),
        }
    }
}

fn default_format() -> String {
    "netcdf".to_string()
}
fn default_compression() -> String {
    "snappy".to_string()
}
fn default_zstd_level() -> i32 {
    3
}
fn default_row_group_size() -> usize {
    1_000_000
}
