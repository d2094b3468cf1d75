//! Pure conversion functions: TOML config structs -> crate API types.

use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::config::*;

use climet_io::{Compression, WriterConfig};
use climet_source::{Merger, MultiSource, SourceRegistry};

/// File format of the merged output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// NetCDF file holding the labelled dataset.
    Netcdf,
    /// Parquet file holding the flattened table.
    Parquet,
}

/// Parses a compression algorithm name string into the corresponding enum variant.
pub fn parse_compression(s: &str) -> Result<Compression> {
    match s.to_lowercase().as_str() {
        "none" => Ok(Compression::None),
        "snappy" => Ok(Compression::Snappy),
        "zstd" => Ok(Compression::Zstd),
        other => bail!("unknown compression: {other:?}"),
    }
}

/// Parses an output format name string into the corresponding enum variant.
pub fn parse_format(s: &str) -> Result<OutputFormat> {
    match s.to_lowercase().as_str() {
        "netcdf" | "nc" => Ok(OutputFormat::Netcdf),
        "parquet" => Ok(OutputFormat::Parquet),
        other => bail!("unknown output format: {other:?}"),
    }
}

/// Builds a [`Merger`] from the TOML merge configuration.
pub fn parse_merger(merge: &MergeToml) -> Result<Merger> {
    Merger::from_parts(&merge.strategy.to_lowercase(), merge.dim.as_deref())
        .context("invalid [merge] section")
}

/// Builds a [`WriterConfig`] from the TOML output configuration.
pub fn build_writer_config(output: &OutputToml) -> Result<WriterConfig> {
    let compression = parse_compression(&output.compression)?;
    Ok(WriterConfig::default()
        .with_compression(compression)
        .with_zstd_level(output.zstd_level)
        .with_row_group_size(output.row_group_size))
}

/// Loads every `[[sources]]` entry through `registry` and wraps them in a
/// [`MultiSource`] using the configured merger.
///
/// Each entry must carry a string `name`; the other keys are passed to the
/// plugin as arguments.
pub fn build_multi_source(config: &ClimetConfig, registry: &SourceRegistry) -> Result<MultiSource> {
    if config.sources.is_empty() {
        bail!("no sources configured: add at least one [[sources]] entry");
    }
    let merger = parse_merger(&config.merge)?;

    let mut multi = MultiSource::new(Vec::new()).with_merger(merger);
    for (i, entry) in config.sources.iter().enumerate() {
        let Some(name) = entry.get("name").and_then(|v| v.as_str()) else {
            bail!("[[sources]] entry {i} needs a string 'name'");
        };
        let mut args = entry.clone();
        args.remove("name");
        let source = registry
            .load(name, &args)
            .with_context(|| format!("failed to load source {i} ('{name}')"))?;
        multi.push(source);
    }
    Ok(multi)
}

/// Resolves the output path and format, letting command-line values win
/// over the config file.
pub fn resolve_output<'a>(
    output: &'a OutputToml,
    path_override: Option<&'a Path>,
    format_override: Option<&str>,
) -> Result<(&'a Path, OutputFormat)> {
    let path = path_override
        .or(output.path.as_deref())
        .ok_or_else(|| {
            anyhow::anyhow!("no output path: set [output].path in config or use --output")
        })?;
    let format = parse_format(format_override.unwrap_or(&output.format))?;
    Ok((path, format))
}
