//! Merge command: combine the configured sources and write the result.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use climet_io::{write_netcdf, write_parquet};
use climet_source::{Source, SourceRegistry};

use crate::cli::MergeArgs;
use crate::config::ClimetConfig;
use crate::convert::{self, OutputFormat};

/// Run the merge pipeline.
pub fn run(args: MergeArgs) -> Result<()> {
    let _cmd = info_span!("merge").entered();
    // 1. Load project TOML
    let config = ClimetConfig::load(&args.config)?;

    // 2. Resolve output before doing any work
    let (path, format) = convert::resolve_output(
        &config.output,
        args.output.as_deref(),
        args.format.as_deref(),
    )?;
    let writer_cfg = convert::build_writer_config(&config.output)?;

    // 3. Load and combine sources
    let multi = convert::build_multi_source(&config, &SourceRegistry::with_builtins())?;
    info!(
        n_sources = multi.children().len(),
        merger = %multi.merger(),
        "combining sources"
    );
    let ds = multi
        .to_array_dataset()
        .context("failed to combine sources")?;

    // 4. Write
    match format {
        OutputFormat::Netcdf => write_netcdf(path, &ds)
            .with_context(|| format!("failed to write NetCDF: {}", path.display()))?,
        OutputFormat::Parquet => write_parquet(path, &ds, &writer_cfg)
            .with_context(|| format!("failed to write Parquet: {}", path.display()))?,
    }

    println!(
        "Wrote {} variables over {:?} to {}",
        ds.len(),
        ds.dims(),
        path.display()
    );
    Ok(())
}
