//! Describe command: show the source graph and the combined dataset.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use climet_source::{Source, SourceRegistry};

use crate::cli::DescribeArgs;
use crate::config::ClimetConfig;
use crate::convert;

/// Load the configured sources and print what they combine into.
pub fn run(args: DescribeArgs) -> Result<()> {
    let _cmd = info_span!("describe").entered();
    let config = ClimetConfig::load(&args.config)?;

    let multi = convert::build_multi_source(&config, &SourceRegistry::with_builtins())?;
    print!("{}", multi.graph());

    let ds = multi
        .to_array_dataset()
        .context("failed to combine sources")?;
    info!(n_vars = ds.len(), "sources combined");
    println!();
    println!("{ds}");

    let fields = multi.fields()?;
    println!("Fields: {}", fields.len());
    for field in &fields {
        println!("  {field}");
    }
    Ok(())
}
