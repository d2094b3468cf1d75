use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// climet multi-source loader for gridded weather data.
#[derive(Parser)]
#[command(
    name = "climet",
    version,
    about = "Load, combine and export gridded weather data sources"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// List the registered source and dataset plugins.
    List,
    /// Show the source graph and a summary of the combined data.
    Describe(DescribeArgs),
    /// Combine the configured sources and write the result.
    Merge(MergeArgs),
}

/// Arguments for the `describe` subcommand.
#[derive(clap::Args)]
pub struct DescribeArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "climet.toml")]
    pub config: PathBuf,
}

/// Arguments for the `merge` subcommand.
#[derive(clap::Args)]
pub struct MergeArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "climet.toml")]
    pub config: PathBuf,

    /// Override output path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override output format from config (netcdf or parquet).
    #[arg(short, long)]
    pub format: Option<String>,
}
