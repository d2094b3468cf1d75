//! List command: show the registered plugins.

use anyhow::Result;

use climet_source::{DatasetRegistry, SourceRegistry};

/// Print source and dataset plugin names, one per line.
pub fn run() -> Result<()> {
    println!("Sources:");
    for name in SourceRegistry::with_builtins().names() {
        println!("  {name}");
    }
    println!("Datasets:");
    for name in DatasetRegistry::with_builtins().names() {
        println!("  {name}");
    }
    Ok(())
}
