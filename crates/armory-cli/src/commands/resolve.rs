//! Resolve command implementation.

use anyhow::Result;
use armory_core::{Definition, DefinitionHash, Table};
use tracing::warn;

use crate::cli_utils::{self, Settings};

/// Resolve definitions and print the found ones as a JSON array, in request order
pub fn run(settings: &Settings, table: Table, hashes: &[DefinitionHash]) -> Result<()> {
    let cancel = cli_utils::cancel_on_ctrlc()?;
    let mut resolver = settings.resolver(cancel);
    let map = resolver.get_batch(table, hashes)?;
    cli_utils::flush_store(&resolver);

    let found: Vec<&Definition> = hashes
        .iter()
        .filter_map(|hash| {
            let def = map.get(hash);
            if def.is_none() {
                warn!("{} {} not found", table, hash);
            }
            def.map(|d| d.as_ref())
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&found)?);
    eprintln!("{}", resolver.stats());
    Ok(())
}
