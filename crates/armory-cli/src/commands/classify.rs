//! Classify command implementation.

use std::path::Path;

use anyhow::{Result, bail};
use armory_core::perk::{ResolvedDefinitions, required_plug_sets, required_plugs};
use armory_core::{DefinitionHash, PlugAssignments, Table, classify};
use serde_json::Value;

use crate::cli_utils::{self, Settings};
use crate::console;

/// Classify one weapon, optionally with the live plugs of an instance
pub fn run(
    settings: &Settings,
    weapon_hash: DefinitionHash,
    plugs_file: Option<&Path>,
    json: bool,
) -> Result<()> {
    let assignments = match plugs_file {
        Some(path) => {
            let component: Value = cli_utils::read_json(path)?;
            PlugAssignments::from_component(&component)?
        }
        None => PlugAssignments::new(),
    };

    let cancel = cli_utils::cancel_on_ctrlc()?;
    let mut resolver = settings.resolver(cancel);
    let Some(weapon) = resolver.get(Table::InventoryItem, weapon_hash) else {
        bail!("No definition found for weapon {}", weapon_hash);
    };

    let plug_sets = resolver.get_batch(Table::PlugSet, &required_plug_sets(&weapon))?;
    let plug_hashes = required_plugs(&weapon, &assignments, &plug_sets);
    let plugs = resolver.get_batch(Table::InventoryItem, &plug_hashes)?;
    cli_utils::flush_store(&resolver);

    let roll = classify(&weapon, &assignments, &ResolvedDefinitions { plugs, plug_sets });

    if json {
        println!("{}", serde_json::to_string_pretty(&roll)?);
    } else {
        println!(
            "{}",
            console::format_roll(weapon.name(), &weapon.item_type_display_name, &roll)
        );
    }
    Ok(())
}
