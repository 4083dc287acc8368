//! Sync command implementation.

use std::path::Path;

use anyhow::Result;
use armory_core::WeaponInstance;
use chrono::Utc;
use tracing::info;

use crate::cli_utils::{self, Settings};
use crate::console;

/// Classify every weapon instance of `user`, serving the persisted set while fresh
pub fn run(settings: &Settings, instances: &Path, user: &str, force: bool, json: bool) -> Result<()> {
    let instances: Vec<WeaponInstance> = cli_utils::read_json(instances)?;
    info!("Loaded {} weapon instances", instances.len());

    let cancel = cli_utils::cancel_on_ctrlc()?;
    let mut pipeline = settings.pipeline(cancel);
    let outcome = pipeline.weapon_rolls(user, &instances, Utc::now(), force)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.values)?);
    } else {
        print!("{}", console::format_weapons(&outcome.values, outcome.source));
    }
    Ok(())
}
