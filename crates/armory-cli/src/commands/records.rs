//! Records command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use armory_core::record::parse_profile_records;
use armory_core::RelevanceMode;
use chrono::Utc;
use serde_json::Value;
use tracing::info;

use crate::cli_utils::{self, Settings};
use crate::console;

/// Decode a profile's records and persist the relevant ones for `user`
pub fn run(
    settings: &Settings,
    profile: &Path,
    user: &str,
    mode: RelevanceMode,
    force: bool,
    json: bool,
) -> Result<()> {
    let component: Value = cli_utils::read_json(profile)?;
    let profile_records = parse_profile_records(&component)
        .with_context(|| format!("Invalid records component in {}", profile.display()))?;
    info!("Loaded {} profile records", profile_records.len());

    let cancel = cli_utils::cancel_on_ctrlc()?;
    let mut pipeline = settings.pipeline(cancel);
    let outcome = pipeline.records(user, &profile_records, mode, Utc::now(), force)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.values)?);
    } else {
        print!("{}", console::format_records(&outcome.values, outcome.source));
    }
    Ok(())
}
