//! Cache status command implementation.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use anyhow::Result;
use chrono::Utc;
use serde_json::json;

use crate::cli_utils::Settings;
use crate::console;

/// Show row counts and ages of the persisted sets of `user`
pub fn run(settings: &Settings, user: &str, json: bool) -> Result<()> {
    let now = Utc::now();
    let pipeline = settings.pipeline(Arc::new(AtomicBool::new(false)));
    let rollups = pipeline.rollup_status(user, now);
    let records = pipeline.record_status(user, now);
    let definitions = pipeline.resolver().store().len();

    if json {
        let status = json!({
            "user": user,
            "storeDir": settings.store_dir,
            "ttlHours": pipeline.policy().ttl().num_hours(),
            "definitions": definitions,
            "weapons": rollups,
            "records": records,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("Store: {}", settings.store_dir.display());
        println!("Cached definitions: {}", definitions);
        println!(
            "Freshness window: {}h",
            pipeline.policy().ttl().num_hours()
        );
        println!("{}", console::format_status("weapons", &rollups, now));
        println!("{}", console::format_status("records", &records, now));
    }
    Ok(())
}
