//! Console output formatting with colored display

use std::fmt::Write as _;

use armory_core::record::DecodedRecord;
use armory_core::sync::TableStatus;
use armory_core::{ClassifiedRoll, ClassifiedWeapon, PerkSlot, SyncSource};
use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;

const BORDER_WIDTH: usize = 50;

fn border() -> String {
    "━".repeat(BORDER_WIDTH).dimmed().to_string()
}

/// Label showing where a result set came from
pub fn format_source(source: SyncSource) -> String {
    match source {
        SyncSource::Cache => "cache".cyan().to_string(),
        SyncSource::Live => "live".green().to_string(),
    }
}

/// Format a classified roll, one line per non-empty slot
pub fn format_roll(name: &str, type_name: &str, roll: &ClassifiedRoll) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "{}", border());
    if type_name.is_empty() {
        let _ = writeln!(output, "  {}", name.bold());
    } else {
        let _ = writeln!(output, "  {} [{}]", name.bold(), type_name);
    }
    let _ = writeln!(output, "{}", border());

    for (slot, perks) in roll.iter() {
        if perks.is_empty() {
            continue;
        }
        let names: Vec<&str> = perks.iter().map(|p| p.name.as_str()).collect();
        let _ = writeln!(
            output,
            "  {:<13}: {}",
            format_slot(slot),
            names.join(", ")
        );
    }
    let _ = write!(output, "{}", border());

    output
}

fn format_slot(slot: PerkSlot) -> String {
    let name = slot.name();
    if slot.is_trait() {
        name.yellow().to_string()
    } else {
        match slot {
            PerkSlot::Intrinsic => name.magenta().to_string(),
            PerkSlot::OriginTrait => name.truecolor(255, 165, 0).to_string(),
            PerkSlot::Masterwork => name.truecolor(255, 200, 0).to_string(),
            _ => name.to_string(),
        }
    }
}

pub fn format_weapons(weapons: &[ClassifiedWeapon], source: SyncSource) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "{} weapons ({})",
        weapons.len(),
        format_source(source)
    );
    for weapon in weapons {
        let _ = writeln!(
            output,
            "{}",
            format_roll(&weapon.name, &weapon.item_type_display_name, &weapon.perks)
        );
    }
    output
}

fn format_progress(progress: f64, complete: bool) -> String {
    let text = format!("{:5.1}%", progress);
    if complete {
        text.green().to_string()
    } else if progress > 0.0 {
        text.yellow().to_string()
    } else {
        text.dimmed().to_string()
    }
}

pub fn format_records(records: &[DecodedRecord], source: SyncSource) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "{} records ({})",
        records.len(),
        format_source(source)
    );
    for record in records {
        let _ = writeln!(
            output,
            "  {} {} {}",
            format_progress(record.progress, record.complete),
            record.name.bold(),
            format!("[{}]", record.weapon_type).dimmed()
        );
        for objective in &record.objectives {
            let _ = writeln!(
                output,
                "      {} {}/{}",
                objective.description,
                objective.progress,
                objective.completion
            );
        }
    }
    output
}

fn format_age(oldest: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match oldest {
        Some(at) => {
            let age = now - at;
            format!("{}h {}m ago", age.num_hours(), age.num_minutes() % 60)
        }
        None => "-".to_string(),
    }
}

pub fn format_status(label: &str, status: &TableStatus, now: DateTime<Utc>) -> String {
    let state = if status.rows == 0 {
        "empty".dimmed().to_string()
    } else if status.stale {
        "stale".red().to_string()
    } else {
        "fresh".green().to_string()
    };
    format!(
        "  {:<10}: {:>5} rows, oldest {} ({})",
        label,
        status.rows,
        format_age(status.oldest, now),
        state
    )
}
