use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::catalog::{DefinitionHash, DefinitionMap};
use crate::error::Result;

use super::filter::{RecordFilter, RelevanceMode};
use super::progress::overall_progress;
use super::state::RecordState;

/// Completion threshold assumed when neither the instance nor the
/// objective definition provides one.
pub const DEFAULT_COMPLETION_VALUE: i64 = 100;

const PLACEHOLDER_OBJECTIVE: &str = "No objectives found - possible catalyst parent record";

/// Per-user objective state as reported by the profile records component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectiveProgress {
    pub objective_hash: DefinitionHash,
    pub progress: i64,
    pub completion_value: Option<i64>,
    pub complete: bool,
}

/// Per-user state of one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordInstance {
    pub state: u32,
    pub objectives: Vec<ObjectiveProgress>,
}

/// Parse the profile records component.
///
/// Accepts either `{"records": {"<hash>": {...}}}` or the bare records map.
/// Entries with non-numeric keys are skipped.
pub fn parse_profile_records(value: &Value) -> Result<BTreeMap<DefinitionHash, RecordInstance>> {
    let records = value.get("records").unwrap_or(value);
    let raw: BTreeMap<String, RecordInstance> = serde_json::from_value(records.clone())?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, instance)| match crate::catalog::parse_hash(&key) {
            Ok(hash) => Some((hash, instance)),
            Err(_) => {
                debug!("Skipping record with non-numeric key {:?}", key);
                None
            }
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedObjective {
    pub objective_hash: DefinitionHash,
    pub description: String,
    pub progress: i64,
    pub completion: i64,
    pub complete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedRecord {
    pub record_hash: DefinitionHash,
    pub name: String,
    pub description: String,
    pub objectives: Vec<DecodedObjective>,
    pub complete: bool,
    pub unlocked: bool,
    pub visible: bool,
    /// Percentage in `0.0..=100.0`
    pub progress: f64,
    pub weapon_type: String,
    /// Admitted in discovery mode without being allow-listed
    #[serde(default)]
    pub discovered: bool,
}

/// Rough weapon type from a record name; "Exotic" when nothing matches.
pub fn guess_weapon_type(name: &str) -> &'static str {
    const GUESSES: &[(&[&str], &str)] = &[
        (&["Pistol", "Hand Cannon"], "Hand Cannon"),
        (&["Rifle", "Scout"], "Rifle"),
        (&["Shotgun"], "Shotgun"),
        (&["Sword", "Blade"], "Sword"),
        (&["Bow"], "Bow"),
        (&["Launcher"], "Launcher"),
    ];
    GUESSES
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| name.contains(n)))
        .map(|(_, weapon_type)| *weapon_type)
        .unwrap_or("Exotic")
}

/// Decode one record against its resolved definitions.
///
/// Returns `None` when the record definition is missing or the record is
/// not relevant under `mode`. In strict mode a record without resolvable
/// objectives is dropped; in discovery mode it is kept with a single
/// placeholder objective.
pub fn decode_record(
    record_hash: DefinitionHash,
    instance: &RecordInstance,
    records: &DefinitionMap,
    objectives: &DefinitionMap,
    filter: &RecordFilter,
    mode: RelevanceMode,
) -> Option<DecodedRecord> {
    let Some(def) = records.get(&record_hash) else {
        debug!("No definition for record {}", record_hash);
        return None;
    };
    let state = RecordState::decode(instance.state);

    let mut decoded: Vec<DecodedObjective> = instance
        .objectives
        .iter()
        .filter_map(|objective| {
            let objective_def = objectives.get(&objective.objective_hash)?;
            Some(DecodedObjective {
                objective_hash: objective.objective_hash,
                description: objective_def.progress_description.clone(),
                progress: objective.progress,
                completion: objective
                    .completion_value
                    .or(objective_def.completion_value)
                    .unwrap_or(DEFAULT_COMPLETION_VALUE),
                complete: objective.complete,
            })
        })
        .collect();

    let objective_texts = def
        .objective_hashes
        .iter()
        .chain(instance.objectives.iter().map(|o| &o.objective_hash))
        .filter_map(|hash| objectives.get(hash))
        .map(|o| o.progress_description.as_str());
    if !filter.is_relevant(mode, record_hash, state, def, objective_texts) {
        debug!("Skipping record {} ({}) in {} mode", record_hash, def.name(), mode);
        return None;
    }

    if decoded.is_empty() {
        match mode {
            RelevanceMode::Strict => {
                debug!("Skipping record {} without objectives", def.name());
                return None;
            }
            RelevanceMode::Discovery => decoded.push(DecodedObjective {
                objective_hash: 0,
                description: PLACEHOLDER_OBJECTIVE.to_string(),
                progress: 0,
                completion: 1,
                complete: false,
            }),
        }
    }

    let progress = overall_progress(
        decoded.iter().map(|o| (o.progress, o.completion)),
        state.complete,
    );

    Some(DecodedRecord {
        record_hash,
        name: def.name().to_string(),
        description: def.description().to_string(),
        weapon_type: guess_weapon_type(def.name()).to_string(),
        objectives: decoded,
        complete: state.complete,
        unlocked: state.unlocked,
        visible: state.visible,
        progress,
        discovered: mode == RelevanceMode::Discovery && !filter.is_allow_listed(record_hash),
    })
}

/// Record and objective hashes to prefetch before decoding.
pub fn required_hashes(
    records: &BTreeMap<DefinitionHash, RecordInstance>,
) -> (Vec<DefinitionHash>, Vec<DefinitionHash>) {
    let record_hashes: Vec<DefinitionHash> = records.keys().copied().collect();
    let mut seen = HashSet::new();
    let objective_hashes = records
        .values()
        .flat_map(|r| r.objectives.iter().map(|o| o.objective_hash))
        .filter(|hash| seen.insert(*hash))
        .collect();
    (record_hashes, objective_hashes)
}

/// Objective hashes declared by record definitions but absent from instances.
pub fn declared_objective_hashes(records: &DefinitionMap) -> Vec<DefinitionHash> {
    let mut hashes: Vec<DefinitionHash> = records
        .values()
        .flat_map(|def| def.objective_hashes.iter().copied())
        .collect();
    hashes.sort_unstable();
    hashes.dedup();
    hashes
}
