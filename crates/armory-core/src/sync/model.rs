use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::DefinitionHash;
use crate::perk::{ClassifiedRoll, PlugAssignments};
use crate::record::{DecodedRecord, RelevanceMode};

/// An owned weapon instance with its live plugs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponInstance {
    pub item_instance_id: String,
    pub item_hash: DefinitionHash,
    #[serde(default)]
    pub plugs: PlugAssignments,
}

/// Classified weapon as returned to consumers and persisted per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedWeapon {
    pub item_instance_id: String,
    pub item_hash: DefinitionHash,
    pub name: String,
    #[serde(default)]
    pub item_type_display_name: String,
    pub perks: ClassifiedRoll,
}

impl ClassifiedWeapon {
    /// Persisted form; icon paths are reconstructable and not stored.
    pub fn without_icons(&self) -> Self {
        Self {
            perks: self.perks.without_icons(),
            ..self.clone()
        }
    }
}

/// Decoded record as persisted, with the relevance mode that admitted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedRecord {
    /// Absent on rows written before modes were recorded
    #[serde(default)]
    pub mode: Option<RelevanceMode>,
    pub record: DecodedRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncSource {
    /// Served from the persisted set
    Cache,
    /// Recomputed and persisted
    Live,
}

impl std::fmt::Display for SyncSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncSource::Cache => write!(f, "cache"),
            SyncSource::Live => write!(f, "live"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncOutcome<T> {
    pub source: SyncSource,
    pub values: Vec<T>,
}

/// Freshness summary of one user's persisted set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableStatus {
    pub rows: usize,
    pub oldest: Option<DateTime<Utc>>,
    pub stale: bool,
}
