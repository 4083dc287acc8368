use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::error::{Error, Result};

/// Unsigned 32-bit key into a catalog table.
pub type DefinitionHash = u32;

/// Convert a definition hash into the signed id used by mirror rows.
///
/// Hashes above `i32::MAX` wrap to negative ids.
pub fn to_signed_id(hash: DefinitionHash) -> i32 {
    hash as i32
}

/// Convert a mirror row id back into a definition hash.
pub fn from_signed_id(id: i64) -> Option<DefinitionHash> {
    if let Ok(signed) = i32::try_from(id) {
        return Some(signed as u32);
    }
    u32::try_from(id).ok()
}

/// Parse a hash given either unsigned or as a signed mirror id.
pub fn parse_hash(value: &str) -> Result<DefinitionHash> {
    let trimmed = value.trim();
    trimmed
        .parse::<i64>()
        .ok()
        .and_then(from_signed_id)
        .ok_or_else(|| Error::InvalidHash(trimmed.to_string()))
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Table {
    #[strum(serialize = "DestinyInventoryItemDefinition")]
    InventoryItem,
    #[strum(serialize = "DestinyPlugSetDefinition")]
    PlugSet,
    #[strum(serialize = "DestinyRecordDefinition")]
    Record,
    #[strum(serialize = "DestinyObjectiveDefinition")]
    Objective,
    #[strum(serialize = "DestinySocketCategoryDefinition")]
    SocketCategory,
}

impl Table {
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Key used by the persistent definition store.
    pub fn store_key(&self, hash: DefinitionHash) -> String {
        format!("{}:{}", self.name(), hash)
    }

    pub fn parse(value: &str) -> Result<Self> {
        Self::from_str(value.trim()).map_err(|_| Error::UnknownTable(value.to_string()))
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
