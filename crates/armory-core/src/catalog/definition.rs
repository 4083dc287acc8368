//! Catalog document shapes.
//!
//! Only the fields the classifier and record decoder read are modelled.
//! Unknown fields are ignored and missing fields default, so a partially
//! populated document still deserializes.

use serde::{Deserialize, Serialize};

use super::hash::DefinitionHash;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayProperties {
    pub name: String,
    pub description: String,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlugInfo {
    pub plug_category_identifier: String,
}

/// Entry of a reusable-plug list, either inline on a socket or in a plug set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlugItem {
    pub plug_item_hash: DefinitionHash,
    pub currently_can_roll: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocketEntry {
    /// Declared position; absent on most documents
    pub socket_index: Option<u32>,
    pub socket_type_hash: DefinitionHash,
    /// Fixed initial plug, 0 when none
    pub single_initial_item_hash: DefinitionHash,
    pub reusable_plug_items: Vec<PlugItem>,
    pub reusable_plug_set_hash: Option<DefinitionHash>,
    pub randomized_plug_set_hash: Option<DefinitionHash>,
}

impl SocketEntry {
    pub fn initial_plug(&self) -> Option<DefinitionHash> {
        (self.single_initial_item_hash != 0).then_some(self.single_initial_item_hash)
    }

    /// Referenced plug sets, reusable first then randomized.
    pub fn plug_set_hashes(&self) -> impl Iterator<Item = DefinitionHash> + '_ {
        self.reusable_plug_set_hash
            .into_iter()
            .chain(self.randomized_plug_set_hash)
            .filter(|&hash| hash != 0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocketCategory {
    pub socket_category_hash: DefinitionHash,
    pub socket_indexes: Vec<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocketLayout {
    pub socket_entries: Vec<SocketEntry>,
    pub socket_categories: Vec<SocketCategory>,
}

impl SocketLayout {
    /// Socket entries paired with their effective index.
    ///
    /// The declared `socketIndex` wins; otherwise the array position is used.
    pub fn indexed_entries(&self) -> impl Iterator<Item = (u32, &SocketEntry)> {
        self.socket_entries
            .iter()
            .enumerate()
            .map(|(pos, entry)| (entry.socket_index.unwrap_or(pos as u32), entry))
    }

    pub fn category_indexes(&self, category_hash: DefinitionHash) -> Vec<u32> {
        self.socket_categories
            .iter()
            .filter(|c| c.socket_category_hash == category_hash)
            .flat_map(|c| c.socket_indexes.iter().copied())
            .collect()
    }

    pub fn has_category(&self, category_hash: DefinitionHash) -> bool {
        self.socket_categories
            .iter()
            .any(|c| c.socket_category_hash == category_hash)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChildRecord {
    pub record_hash: DefinitionHash,
}

/// Records grouped under a parent record or presentation node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordChildren {
    pub records: Vec<ChildRecord>,
}

/// A catalog document from any of the supported tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Definition {
    pub hash: DefinitionHash,
    pub display_properties: DisplayProperties,
    pub item_type: i32,
    pub item_type_display_name: String,
    pub item_category_hashes: Vec<DefinitionHash>,
    pub plug: Option<PlugInfo>,
    pub sockets: Option<SocketLayout>,
    /// Plug-set definitions only
    pub reusable_plug_items: Vec<PlugItem>,
    /// Objective definitions only
    pub progress_description: String,
    pub completion_value: Option<i64>,
    /// Record definitions only
    pub objective_hashes: Vec<DefinitionHash>,
    /// 1 marks a category record grouping other records
    pub record_value_style: i32,
    pub children: Option<RecordChildren>,
}

impl Definition {
    pub fn name(&self) -> &str {
        &self.display_properties.name
    }

    pub fn description(&self) -> &str {
        &self.display_properties.description
    }

    /// Lowercased plug-category identifier, empty when the item is not a plug.
    pub fn plug_category(&self) -> String {
        self.plug
            .as_ref()
            .map(|p| p.plug_category_identifier.to_lowercase())
            .unwrap_or_default()
    }

    pub fn has_item_category(&self, category_hash: DefinitionHash) -> bool {
        self.item_category_hashes.contains(&category_hash)
    }

    pub fn child_record_count(&self) -> usize {
        self.children.as_ref().map_or(0, |c| c.records.len())
    }
}
