use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::catalog::{DefinitionHash, PlugItem};
use crate::error::Result;

/// Live plugs of one item instance, keyed by socket index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlugAssignments {
    sockets: BTreeMap<u32, Vec<DefinitionHash>>,
}

#[derive(Deserialize)]
struct ReusablePlugsComponent {
    #[serde(default)]
    plugs: BTreeMap<String, Vec<PlugItem>>,
}

impl PlugAssignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `reusablePlugs` item component:
    /// `{"plugs": {"<socket index>": [{"plugItemHash": n}, ...]}}`.
    ///
    /// Non-numeric socket keys are skipped.
    pub fn from_component(component: &Value) -> Result<Self> {
        let parsed: ReusablePlugsComponent = serde_json::from_value(component.clone())?;
        let mut assignments = Self::new();
        for (key, items) in parsed.plugs {
            let Ok(index) = key.trim().parse::<u32>() else {
                debug!("Skipping non-numeric socket key {:?}", key);
                continue;
            };
            assignments.insert(index, items.into_iter().map(|item| item.plug_item_hash));
        }
        Ok(assignments)
    }

    pub fn insert(&mut self, socket_index: u32, hashes: impl IntoIterator<Item = DefinitionHash>) {
        let list = self.sockets.entry(socket_index).or_default();
        for hash in hashes {
            if hash != 0 && !list.contains(&hash) {
                list.push(hash);
            }
        }
    }

    pub fn plugs_for(&self, socket_index: u32) -> &[DefinitionHash] {
        self.sockets
            .get(&socket_index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn all_hashes(&self) -> impl Iterator<Item = DefinitionHash> + '_ {
        self.sockets.values().flatten().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.sockets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_component() {
        let component = json!({
            "plugs": {
                "1": [{"plugItemHash": 11}, {"plugItemHash": 12, "canInsert": true}],
                "3": [{"plugItemHash": 31}],
                "bogus": [{"plugItemHash": 99}]
            }
        });
        let assignments = PlugAssignments::from_component(&component).unwrap();
        assert_eq!(assignments.plugs_for(1), &[11, 12]);
        assert_eq!(assignments.plugs_for(3), &[31]);
        assert!(assignments.plugs_for(2).is_empty());
        assert_eq!(assignments.all_hashes().count(), 3);
    }

    #[test]
    fn test_empty_component() {
        let assignments = PlugAssignments::from_component(&json!({})).unwrap();
        assert!(assignments.is_empty());
    }

    #[test]
    fn test_insert_skips_zero_and_duplicates() {
        let mut assignments = PlugAssignments::new();
        assignments.insert(0, [5, 0, 5, 6]);
        assert_eq!(assignments.plugs_for(0), &[5, 6]);
    }
}
