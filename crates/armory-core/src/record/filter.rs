use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};

use crate::catalog::{Definition, DefinitionHash};
use crate::config::RecordsConfig;

use super::state::RecordState;

/// Parent records grouping more child records than this are categories.
pub const MAX_CONTENT_MATCH_CHILDREN: usize = 3;

/// An objective text matches when it names one of these subjects...
const OBJECTIVE_SUBJECTS: [&str; 2] = ["catalyst", "masterwork"];
/// ...together with one of these actions.
const OBJECTIVE_ACTIONS: [&str; 3] = ["defeat", "kills", "precision"];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RelevanceMode {
    /// Visible and unlocked records carrying the name marker or allow-listed
    #[default]
    Strict,
    /// Visible or unlocked records, plus a keyword scan of descriptions
    Discovery,
}

impl std::fmt::Display for RelevanceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name: &'static str = self.into();
        write!(f, "{}", name)
    }
}

/// Decides which records are tracked.
#[derive(Debug, Clone)]
pub struct RecordFilter {
    name_marker: String,
    keywords: Vec<String>,
    known_hashes: HashSet<DefinitionHash>,
}

impl Default for RecordFilter {
    fn default() -> Self {
        Self::from_config(&RecordsConfig::default())
    }
}

impl RecordFilter {
    pub fn new(
        name_marker: &str,
        keywords: impl IntoIterator<Item = String>,
        known_hashes: impl IntoIterator<Item = DefinitionHash>,
    ) -> Self {
        Self {
            name_marker: name_marker.to_string(),
            keywords: keywords
                .into_iter()
                .map(|k| k.to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            known_hashes: known_hashes.into_iter().collect(),
        }
    }

    pub fn from_config(config: &RecordsConfig) -> Self {
        Self::new(
            &config.name_marker,
            config.keywords.iter().cloned(),
            config.known_hashes.iter().copied(),
        )
    }

    pub fn state_passes(&self, mode: RelevanceMode, state: RecordState) -> bool {
        match mode {
            RelevanceMode::Strict => state.visible && state.unlocked,
            RelevanceMode::Discovery => state.visible || state.unlocked,
        }
    }

    pub fn is_allow_listed(&self, hash: DefinitionHash) -> bool {
        self.known_hashes.contains(&hash)
    }

    /// Name marker present (case-sensitive) or hash allow-listed.
    pub fn is_tracked(&self, hash: DefinitionHash, name: &str) -> bool {
        self.is_allow_listed(hash)
            || (!self.name_marker.is_empty() && name.contains(&self.name_marker))
    }

    /// Content scan of a record.
    ///
    /// The description matches on any configured keyword. An objective text
    /// matches when it names a catalyst or masterwork together with a
    /// defeat, kills or precision action. Category records and parents of
    /// more than [`MAX_CONTENT_MATCH_CHILDREN`] records never match.
    pub fn matches_content<'a>(
        &self,
        record: &Definition,
        objective_texts: impl IntoIterator<Item = &'a str>,
    ) -> bool {
        if record.record_value_style == 1 {
            return false;
        }
        if record.child_record_count() > MAX_CONTENT_MATCH_CHILDREN {
            return false;
        }
        let description = record.description().to_lowercase();
        if self.keywords.iter().any(|k| description.contains(k)) {
            return true;
        }
        objective_texts.into_iter().any(objective_matches)
    }

    pub fn is_relevant<'a>(
        &self,
        mode: RelevanceMode,
        hash: DefinitionHash,
        state: RecordState,
        record: &Definition,
        objective_texts: impl IntoIterator<Item = &'a str>,
    ) -> bool {
        if !self.state_passes(mode, state) {
            return false;
        }
        if self.is_tracked(hash, record.name()) {
            return true;
        }
        mode == RelevanceMode::Discovery && self.matches_content(record, objective_texts)
    }
}

fn objective_matches(text: &str) -> bool {
    let text = text.to_lowercase();
    OBJECTIVE_SUBJECTS.iter().any(|s| text.contains(s))
        && OBJECTIVE_ACTIONS.iter().any(|a| text.contains(a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::mock::named_definition;
    use std::str::FromStr;

    const NONE: [&str; 0] = [];

    fn visible() -> RecordState {
        RecordState::decode(0)
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(RelevanceMode::from_str("Discovery").unwrap(), RelevanceMode::Discovery);
        assert_eq!(RelevanceMode::from_str("strict").unwrap(), RelevanceMode::Strict);
        assert_eq!(RelevanceMode::Discovery.to_string(), "discovery");
    }

    #[test]
    fn test_strict_requires_marker_or_allow_list() {
        let filter = RecordFilter::new("Catalyst", Vec::new(), [77]);
        let named = named_definition(1, "Ace of Spades Catalyst");
        let other = named_definition(2, "Lore Book");
        let lower = named_definition(3, "ace of spades catalyst");

        assert!(filter.is_relevant(RelevanceMode::Strict, 1, visible(), &named, NONE));
        assert!(!filter.is_relevant(RelevanceMode::Strict, 2, visible(), &other, NONE));
        assert!(!filter.is_relevant(RelevanceMode::Strict, 3, visible(), &lower, NONE));
        assert!(filter.is_relevant(RelevanceMode::Strict, 77, visible(), &other, NONE));
    }

    #[test]
    fn test_strict_requires_visible_and_unlocked() {
        let filter = RecordFilter::default();
        let named = named_definition(1, "Thorn Catalyst");
        assert!(!filter.is_relevant(RelevanceMode::Strict, 1, RecordState::decode(8), &named, NONE));
        assert!(!filter.is_relevant(RelevanceMode::Strict, 1, RecordState::decode(16), &named, NONE));
    }

    #[test]
    fn test_discovery_accepts_either_state() {
        let filter = RecordFilter::default();
        let named = named_definition(1, "Thorn Catalyst");
        assert!(filter.is_relevant(RelevanceMode::Discovery, 1, RecordState::decode(8), &named, NONE));
        assert!(!filter.is_relevant(RelevanceMode::Discovery, 1, RecordState::decode(24), &named, NONE));
    }

    #[test]
    fn test_discovery_keyword_scan() {
        let filter = RecordFilter::default();
        let mut by_description = named_definition(1, "Unnamed");
        by_description.display_properties.description = "Unlock the Exotic Catalyst for Thorn.".to_string();
        assert!(filter.is_relevant(RelevanceMode::Discovery, 1, visible(), &by_description, NONE));
        assert!(!filter.is_relevant(RelevanceMode::Strict, 1, visible(), &by_description, NONE));

        let plain = named_definition(2, "Unnamed");
        assert!(!filter.is_relevant(RelevanceMode::Discovery, 2, visible(), &plain, ["Kills"]));
    }

    #[test]
    fn test_objective_text_needs_subject_and_action() {
        let filter = RecordFilter::default();
        let plain = named_definition(2, "Unnamed");
        let scan = |text: &'static str| filter.matches_content(&plain, [text]);

        assert!(scan("Precision kills to unlock the catalyst"));
        assert!(scan("Defeat combatants to Masterwork this weapon"));
        assert!(!scan("Weapon catalyst progress"));
        assert!(!scan("Precision kills"));
    }

    #[test]
    fn test_parent_with_many_children_never_matches_content() {
        use crate::catalog::{ChildRecord, RecordChildren};

        let filter = RecordFilter::default();
        let mut parent = named_definition(1, "Exotic Collection");
        parent.display_properties.description = "Exotic catalyst progress".to_string();
        parent.children = Some(RecordChildren {
            records: (0..4).map(|h| ChildRecord { record_hash: h }).collect(),
        });
        assert!(!filter.matches_content(&parent, NONE));

        parent.children = Some(RecordChildren {
            records: (0..3).map(|h| ChildRecord { record_hash: h }).collect(),
        });
        assert!(filter.matches_content(&parent, NONE));
    }

    #[test]
    fn test_category_record_never_matches_content() {
        let filter = RecordFilter::default();
        let mut category = named_definition(1, "Exotic Weapons");
        category.display_properties.description = "Exotic catalyst progress".to_string();
        category.record_value_style = 1;
        assert!(!filter.matches_content(&category, NONE));
    }
}
