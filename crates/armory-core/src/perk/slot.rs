use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::catalog::{Definition, DefinitionHash};
use crate::config::catalog::ICON_BASE_URL;

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
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PerkSlot {
    Intrinsic,
    Barrel,
    Magazine,
    Trait1,
    Trait2,
    OriginTrait,
    Masterwork,
    WeaponMod,
    Shader,
    Other,
}

impl PerkSlot {
    pub fn name(&self) -> &'static str {
        self.into()
    }

    pub fn is_trait(&self) -> bool {
        matches!(self, PerkSlot::Trait1 | PerkSlot::Trait2)
    }
}

impl std::fmt::Display for PerkSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerkDescriptor {
    pub hash: DefinitionHash,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Icon path relative to the content host; not persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub item_type_display_name: String,
}

impl PerkDescriptor {
    pub fn from_definition(hash: DefinitionHash, def: &Definition) -> Self {
        Self {
            hash,
            name: def.display_properties.name.clone(),
            description: def.display_properties.description.clone(),
            icon: def
                .display_properties
                .icon
                .clone()
                .filter(|icon| !icon.is_empty()),
            item_type_display_name: def.item_type_display_name.clone(),
        }
    }

    pub fn icon_url(&self) -> Option<String> {
        self.icon
            .as_deref()
            .map(|path| format!("{}{}", ICON_BASE_URL, path))
    }
}

/// Classified perks of one weapon, one list per slot.
///
/// Every slot is present; lists hold no duplicate hashes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassifiedRoll {
    slots: BTreeMap<PerkSlot, Vec<PerkDescriptor>>,
}

impl Default for ClassifiedRoll {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassifiedRoll {
    pub fn new() -> Self {
        Self {
            slots: PerkSlot::iter().map(|slot| (slot, Vec::new())).collect(),
        }
    }

    pub fn get(&self, slot: PerkSlot) -> &[PerkDescriptor] {
        self.slots.get(&slot).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Append perks to a slot, skipping hashes already present.
    pub fn extend_unique(&mut self, slot: PerkSlot, perks: impl IntoIterator<Item = PerkDescriptor>) {
        let list = self.slots.entry(slot).or_default();
        for perk in perks {
            if !list.iter().any(|existing| existing.hash == perk.hash) {
                list.push(perk);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (PerkSlot, &[PerkDescriptor])> {
        self.slots.iter().map(|(slot, perks)| (*slot, perks.as_slice()))
    }

    pub fn perk_count(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }

    /// Copy with icon paths removed, as persisted.
    pub fn without_icons(&self) -> Self {
        let mut roll = self.clone();
        for perks in roll.slots.values_mut() {
            for perk in perks {
                perk.icon = None;
            }
        }
        roll
    }

    /// Fill in slots missing after deserializing an older or partial row.
    pub fn normalized(mut self) -> Self {
        for slot in PerkSlot::iter() {
            self.slots.entry(slot).or_default();
        }
        self
    }
}
