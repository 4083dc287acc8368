//! Ordered strategy table mapping a plug's category shape to a perk slot.
//!
//! The catalog has no role enum for plugs, so the slot is inferred from the
//! lowercased plug-category identifier, the item-type name and the item
//! categories. Rules are evaluated top to bottom; the first match wins and
//! anything unmatched is [`PerkSlot::Other`].

use crate::catalog::{Definition, DefinitionHash};

use super::slot::PerkSlot;

/// Item category of weapon mods.
pub const WEAPON_MOD_ITEM_CATEGORY: DefinitionHash = 610365472;

const BARREL_KEYWORDS: &[&str] = &["barrel", "tubes", "bowstrings", "blades", "hafts", "scopes"];
const MAGAZINE_KEYWORDS: &[&str] = &["magazine", "batteries", "guards", "arrows"];
const TRAIT_KEYWORDS: &[&str] = &["trait", "grip", "frames"];
const TRAIT_TYPE_NAMES: &[&str] = &["trait", "enhanced trait", "grip"];

/// Normalized view of the fields the rules read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlugProbe {
    pub category: String,
    pub name: String,
    pub type_name: String,
    pub item_categories: Vec<DefinitionHash>,
}

impl PlugProbe {
    pub fn from_definition(def: &Definition) -> Self {
        Self {
            category: def.plug_category(),
            name: def.display_properties.name.clone(),
            type_name: def.item_type_display_name.to_lowercase(),
            item_categories: def.item_category_hashes.clone(),
        }
    }

    fn category_has_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.category.contains(k))
    }

    /// Trait or grip plug, used to find trait sockets on untagged weapons.
    pub fn is_trait(&self) -> bool {
        self.category_has_any(TRAIT_KEYWORDS)
            || TRAIT_TYPE_NAMES.contains(&self.type_name.as_str())
    }
}

type Rule = fn(&PlugProbe) -> bool;

fn is_intrinsic(p: &PlugProbe) -> bool {
    p.category.contains("intrinsic") || p.type_name == "intrinsic"
}

fn is_barrel(p: &PlugProbe) -> bool {
    p.category_has_any(BARREL_KEYWORDS)
}

fn is_magazine(p: &PlugProbe) -> bool {
    p.category_has_any(MAGAZINE_KEYWORDS)
}

fn is_origin_trait(p: &PlugProbe) -> bool {
    p.category.contains("origins")
}

fn is_masterwork(p: &PlugProbe) -> bool {
    let c = p.category.as_str();
    c.contains("masterworks.stat.")
        || (c.starts_with("masterwork.") && c.contains(".stat."))
        || (c.ends_with(".masterwork") && c.contains(".weapon."))
        || c.starts_with("plugs.masterworks.weapons")
        || (c.contains("masterworks") && p.name.starts_with("Masterworked:"))
}

fn is_shader(p: &PlugProbe) -> bool {
    p.category.contains("shader")
}

fn is_weapon_mod(p: &PlugProbe) -> bool {
    p.item_categories.contains(&WEAPON_MOD_ITEM_CATEGORY)
        || p.category.contains("weapon.mod_")
        || p.type_name.contains("weapon mod")
}

/// Evaluated in order; first match wins.
const RULES: &[(Rule, PerkSlot)] = &[
    (is_intrinsic, PerkSlot::Intrinsic),
    (is_barrel, PerkSlot::Barrel),
    (is_magazine, PerkSlot::Magazine),
    (is_origin_trait, PerkSlot::OriginTrait),
    (is_masterwork, PerkSlot::Masterwork),
    (is_shader, PerkSlot::Shader),
    (is_weapon_mod, PerkSlot::WeaponMod),
];

pub fn slot_for(probe: &PlugProbe) -> PerkSlot {
    RULES
        .iter()
        .find(|(rule, _)| rule(probe))
        .map(|(_, slot)| *slot)
        .unwrap_or(PerkSlot::Other)
}

/// Slot of a single plug definition.
///
/// Trait plugs are reported as [`PerkSlot::Other`] here; their column
/// depends on the socket layout of the weapon.
pub fn classify_plug(def: &Definition) -> PerkSlot {
    slot_for(&PlugProbe::from_definition(def))
}
