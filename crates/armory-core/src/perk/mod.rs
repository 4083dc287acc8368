//! Weapon socket classification.
//!
//! This module contains:
//! - `PerkSlot` / `PerkDescriptor` / `ClassifiedRoll` - classified output
//! - `PlugAssignments` - live plugs of an item instance
//! - `classify` - socket classification with trait column resolution

mod assignment;
mod candidates;
mod classifier;
mod rules;
mod slot;
mod traits;

pub use assignment::PlugAssignments;
pub use candidates::{candidate_hashes, is_placeholder};
pub use classifier::{ResolvedDefinitions, classify, required_plug_sets, required_plugs};
pub use rules::{PlugProbe, WEAPON_MOD_ITEM_CATEGORY, classify_plug};
pub use slot::{ClassifiedRoll, PerkDescriptor, PerkSlot};
pub use traits::{TraitSocket, WEAPON_PERKS_SOCKET_CATEGORY, resolve_trait_columns};
