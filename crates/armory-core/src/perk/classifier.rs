use std::collections::HashSet;

use tracing::debug;

use crate::catalog::{Definition, DefinitionHash, DefinitionMap};

use super::assignment::PlugAssignments;
use super::candidates::{candidate_hashes, key_plug, surviving_perks};
use super::rules::{PlugProbe, slot_for};
use super::slot::{ClassifiedRoll, PerkSlot};
use super::traits::{TraitSocket, WEAPON_PERKS_SOCKET_CATEGORY, resolve_trait_columns};

/// Plug and plug-set definitions a classification reads.
#[derive(Debug, Clone, Default)]
pub struct ResolvedDefinitions {
    pub plugs: DefinitionMap,
    pub plug_sets: DefinitionMap,
}

/// Classify every socket of a weapon into perk slots.
///
/// Total over any weapon shape: sockets with unknown plug shapes land in
/// [`PerkSlot::Other`] and sockets without surviving plugs contribute
/// nothing. Output depends only on the inputs.
pub fn classify(
    weapon: &Definition,
    assignments: &PlugAssignments,
    resolved: &ResolvedDefinitions,
) -> ClassifiedRoll {
    let mut roll = ClassifiedRoll::new();
    let Some(layout) = &weapon.sockets else {
        return roll;
    };

    let tagged = layout.has_category(WEAPON_PERKS_SOCKET_CATEGORY);
    let trait_indexes: HashSet<u32> = layout
        .category_indexes(WEAPON_PERKS_SOCKET_CATEGORY)
        .into_iter()
        .collect();
    let mut trait_sockets = Vec::new();

    for (position, (index, entry)) in layout.indexed_entries().enumerate() {
        let live = assignments.plugs_for(index);
        let candidates = candidate_hashes(entry, live, &resolved.plug_sets);
        let probe = key_plug(entry, live, &candidates, &resolved.plugs).map(PlugProbe::from_definition);

        let trait_position = if tagged {
            trait_indexes.contains(&index).then_some(index)
        } else {
            probe
                .as_ref()
                .is_some_and(PlugProbe::is_trait)
                .then_some(position as u32)
        };
        if let Some(position) = trait_position {
            trait_sockets.push(TraitSocket {
                position,
                perks: surviving_perks(&candidates, &resolved.plugs, false),
            });
            continue;
        }

        let slot = probe.as_ref().map(slot_for).unwrap_or(PerkSlot::Other);
        let perks = surviving_perks(&candidates, &resolved.plugs, slot == PerkSlot::Intrinsic);
        debug!(
            "{} socket {}: {} with {} perks",
            weapon.name(),
            index,
            slot,
            perks.len()
        );
        roll.extend_unique(slot, perks);
    }

    let [trait1, trait2] = resolve_trait_columns(weapon.name(), trait_sockets);
    roll.extend_unique(PerkSlot::Trait1, trait1);
    roll.extend_unique(PerkSlot::Trait2, trait2);
    roll
}

/// Plug sets referenced by a weapon's sockets.
pub fn required_plug_sets(weapon: &Definition) -> Vec<DefinitionHash> {
    let mut seen = HashSet::new();
    weapon
        .sockets
        .iter()
        .flat_map(|layout| layout.socket_entries.iter())
        .flat_map(|entry| entry.plug_set_hashes())
        .filter(|hash| seen.insert(*hash))
        .collect()
}

/// Plugs a classification of `weapon` may read, given its resolved plug sets.
pub fn required_plugs(
    weapon: &Definition,
    assignments: &PlugAssignments,
    plug_sets: &DefinitionMap,
) -> Vec<DefinitionHash> {
    let mut seen = HashSet::new();
    let Some(layout) = &weapon.sockets else {
        return Vec::new();
    };
    layout
        .indexed_entries()
        .flat_map(|(index, entry)| candidate_hashes(entry, assignments.plugs_for(index), plug_sets))
        .filter(|hash| seen.insert(*hash))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::mock::plug_definition;
    use crate::catalog::{SocketCategory, SocketEntry, SocketLayout};
    use std::sync::Arc;

    fn entry(initial: u32) -> SocketEntry {
        SocketEntry {
            single_initial_item_hash: initial,
            ..Default::default()
        }
    }

    fn plugs(defs: Vec<(u32, &str, &str)>) -> DefinitionMap {
        defs.into_iter()
            .map(|(hash, name, category)| (hash, Arc::new(plug_definition(hash, name, category))))
            .collect()
    }

    #[test]
    fn test_weapon_without_sockets() {
        let roll = classify(
            &Definition::default(),
            &PlugAssignments::new(),
            &ResolvedDefinitions::default(),
        );
        assert_eq!(roll.perk_count(), 0);
    }

    #[test]
    fn test_legacy_traits_in_array_order() {
        let mut weapon = Definition::default();
        weapon.sockets = Some(SocketLayout {
            socket_entries: vec![entry(1), entry(2), entry(3)],
            socket_categories: vec![SocketCategory {
                socket_category_hash: 3956125808,
                socket_indexes: vec![0],
            }],
        });
        let resolved = ResolvedDefinitions {
            plugs: plugs(vec![
                (1, "Smallbore", "barrels"),
                (2, "Outlaw", "frames"),
                (3, "Rampage", "traits"),
            ]),
            plug_sets: DefinitionMap::new(),
        };
        let roll = classify(&weapon, &PlugAssignments::new(), &resolved);
        assert_eq!(roll.get(PerkSlot::Barrel)[0].name, "Smallbore");
        assert_eq!(roll.get(PerkSlot::Trait1)[0].name, "Outlaw");
        assert_eq!(roll.get(PerkSlot::Trait2)[0].name, "Rampage");
    }

    #[test]
    fn test_intrinsic_frame_kept_in_intrinsic_socket() {
        let mut frame = plug_definition(1, "Adaptive Frame", "intrinsics");
        frame.item_type_display_name = "Intrinsic".to_string();
        let mut weapon = Definition::default();
        weapon.sockets = Some(SocketLayout {
            socket_entries: vec![entry(1)],
            socket_categories: vec![],
        });
        let resolved = ResolvedDefinitions {
            plugs: [(1, Arc::new(frame))].into_iter().collect(),
            plug_sets: DefinitionMap::new(),
        };
        let roll = classify(&weapon, &PlugAssignments::new(), &resolved);
        assert_eq!(roll.get(PerkSlot::Intrinsic)[0].name, "Adaptive Frame");
    }

    #[test]
    fn test_placeholder_key_plug_still_classifies_socket() {
        let mut weapon = Definition::default();
        weapon.sockets = Some(SocketLayout {
            socket_entries: vec![SocketEntry {
                single_initial_item_hash: 1,
                reusable_plug_items: vec![crate::catalog::PlugItem {
                    plug_item_hash: 2,
                    currently_can_roll: None,
                }],
                ..Default::default()
            }],
            socket_categories: vec![],
        });
        let resolved = ResolvedDefinitions {
            plugs: plugs(vec![(1, "Default Shader", "shader"), (2, "Gilded", "shader")]),
            plug_sets: DefinitionMap::new(),
        };
        let roll = classify(&weapon, &PlugAssignments::new(), &resolved);
        let shaders: Vec<&str> = roll.get(PerkSlot::Shader).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(shaders, vec!["Gilded"]);
    }

    #[test]
    fn test_required_hashes() {
        let mut weapon = Definition::default();
        weapon.sockets = Some(SocketLayout {
            socket_entries: vec![
                SocketEntry {
                    single_initial_item_hash: 1,
                    randomized_plug_set_hash: Some(900),
                    ..Default::default()
                },
                SocketEntry {
                    reusable_plug_set_hash: Some(900),
                    ..Default::default()
                },
            ],
            socket_categories: vec![],
        });
        assert_eq!(required_plug_sets(&weapon), vec![900]);

        let mut set = Definition::default();
        set.reusable_plug_items = vec![crate::catalog::PlugItem {
            plug_item_hash: 2,
            currently_can_roll: Some(true),
        }];
        let plug_sets: DefinitionMap = [(900, Arc::new(set))].into_iter().collect();
        let mut live = PlugAssignments::new();
        live.insert(1, [3]);
        assert_eq!(required_plugs(&weapon, &live, &plug_sets), vec![1, 2, 3]);
    }
}
