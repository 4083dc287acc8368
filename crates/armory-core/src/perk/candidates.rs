use std::collections::HashSet;

use crate::catalog::{Definition, DefinitionHash, DefinitionMap, SocketEntry};

use super::slot::PerkDescriptor;

/// Every plug hash a socket can hold, deduplicated, in enumeration order:
/// initial plug, inline reusable plugs, plug-set entries (reusable set
/// first), then the live plugs of the instance.
pub fn candidate_hashes(
    entry: &SocketEntry,
    live: &[DefinitionHash],
    plug_sets: &DefinitionMap,
) -> Vec<DefinitionHash> {
    let mut seen = HashSet::new();
    let mut hashes = Vec::new();
    let mut push = |hash: DefinitionHash| {
        if hash != 0 && seen.insert(hash) {
            hashes.push(hash);
        }
    };

    if let Some(initial) = entry.initial_plug() {
        push(initial);
    }
    for item in &entry.reusable_plug_items {
        push(item.plug_item_hash);
    }
    for set_hash in entry.plug_set_hashes() {
        if let Some(set) = plug_sets.get(&set_hash) {
            for item in &set.reusable_plug_items {
                push(item.plug_item_hash);
            }
        }
    }
    for &hash in live {
        push(hash);
    }

    hashes
}

/// Placeholder plugs never count as perks.
///
/// Intrinsic frame plugs are placeholders everywhere except in the socket
/// classified as intrinsic.
pub fn is_placeholder(def: &Definition, as_intrinsic: bool) -> bool {
    let name = def.display_properties.name.to_lowercase();
    if name.trim().is_empty()
        || name.contains("empty")
        || name.contains("default")
        || name.contains("(random mod)")
    {
        return true;
    }
    !as_intrinsic
        && def.item_type_display_name.eq_ignore_ascii_case("intrinsic")
        && name.contains("frame")
}

/// Resolve candidates to descriptors, dropping unresolved and placeholder plugs.
pub fn surviving_perks(
    candidates: &[DefinitionHash],
    plugs: &DefinitionMap,
    as_intrinsic: bool,
) -> Vec<PerkDescriptor> {
    candidates
        .iter()
        .filter_map(|hash| plugs.get(hash).map(|def| (*hash, def)))
        .filter(|(_, def)| !is_placeholder(def, as_intrinsic))
        .map(|(hash, def)| PerkDescriptor::from_definition(hash, def))
        .collect()
}

/// Plug whose category identifier decides the socket's slot: the equipped
/// live plug, else the initial plug, else the first resolvable candidate.
pub fn key_plug<'a>(
    entry: &SocketEntry,
    live: &[DefinitionHash],
    candidates: &[DefinitionHash],
    plugs: &'a DefinitionMap,
) -> Option<&'a Definition> {
    live.first()
        .and_then(|hash| plugs.get(hash))
        .or_else(|| entry.initial_plug().and_then(|hash| plugs.get(&hash)))
        .or_else(|| candidates.iter().find_map(|hash| plugs.get(hash)))
        .map(|def| def.as_ref())
}
