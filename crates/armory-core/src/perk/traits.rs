use tracing::warn;

use crate::catalog::DefinitionHash;

use super::slot::PerkDescriptor;

/// Socket category tagging the two random trait columns of a weapon.
pub const WEAPON_PERKS_SOCKET_CATEGORY: DefinitionHash = 4241085061;

/// A socket holding trait perks, with the position used to order columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitSocket {
    pub position: u32,
    pub perks: Vec<PerkDescriptor>,
}

/// Assign trait sockets to the two trait columns by ascending position.
///
/// Sockets beyond the second are dropped with a warning. A socket without
/// surviving perks still occupies its column.
pub fn resolve_trait_columns(
    weapon_name: &str,
    mut sockets: Vec<TraitSocket>,
) -> [Vec<PerkDescriptor>; 2] {
    sockets.sort_by_key(|socket| socket.position);

    if sockets.len() > 2 {
        warn!(
            "{} has {} trait sockets, keeping the first two",
            weapon_name,
            sockets.len()
        );
    }

    let mut columns = sockets.into_iter().map(|socket| socket.perks);
    let first = columns.next().unwrap_or_default();
    let second = columns.next().unwrap_or_default();
    [first, second]
}
