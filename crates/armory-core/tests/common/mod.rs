//! Shared catalog fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use armory_core::catalog::mock::{MockCatalogSource, named_definition, plug_definition};
use armory_core::catalog::{
    Definition, DefinitionMap, PlugItem, SocketCategory, SocketEntry, SocketLayout, Table,
};
use armory_core::perk::{ResolvedDefinitions, WEAPON_MOD_ITEM_CATEGORY, WEAPON_PERKS_SOCKET_CATEGORY};

pub const WEAPON_HASH: u32 = 1000;
pub const RECORD_CATALYST: u32 = 5000;
pub const RECORD_LORE: u32 = 5001;
pub const RECORD_LOCKED_CATALYST: u32 = 5002;

fn items(hashes: &[u32]) -> Vec<PlugItem> {
    hashes
        .iter()
        .map(|&h| PlugItem {
            plug_item_hash: h,
            currently_can_roll: Some(true),
        })
        .collect()
}

fn socket(index: u32, initial: u32) -> SocketEntry {
    SocketEntry {
        socket_index: Some(index),
        single_initial_item_hash: initial,
        ..Default::default()
    }
}

fn socket_with_set(index: u32, initial: u32, plug_set: u32) -> SocketEntry {
    SocketEntry {
        randomized_plug_set_hash: Some(plug_set),
        ..socket(index, initial)
    }
}

/// Weapon with trait sockets declared at positions 5 and 2, in that array order.
pub fn weapon() -> Definition {
    let mut def = named_definition(WEAPON_HASH, "Fatebringer");
    def.item_type_display_name = "Hand Cannon".to_string();
    def.sockets = Some(SocketLayout {
        socket_entries: vec![
            socket(0, 10),
            socket_with_set(1, 20, 900),
            socket_with_set(5, 0, 903),
            socket_with_set(2, 0, 902),
            socket_with_set(3, 30, 901),
            socket(6, 60),
            socket(7, 70),
            SocketEntry {
                reusable_plug_items: items(&[81]),
                ..socket(8, 80)
            },
            SocketEntry {
                reusable_plug_items: items(&[91]),
                ..socket(9, 90)
            },
        ],
        socket_categories: vec![SocketCategory {
            socket_category_hash: WEAPON_PERKS_SOCKET_CATEGORY,
            socket_indexes: vec![5, 2],
        }],
    });
    def
}

fn typed(hash: u32, name: &str, category: &str, type_name: &str) -> Definition {
    let mut def = plug_definition(hash, name, category);
    def.item_type_display_name = type_name.to_string();
    def.display_properties.icon = Some(format!("/icons/{}.png", hash));
    def
}

pub fn plugs() -> Vec<(u32, Definition)> {
    let mut backup_mag = typed(81, "Backup Mag", "v400.weapon.mod_magazine", "Weapon Mod");
    backup_mag.item_category_hashes = vec![WEAPON_MOD_ITEM_CATEGORY];
    vec![
        (10, typed(10, "Adaptive Frame", "intrinsics", "Intrinsic")),
        (20, typed(20, "Smallbore", "barrels", "Barrel")),
        (21, typed(21, "Arrowhead Brake", "barrels", "Barrel")),
        (30, typed(30, "Ricochet Rounds", "magazines", "Magazine")),
        (31, typed(31, "Flared Magwell", "magazines", "Magazine")),
        (40, typed(40, "Outlaw", "frames", "Trait")),
        (41, typed(41, "Rapid Hit", "frames", "Trait")),
        (50, typed(50, "Firefly", "frames", "Trait")),
        (51, typed(51, "Explosive Payload", "frames", "Trait")),
        (60, typed(60, "Veist Stinger", "origins", "Origin Trait")),
        (70, typed(70, "Masterworked: Range", "v400.plugs.weapons.masterworks.stat.range", "Masterwork")),
        (80, typed(80, "Empty Mod Socket", "v400.weapon.mod_empty", "Weapon Mod")),
        (81, backup_mag),
        (90, typed(90, "Default Shader", "shader", "Shader")),
        (91, typed(91, "Gilded Age", "shader", "Shader")),
    ]
}

pub fn plug_sets() -> Vec<(u32, Definition)> {
    [
        (900, vec![20, 21]),
        (901, vec![30, 31]),
        (902, vec![40, 41]),
        (903, vec![50, 51]),
    ]
    .into_iter()
    .map(|(hash, plug_hashes)| {
        let mut def = named_definition(hash, "");
        def.reusable_plug_items = items(&plug_hashes);
        (hash, def)
    })
    .collect()
}

pub fn resolved() -> ResolvedDefinitions {
    ResolvedDefinitions {
        plugs: plugs()
            .into_iter()
            .map(|(h, d)| (h, Arc::new(d)))
            .collect::<DefinitionMap>(),
        plug_sets: plug_sets()
            .into_iter()
            .map(|(h, d)| (h, Arc::new(d)))
            .collect::<DefinitionMap>(),
    }
}

fn objective(hash: u32, text: &str) -> Definition {
    let mut def = named_definition(hash, "");
    def.progress_description = text.to_string();
    def
}

/// Mock catalog holding the weapon, its plugs and plug sets, and three records.
pub fn catalog() -> MockCatalogSource {
    let mut source = MockCatalogSource::new();
    source.insert(Table::InventoryItem, WEAPON_HASH, weapon());
    for (hash, def) in plugs() {
        source.insert(Table::InventoryItem, hash, def);
    }
    for (hash, def) in plug_sets() {
        source.insert(Table::PlugSet, hash, def);
    }

    let mut catalyst = named_definition(RECORD_CATALYST, "Fatebringer Catalyst");
    catalyst.objective_hashes = vec![7001, 7002];
    source.insert(Table::Record, RECORD_CATALYST, catalyst);
    source.insert(Table::Record, RECORD_LORE, named_definition(RECORD_LORE, "Lore: Fatebringer"));
    let mut locked = named_definition(RECORD_LOCKED_CATALYST, "Thorn Catalyst");
    locked.objective_hashes = vec![7002];
    source.insert(Table::Record, RECORD_LOCKED_CATALYST, locked);
    source.insert(Table::Objective, 7001, objective(7001, "Precision kills"));
    source.insert(Table::Objective, 7002, objective(7002, "Defeat champions"));
    source
}
