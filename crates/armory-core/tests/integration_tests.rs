//! Integration tests for armory-core
//!
//! These tests exercise the resolver, classifier and record decoder
//! together against the mock catalog fixtures in `common`.

mod common;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use armory_core::catalog::mock::{InMemoryStore, MockCatalogSource, named_definition};
use armory_core::catalog::{DefinitionResolver, FileDefinitionStore, MemoryCache, Table};
use armory_core::error::Error;
use armory_core::perk::{PerkSlot, PlugAssignments, classify};
use armory_core::record::{
    ObjectiveProgress, RecordFilter, RecordInstance, RecordState, RelevanceMode, decode_record,
};

fn names(perks: &[armory_core::PerkDescriptor]) -> Vec<&str> {
    perks.iter().map(|p| p.name.as_str()).collect()
}

mod resolver_tests {
    use super::*;

    fn source_with(count: u32) -> MockCatalogSource {
        let mut source = MockCatalogSource::new();
        for hash in 0..count {
            source.insert(Table::InventoryItem, hash, named_definition(hash, "perk"));
        }
        source
    }

    #[test]
    fn test_250_hashes_issue_three_chunks() {
        let source = source_with(250);
        let store = InMemoryStore::new();
        let mut resolver = DefinitionResolver::new(&source, &store).with_page_size(100);

        let hashes: Vec<u32> = (0..250).collect();
        let map = resolver.get_batch(Table::InventoryItem, &hashes).unwrap();

        assert_eq!(source.batch_sizes(), vec![100, 100, 50]);
        assert_eq!(map.len(), 250);
        let mut requested = source.requested_hashes();
        requested.sort_unstable();
        requested.dedup();
        assert_eq!(requested.len(), 250);
    }

    #[test]
    fn test_second_batch_served_from_memory() {
        let source = source_with(10);
        let store = InMemoryStore::new();
        let mut resolver = DefinitionResolver::new(&source, &store);

        let hashes: Vec<u32> = (0..10).collect();
        resolver.get_batch(Table::InventoryItem, &hashes).unwrap();
        resolver.get_batch(Table::InventoryItem, &hashes).unwrap();

        assert_eq!(source.batch_sizes(), vec![10]);
        assert_eq!(resolver.stats().memory_hits, 10);
        assert_eq!(store.len(), 10);
    }

    #[test]
    fn test_unresolvable_hashes_omitted() {
        let source = source_with(5);
        let store = InMemoryStore::new();
        let mut resolver = DefinitionResolver::new(&source, &store);

        let map = resolver
            .get_batch(Table::InventoryItem, &[1, 2, 404, 405])
            .unwrap();
        assert_eq!(map.len(), 2);
        assert!(!map.contains_key(&404));
    }

    #[test]
    fn test_cancel_between_chunks_discards_partial_map() {
        let flag = Arc::new(AtomicBool::new(false));
        let source = source_with(250).cancel_after(1, Arc::clone(&flag));
        let store = InMemoryStore::new();
        let mut resolver = DefinitionResolver::new(&source, &store)
            .with_page_size(100)
            .with_cancel_flag(flag);

        let hashes: Vec<u32> = (0..250).collect();
        let result = resolver.get_batch(Table::InventoryItem, &hashes);

        assert!(matches!(result, Err(Error::Cancelled)));
        assert_eq!(source.batch_sizes(), vec![100]);
    }

    #[test]
    fn test_file_store_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let source = source_with(3);
        {
            let store = FileDefinitionStore::in_dir(dir.path());
            let mut resolver = DefinitionResolver::new(&source, &store);
            resolver.get_batch(Table::InventoryItem, &[0, 1, 2]).unwrap();
            resolver.flush().unwrap();
        }

        let offline = MockCatalogSource::new();
        let store = FileDefinitionStore::in_dir(dir.path());
        let mut resolver = DefinitionResolver::new(&offline, &store)
            .with_memory(Arc::new(MemoryCache::new()));
        let map = resolver.get_batch(Table::InventoryItem, &[0, 1, 2]).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(resolver.stats().store_hits, 3);
        assert!(offline.batch_sizes().is_empty());
    }
}

mod classifier_tests {
    use super::*;

    #[test]
    fn test_full_weapon_classification() {
        let roll = classify(&common::weapon(), &PlugAssignments::new(), &common::resolved());

        assert_eq!(names(roll.get(PerkSlot::Intrinsic)), vec!["Adaptive Frame"]);
        assert_eq!(names(roll.get(PerkSlot::Barrel)), vec!["Smallbore", "Arrowhead Brake"]);
        assert_eq!(
            names(roll.get(PerkSlot::Magazine)),
            vec!["Ricochet Rounds", "Flared Magwell"]
        );
        assert_eq!(names(roll.get(PerkSlot::OriginTrait)), vec!["Veist Stinger"]);
        assert_eq!(names(roll.get(PerkSlot::Masterwork)), vec!["Masterworked: Range"]);
        assert_eq!(names(roll.get(PerkSlot::WeaponMod)), vec!["Backup Mag"]);
        assert_eq!(names(roll.get(PerkSlot::Shader)), vec!["Gilded Age"]);
        assert!(roll.get(PerkSlot::Other).is_empty());
    }

    #[test]
    fn test_trait_columns_follow_declared_position() {
        let roll = classify(&common::weapon(), &PlugAssignments::new(), &common::resolved());
        assert_eq!(names(roll.get(PerkSlot::Trait1)), vec!["Outlaw", "Rapid Hit"]);
        assert_eq!(
            names(roll.get(PerkSlot::Trait2)),
            vec!["Firefly", "Explosive Payload"]
        );
    }

    #[test]
    fn test_trait_columns_independent_of_array_order() {
        let mut reversed = common::weapon();
        if let Some(layout) = reversed.sockets.as_mut() {
            layout.socket_entries.reverse();
            layout.socket_categories[0].socket_indexes.reverse();
        }
        let roll = classify(&reversed, &PlugAssignments::new(), &common::resolved());
        assert_eq!(names(roll.get(PerkSlot::Trait1)), vec!["Outlaw", "Rapid Hit"]);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let weapon = common::weapon();
        let resolved = common::resolved();
        let mut live = PlugAssignments::new();
        live.insert(2, [41]);
        let first = classify(&weapon, &live, &resolved);
        let second = classify(&weapon, &live, &resolved);
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_live_plug_is_ignored() {
        let mut live = PlugAssignments::new();
        live.insert(1, [999_999]);
        let roll = classify(&common::weapon(), &live, &common::resolved());
        assert_eq!(roll.get(PerkSlot::Barrel).len(), 2);
    }

    #[test]
    fn test_icon_urls_reconstructable() {
        let roll = classify(&common::weapon(), &PlugAssignments::new(), &common::resolved());
        let outlaw = &roll.get(PerkSlot::Trait1)[0];
        assert_eq!(
            outlaw.icon_url().as_deref(),
            Some("https://www.bungie.net/icons/40.png")
        );
    }
}

mod record_tests {
    use super::*;

    fn profile(state: u32) -> BTreeMap<u32, RecordInstance> {
        let mut records = BTreeMap::new();
        records.insert(
            common::RECORD_CATALYST,
            RecordInstance {
                state,
                objectives: vec![
                    ObjectiveProgress {
                        objective_hash: 7001,
                        progress: 5,
                        completion_value: Some(10),
                        complete: false,
                    },
                    ObjectiveProgress {
                        objective_hash: 7002,
                        progress: 0,
                        completion_value: Some(5),
                        complete: false,
                    },
                ],
            },
        );
        records.insert(
            common::RECORD_LORE,
            RecordInstance {
                state: 0,
                objectives: Vec::new(),
            },
        );
        records
    }

    #[test]
    fn test_bitmask_table() {
        let cases = [
            (4, Some(false), Some(true), Some(true)),
            (0, Some(true), Some(true), Some(true)),
            (5, Some(true), None, None),
            (8, None, Some(false), None),
            (16, None, None, Some(false)),
        ];
        for (raw, complete, unlocked, visible) in cases {
            let state = RecordState::decode(raw);
            if let Some(expected) = complete {
                assert_eq!(state.complete, expected, "complete for {}", raw);
            }
            if let Some(expected) = unlocked {
                assert_eq!(state.unlocked, expected, "unlocked for {}", raw);
            }
            if let Some(expected) = visible {
                assert_eq!(state.visible, expected, "visible for {}", raw);
            }
        }
    }

    #[test]
    fn test_redeemed_or_semantics_preserved() {
        // Redeemed (bit 0) with a lingering not-completed bit (bit 2) is complete.
        assert!(RecordState::decode(0b101).complete);
    }

    #[test]
    fn test_decode_through_resolver() {
        let source = common::catalog();
        let store = InMemoryStore::new();
        let mut resolver = DefinitionResolver::new(&source, &store);
        let profile = profile(4);

        let records = resolver
            .get_batch(Table::Record, &[common::RECORD_CATALYST, common::RECORD_LORE])
            .unwrap();
        let objectives = resolver.get_batch(Table::Objective, &[7001, 7002]).unwrap();
        let filter = RecordFilter::default();

        let decoded: Vec<_> = profile
            .iter()
            .filter_map(|(&hash, instance)| {
                decode_record(hash, instance, &records, &objectives, &filter, RelevanceMode::Strict)
            })
            .collect();

        assert_eq!(decoded.len(), 1);
        let catalyst = &decoded[0];
        assert_eq!(catalyst.name, "Fatebringer Catalyst");
        assert!(!catalyst.complete);
        assert!((catalyst.progress - 33.3).abs() < 0.1);
        assert_eq!(catalyst.objectives[0].description, "Precision kills");
    }

    #[test]
    fn test_allow_list_admits_unmarked_record() {
        let source = common::catalog();
        let store = InMemoryStore::new();
        let mut resolver = DefinitionResolver::new(&source, &store);
        let records = resolver.get_batch(Table::Record, &[common::RECORD_LORE]).unwrap();
        let filter = RecordFilter::new("Catalyst", Vec::new(), [common::RECORD_LORE]);

        let instance = RecordInstance::default();
        assert!(
            decode_record(
                common::RECORD_LORE,
                &instance,
                &records,
                &Default::default(),
                &filter,
                RelevanceMode::Discovery
            )
            .is_some()
        );
    }
}
