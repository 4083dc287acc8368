use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::definition::Definition;
use super::hash::{DefinitionHash, Table};

/// Process-wide memory tier of the resolver.
///
/// Entries are immutable once inserted. Share one instance between
/// resolvers with `Arc<MemoryCache>`.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<(Table, DefinitionHash), Arc<Definition>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, table: Table, hash: DefinitionHash) -> Option<Arc<Definition>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(&(table, hash)).cloned()
    }

    /// Insert unless an entry already exists; returns the cached entry.
    pub fn insert(&self, table: Table, hash: DefinitionHash, definition: Definition) -> Arc<Definition> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries
            .entry((table, hash))
            .or_insert_with(|| Arc::new(definition))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Definition {
        let mut def = Definition::default();
        def.display_properties.name = name.to_string();
        def
    }

    #[test]
    fn test_insert_if_absent() {
        let cache = MemoryCache::new();
        let first = cache.insert(Table::InventoryItem, 1, named("first"));
        let second = cache.insert(Table::InventoryItem, 1, named("second"));
        assert_eq!(first.name(), "first");
        assert_eq!(second.name(), "first");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_tables_are_separate_keys() {
        let cache = MemoryCache::new();
        cache.insert(Table::InventoryItem, 7, named("item"));
        assert!(cache.get(Table::PlugSet, 7).is_none());
        assert_eq!(cache.get(Table::InventoryItem, 7).unwrap().name(), "item");
    }
}
