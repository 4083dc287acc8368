//! Mock catalog tiers for testing
//!
//! `MockCatalogSource` answers from an in-memory table and records every
//! request it receives; `InMemoryStore` is a definition store with no file
//! behind it.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use serde_json::Value;

use super::definition::{Definition, PlugInfo};
use super::hash::{DefinitionHash, Table};
use super::source::CatalogSource;
use super::store::DefinitionStore;
use crate::error::{Error, Result};

/// Definition with the given hash and display name
pub fn named_definition(hash: DefinitionHash, name: &str) -> Definition {
    let mut def = Definition {
        hash,
        ..Default::default()
    };
    def.display_properties.name = name.to_string();
    def
}

/// Plug definition with a name and plug-category identifier
pub fn plug_definition(hash: DefinitionHash, name: &str, plug_category: &str) -> Definition {
    let mut def = named_definition(hash, name);
    def.plug = Some(PlugInfo {
        plug_category_identifier: plug_category.to_string(),
    });
    def
}

/// Catalog source backed by a map, recording batch sizes and requested hashes
#[derive(Debug, Default)]
pub struct MockCatalogSource {
    definitions: HashMap<(Table, DefinitionHash), Definition>,
    batch_sizes: Mutex<Vec<usize>>,
    requested: Mutex<Vec<DefinitionHash>>,
    single_fetches: AtomicUsize,
    batch_calls: AtomicUsize,
    failing_calls: HashSet<usize>,
    cancel_after: Option<(usize, Arc<AtomicBool>)>,
}

impl MockCatalogSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, table: Table, hash: DefinitionHash, definition: Definition) {
        self.definitions.insert((table, hash), definition);
    }

    /// Builder variant of [`MockCatalogSource::insert`]
    pub fn with(mut self, table: Table, hash: DefinitionHash, definition: Definition) -> Self {
        self.insert(table, hash, definition);
        self
    }

    /// Make the given 0-indexed batch call fail with a transient error
    pub fn failing_on_call(mut self, call: usize) -> Self {
        self.failing_calls.insert(call);
        self
    }

    /// Raise `flag` once `calls` batch calls have completed
    pub fn cancel_after(mut self, calls: usize, flag: Arc<AtomicBool>) -> Self {
        self.cancel_after = Some((calls, flag));
        self
    }

    /// Sizes of every batch request, in call order
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Every hash requested through batch calls, in call order
    pub fn requested_hashes(&self) -> Vec<DefinitionHash> {
        self.requested.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn single_fetches(&self) -> usize {
        self.single_fetches.load(Ordering::SeqCst)
    }
}

impl CatalogSource for MockCatalogSource {
    fn fetch(&self, table: Table, hash: DefinitionHash) -> Result<Option<Definition>> {
        self.single_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.definitions.get(&(table, hash)).cloned())
    }

    fn fetch_batch(
        &self,
        table: Table,
        hashes: &[DefinitionHash],
    ) -> Result<Vec<(DefinitionHash, Definition)>> {
        let call = self.batch_calls.fetch_add(1, Ordering::SeqCst);
        self.batch_sizes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(hashes.len());
        self.requested
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend_from_slice(hashes);

        if let Some((after, flag)) = &self.cancel_after
            && call + 1 >= *after
        {
            flag.store(true, Ordering::SeqCst);
        }

        if self.failing_calls.contains(&call) {
            return Err(Error::Timeout(format!("mock batch call {}", call)));
        }

        Ok(hashes
            .iter()
            .filter_map(|&hash| {
                self.definitions
                    .get(&(table, hash))
                    .map(|def| (hash, def.clone()))
            })
            .collect())
    }
}

/// Definition store without a backing file
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, Value>>,
    flushes: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw payload, including malformed ones
    pub fn insert_raw(&self, key: &str, payload: Value) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), payload);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn flushes(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

impl DefinitionStore for InMemoryStore {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        Ok(self
            .entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned())
    }

    fn save(&self, key: &str, definition: &Definition) -> Result<()> {
        let value = serde_json::to_value(definition)?;
        self.insert_raw(key, value);
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
