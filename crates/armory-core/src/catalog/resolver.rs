use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use super::definition::Definition;
use super::hash::{DefinitionHash, Table};
use super::memory::MemoryCache;
use super::source::CatalogSource;
use super::store::{DefinitionStore, decode_payload};
use crate::config::catalog as catalog_config;
use crate::error::{Error, Result};

/// Resolved definitions keyed by hash.
pub type DefinitionMap = HashMap<DefinitionHash, Arc<Definition>>;

/// Counters of which tier answered each lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverStats {
    pub memory_hits: usize,
    pub store_hits: usize,
    pub remote_hits: usize,
    pub misses: usize,
    pub chunks: usize,
}

impl std::fmt::Display for ResolverStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "memory={} store={} remote={} missing={} chunks={}",
            self.memory_hits, self.store_hits, self.remote_hits, self.misses, self.chunks
        )
    }
}

/// Three-tier definition lookup: memory, then the persistent store, then
/// the remote catalog.
///
/// Remote failures never surface as errors; unresolvable hashes are simply
/// absent from the result. The only error from [`get_batch`] is
/// [`Error::Cancelled`].
///
/// [`get_batch`]: DefinitionResolver::get_batch
pub struct DefinitionResolver<S, D> {
    source: S,
    store: D,
    memory: Arc<MemoryCache>,
    page_size: usize,
    cancel: Option<Arc<AtomicBool>>,
    stats: ResolverStats,
}

impl<S: CatalogSource, D: DefinitionStore> DefinitionResolver<S, D> {
    pub fn new(source: S, store: D) -> Self {
        Self {
            source,
            store,
            memory: Arc::new(MemoryCache::new()),
            page_size: catalog_config::PAGE_SIZE,
            cancel: None,
            stats: ResolverStats::default(),
        }
    }

    /// Share an existing memory tier.
    pub fn with_memory(mut self, memory: Arc<MemoryCache>) -> Self {
        self.memory = memory;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Flag checked before each remote chunk.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn memory(&self) -> Arc<MemoryCache> {
        Arc::clone(&self.memory)
    }

    pub fn stats(&self) -> ResolverStats {
        self.stats
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn store(&self) -> &D {
        &self.store
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Resolve a single hash.
    pub fn get(&mut self, table: Table, hash: DefinitionHash) -> Option<Arc<Definition>> {
        if let Some(def) = self.lookup_cached(table, hash) {
            return Some(def);
        }
        match self.source.fetch(table, hash) {
            Ok(Some(def)) => {
                self.stats.remote_hits += 1;
                Some(self.remember(table, hash, def))
            }
            Ok(None) => {
                debug!("{} {} not found in catalog", table, hash);
                self.stats.misses += 1;
                None
            }
            Err(e) => {
                warn!("Failed to fetch {} {}: {}", table, hash, e);
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Resolve many hashes of one table.
    ///
    /// Duplicates collapse; cached hashes never reach the remote catalog and
    /// remote misses are fetched in sequential chunks of at most
    /// `page_size`. A failed chunk is logged and dropped.
    pub fn get_batch(&mut self, table: Table, hashes: &[DefinitionHash]) -> Result<DefinitionMap> {
        let mut resolved = DefinitionMap::new();
        let mut seen = HashSet::new();
        let mut missing = Vec::new();

        for &hash in hashes {
            if !seen.insert(hash) {
                continue;
            }
            match self.lookup_cached(table, hash) {
                Some(def) => {
                    resolved.insert(hash, def);
                }
                None => missing.push(hash),
            }
        }

        if missing.is_empty() {
            return Ok(resolved);
        }

        debug!(
            "Fetching {} uncached {} definitions in chunks of {}",
            missing.len(),
            table,
            self.page_size
        );

        for chunk in missing.chunks(self.page_size) {
            if self.is_cancelled() {
                info!("Batch resolution of {} cancelled", table);
                return Err(Error::Cancelled);
            }
            self.stats.chunks += 1;

            let rows = match self.source.fetch_batch(table, chunk) {
                Ok(rows) => rows,
                Err(e) => {
                    warn!(
                        "Dropping chunk of {} {} hashes after fetch failure: {}",
                        chunk.len(),
                        table,
                        e
                    );
                    continue;
                }
            };

            let requested: HashSet<DefinitionHash> = chunk.iter().copied().collect();
            for (hash, def) in rows {
                if !requested.contains(&hash) || resolved.contains_key(&hash) {
                    continue;
                }
                self.stats.remote_hits += 1;
                let def = self.remember(table, hash, def);
                resolved.insert(hash, def);
            }
        }

        let unresolved = seen.len() - resolved.len();
        if unresolved > 0 {
            debug!("{} {} hashes could not be resolved", unresolved, table);
            self.stats.misses += unresolved;
        }

        Ok(resolved)
    }

    /// Persist pending store writes.
    pub fn flush(&self) -> Result<()> {
        self.store.flush()
    }

    fn lookup_cached(&mut self, table: Table, hash: DefinitionHash) -> Option<Arc<Definition>> {
        if let Some(def) = self.memory.get(table, hash) {
            self.stats.memory_hits += 1;
            return Some(def);
        }

        let key = table.store_key(hash);
        let payload = match self.store.load(&key) {
            Ok(payload) => payload?,
            Err(e) => {
                warn!("Failed to read cached definition {}: {}", key, e);
                return None;
            }
        };
        let def = decode_payload(&key, payload)?;
        self.stats.store_hits += 1;
        Some(self.memory.insert(table, hash, def))
    }

    fn remember(&self, table: Table, hash: DefinitionHash, def: Definition) -> Arc<Definition> {
        let key = table.store_key(hash);
        if let Err(e) = self.store.save(&key, &def) {
            warn!("Failed to persist definition {}: {}", key, e);
        }
        self.memory.insert(table, hash, def)
    }
}
