//! Catalog resolution, weapon perk classification and record decoding.
//!
//! Definitions are resolved through [`catalog::DefinitionResolver`], a
//! memory / persistent store / remote catalog lookup. Resolved plugs feed
//! [`perk::classify`] and resolved records feed [`record::decode_record`];
//! [`sync::SyncPipeline`] serves persisted per-user results while they are
//! fresh and recomputes them otherwise.

pub mod catalog;
pub mod config;
pub mod error;
pub mod network;
pub mod perk;
pub mod record;
pub mod retry;
pub mod storage;
pub mod sync;

pub use catalog::{
    CatalogSource, Definition, DefinitionHash, DefinitionMap, DefinitionResolver,
    DefinitionStore, FileDefinitionStore, MemoryCache, ResolverStats, Table,
};
pub use config::Config;
pub use error::{Error, Result};
pub use network::{CatalogClient, RetryingSource};
pub use perk::{ClassifiedRoll, PerkDescriptor, PerkSlot, PlugAssignments, classify};
pub use record::{DecodedRecord, RecordFilter, RecordInstance, RecordState, RelevanceMode};
pub use retry::{ExponentialBackoff, FixedDelay, NoRetry, RetryStrategy};
pub use storage::{CacheEntry, StalenessPolicy, is_stale};
pub use sync::{ClassifiedWeapon, SyncOutcome, SyncPipeline, SyncSource, WeaponInstance};
