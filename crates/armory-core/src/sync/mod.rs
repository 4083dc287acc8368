//! Per-user sync orchestration.

mod model;
mod pipeline;

pub use model::{
    ClassifiedWeapon, PersistedRecord, SyncOutcome, SyncSource, TableStatus, WeaponInstance,
};
pub use pipeline::SyncPipeline;
