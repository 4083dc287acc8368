//! Persisted per-user results and their staleness policy.

mod staleness;
mod user_table;

pub use staleness::{CacheEntry, StalenessPolicy, is_stale, oldest};
pub use user_table::{UserRow, UserTable};

/// File name of the per-user classified weapon table.
pub const ROLLUP_TABLE_FILE: &str = "weapon_rollups.json";

/// File name of the per-user decoded record table.
pub const RECORD_TABLE_FILE: &str = "records.json";
