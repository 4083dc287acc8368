use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::catalog::{CatalogSource, DefinitionHash, DefinitionResolver, DefinitionStore, Table};
use crate::error::{Error, Result};
use crate::perk::{ResolvedDefinitions, classify, required_plug_sets, required_plugs};
use crate::record::{
    DecodedRecord, RecordFilter, RecordInstance, RelevanceMode, declared_objective_hashes,
    decode_record, required_hashes,
};
use crate::storage::{
    RECORD_TABLE_FILE, ROLLUP_TABLE_FILE, StalenessPolicy, UserTable, oldest,
};

use super::model::{
    ClassifiedWeapon, PersistedRecord, SyncOutcome, SyncSource, TableStatus, WeaponInstance,
};

/// Per-user "serve persisted or recompute" orchestration.
///
/// A fresh persisted set is returned as is. Otherwise definitions are
/// resolved in batches, every item is classified or decoded, and the
/// user's persisted set is replaced in one write. A cancelled run returns
/// [`Error::Cancelled`] and leaves the persisted set untouched.
pub struct SyncPipeline<S, D> {
    resolver: DefinitionResolver<S, D>,
    rollups: UserTable<ClassifiedWeapon>,
    records: UserTable<PersistedRecord>,
    policy: StalenessPolicy,
    filter: RecordFilter,
    cancel: Option<Arc<AtomicBool>>,
}

impl<S: CatalogSource, D: DefinitionStore> SyncPipeline<S, D> {
    pub fn new(
        resolver: DefinitionResolver<S, D>,
        rollups: UserTable<ClassifiedWeapon>,
        records: UserTable<PersistedRecord>,
    ) -> Self {
        Self {
            resolver,
            rollups,
            records,
            policy: StalenessPolicy::default(),
            filter: RecordFilter::default(),
            cancel: None,
        }
    }

    /// Open the rollup and record tables under `dir`.
    pub fn open_in<P: AsRef<Path>>(resolver: DefinitionResolver<S, D>, dir: P) -> Self {
        let dir = dir.as_ref();
        Self::new(
            resolver,
            UserTable::open(dir.join(ROLLUP_TABLE_FILE)),
            UserTable::open(dir.join(RECORD_TABLE_FILE)),
        )
    }

    pub fn with_policy(mut self, policy: StalenessPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_filter(mut self, filter: RecordFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Flag checked between chunks and between items.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.resolver = self.resolver.with_cancel_flag(Arc::clone(&cancel));
        self.cancel = Some(cancel);
        self
    }

    pub fn resolver(&self) -> &DefinitionResolver<S, D> {
        &self.resolver
    }

    pub fn policy(&self) -> StalenessPolicy {
        self.policy
    }

    fn check_cancelled(&self) -> Result<()> {
        if self
            .cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
        {
            info!("Sync cancelled");
            return Err(Error::Cancelled);
        }
        Ok(())
    }

    pub fn rollup_status(&self, user_id: &str, now: DateTime<Utc>) -> TableStatus {
        let timestamps = self.rollups.timestamps(user_id);
        TableStatus {
            rows: timestamps.len(),
            oldest: oldest(timestamps.iter().copied()),
            stale: self.policy.is_set_stale(timestamps, now),
        }
    }

    pub fn record_status(&self, user_id: &str, now: DateTime<Utc>) -> TableStatus {
        let timestamps = self.records.timestamps(user_id);
        TableStatus {
            rows: timestamps.len(),
            oldest: oldest(timestamps.iter().copied()),
            stale: self.policy.is_set_stale(timestamps, now),
        }
    }

    /// Classified weapons of a user, from the persisted set when fresh.
    pub fn weapon_rolls(
        &mut self,
        user_id: &str,
        instances: &[WeaponInstance],
        now: DateTime<Utc>,
        force: bool,
    ) -> Result<SyncOutcome<ClassifiedWeapon>> {
        if !force && !self.policy.is_set_stale(self.rollups.timestamps(user_id), now) {
            let values: Vec<ClassifiedWeapon> = self
                .rollups
                .rows(user_id)
                .into_iter()
                .map(|row| {
                    let mut weapon = row.value.clone();
                    weapon.perks = weapon.perks.normalized();
                    weapon
                })
                .collect();
            debug!("Serving {} cached weapon rolls for {}", values.len(), user_id);
            return Ok(SyncOutcome {
                source: SyncSource::Cache,
                values,
            });
        }

        self.check_cancelled()?;
        info!("Classifying {} weapons for {}", instances.len(), user_id);

        let weapon_hashes: Vec<DefinitionHash> = instances.iter().map(|i| i.item_hash).collect();
        let weapons = self.resolver.get_batch(Table::InventoryItem, &weapon_hashes)?;

        let plug_set_hashes: Vec<DefinitionHash> = instances
            .iter()
            .filter_map(|i| weapons.get(&i.item_hash))
            .flat_map(|def| required_plug_sets(def))
            .collect();
        let plug_sets = self.resolver.get_batch(Table::PlugSet, &plug_set_hashes)?;

        let plug_hashes: Vec<DefinitionHash> = instances
            .iter()
            .filter_map(|i| weapons.get(&i.item_hash).map(|def| (i, def)))
            .flat_map(|(i, def)| required_plugs(def, &i.plugs, &plug_sets))
            .collect();
        let plugs = self.resolver.get_batch(Table::InventoryItem, &plug_hashes)?;

        let resolved = ResolvedDefinitions { plugs, plug_sets };
        let mut values = Vec::with_capacity(instances.len());
        for instance in instances {
            self.check_cancelled()?;
            let Some(weapon) = weapons.get(&instance.item_hash) else {
                warn!(
                    "No definition for weapon {} (instance {})",
                    instance.item_hash, instance.item_instance_id
                );
                continue;
            };
            values.push(ClassifiedWeapon {
                item_instance_id: instance.item_instance_id.clone(),
                item_hash: instance.item_hash,
                name: weapon.name().to_string(),
                item_type_display_name: weapon.item_type_display_name.clone(),
                perks: classify(weapon, &instance.plugs, &resolved),
            });
        }

        self.finish_resolution();
        self.rollups.replace_user(
            user_id,
            values
                .iter()
                .map(|w| (w.item_instance_id.clone(), w.without_icons())),
            now,
        )?;
        info!(
            "Stored {} weapon rolls for {} ({})",
            values.len(),
            user_id,
            self.resolver.stats()
        );

        Ok(SyncOutcome {
            source: SyncSource::Live,
            values,
        })
    }

    /// Decoded records of a user, from the persisted set when fresh.
    ///
    /// A set decoded under a different relevance mode is never served.
    pub fn records(
        &mut self,
        user_id: &str,
        profile_records: &BTreeMap<DefinitionHash, RecordInstance>,
        mode: RelevanceMode,
        now: DateTime<Utc>,
        force: bool,
    ) -> Result<SyncOutcome<DecodedRecord>> {
        let same_mode = self
            .records
            .rows(user_id)
            .iter()
            .all(|row| row.value.mode == Some(mode));
        if !same_mode {
            debug!("Persisted records of {} were decoded in another mode", user_id);
        }
        if !force && same_mode && !self.policy.is_set_stale(self.records.timestamps(user_id), now) {
            let values: Vec<DecodedRecord> = self
                .records
                .rows(user_id)
                .into_iter()
                .map(|row| row.value.record.clone())
                .collect();
            debug!("Serving {} cached records for {}", values.len(), user_id);
            return Ok(SyncOutcome {
                source: SyncSource::Cache,
                values,
            });
        }

        self.check_cancelled()?;
        info!(
            "Decoding {} records for {} in {} mode",
            profile_records.len(),
            user_id,
            mode
        );

        let (record_hashes, mut objective_hashes) = required_hashes(profile_records);
        let record_defs = self.resolver.get_batch(Table::Record, &record_hashes)?;
        if mode == RelevanceMode::Discovery {
            objective_hashes.extend(declared_objective_hashes(&record_defs));
        }
        let objective_defs = self.resolver.get_batch(Table::Objective, &objective_hashes)?;

        let mut values = Vec::new();
        for (&hash, instance) in profile_records {
            self.check_cancelled()?;
            if let Some(decoded) =
                decode_record(hash, instance, &record_defs, &objective_defs, &self.filter, mode)
            {
                values.push(decoded);
            }
        }

        self.finish_resolution();
        self.records.replace_user(
            user_id,
            values.iter().map(|r| {
                (
                    r.record_hash.to_string(),
                    PersistedRecord {
                        mode: Some(mode),
                        record: r.clone(),
                    },
                )
            }),
            now,
        )?;
        info!(
            "Stored {} of {} records for {}",
            values.len(),
            profile_records.len(),
            user_id
        );

        Ok(SyncOutcome {
            source: SyncSource::Live,
            values,
        })
    }

    fn finish_resolution(&self) {
        if let Err(e) = self.resolver.flush() {
            warn!("Failed to persist definition cache: {}", e);
        }
    }
}
