use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

use super::staleness::CacheEntry;

/// One persisted row, keyed by (user_id, key).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRow<V> {
    pub user_id: String,
    pub key: String,
    pub value: V,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Per-user result table stored as a JSON file.
///
/// A user's rows are only ever replaced as a whole, so a reader sees either
/// the previous set or the new one.
#[derive(Debug)]
pub struct UserTable<V> {
    path: PathBuf,
    rows: Vec<UserRow<V>>,
}

impl<V: Serialize + DeserializeOwned + Clone> UserTable<V> {
    /// Load a table; a missing or malformed file yields an empty table.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let rows = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Vec<UserRow<V>>>(&content) {
                Ok(rows) => rows,
                Err(e) => {
                    warn!("Table {:?} is malformed, starting empty: {}", path, e);
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        debug!("Opened {:?} with {} rows", path, rows.len());
        Self { path, rows }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows(&self, user_id: &str) -> Vec<&UserRow<V>> {
        self.rows.iter().filter(|row| row.user_id == user_id).collect()
    }

    /// Rows of a user as cache entries; rows without a timestamp are skipped.
    pub fn entries(&self, user_id: &str) -> Vec<CacheEntry<V>> {
        self.rows(user_id)
            .into_iter()
            .filter_map(|row| {
                row.last_updated
                    .map(|fetched_at| CacheEntry::new(row.value.clone(), fetched_at))
            })
            .collect()
    }

    pub fn timestamps(&self, user_id: &str) -> Vec<Option<DateTime<Utc>>> {
        self.rows(user_id).iter().map(|row| row.last_updated).collect()
    }

    /// Delete every row of the user, insert the new set and write the file.
    pub fn replace_user(
        &mut self,
        user_id: &str,
        values: impl IntoIterator<Item = (String, V)>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let mut rows: Vec<UserRow<V>> = self
            .rows
            .iter()
            .filter(|row| row.user_id != user_id)
            .cloned()
            .collect();
        let before = rows.len();
        rows.extend(values.into_iter().map(|(key, value)| UserRow {
            user_id: user_id.to_string(),
            key,
            value,
            last_updated: Some(now),
        }));
        debug!("Replacing rows of {} with {} rows", user_id, rows.len() - before);

        self.write(&rows)?;
        self.rows = rows;
        Ok(())
    }

    pub fn users(&self) -> Vec<&str> {
        let mut users: Vec<&str> = self.rows.iter().map(|row| row.user_id.as_str()).collect();
        users.sort_unstable();
        users.dedup();
        users
    }

    fn write(&self, rows: &[UserRow<V>]) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(rows)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
