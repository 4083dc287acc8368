use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::cache as cache_config;

/// A value with the time it was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub value: T,
    pub fetched_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T, fetched_at: DateTime<Utc>) -> Self {
        Self { value, fetched_at }
    }
}

pub fn is_stale(fetched_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    now - fetched_at > ttl
}

/// Time-to-live policy for persisted per-user result sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StalenessPolicy {
    ttl: Duration,
}

impl Default for StalenessPolicy {
    fn default() -> Self {
        Self::from_hours(cache_config::TTL_HOURS)
    }
}

impl StalenessPolicy {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    pub fn from_hours(hours: i64) -> Self {
        Self::new(Duration::hours(hours))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn is_stale(&self, fetched_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        is_stale(fetched_at, now, self.ttl)
    }

    pub fn entry_is_stale<T>(&self, entry: &CacheEntry<T>, now: DateTime<Utc>) -> bool {
        self.is_stale(entry.fetched_at, now)
    }

    /// Judge a whole set by its oldest member.
    ///
    /// An empty set, or any member without a timestamp, is stale.
    pub fn is_set_stale<I>(&self, timestamps: I, now: DateTime<Utc>) -> bool
    where
        I: IntoIterator<Item = Option<DateTime<Utc>>>,
    {
        match oldest(timestamps) {
            Some(oldest) => self.is_stale(oldest, now),
            None => true,
        }
    }
}

/// Oldest timestamp of a set; `None` when empty or any member lacks one.
pub fn oldest<I>(timestamps: I) -> Option<DateTime<Utc>>
where
    I: IntoIterator<Item = Option<DateTime<Utc>>>,
{
    let mut oldest: Option<DateTime<Utc>> = None;
    for timestamp in timestamps {
        let timestamp = timestamp?;
        oldest = Some(match oldest {
            Some(current) if current <= timestamp => current,
            _ => timestamp,
        });
    }
    oldest
}
