//! Configuration.
//!
//! This module contains:
//! - `Config` - runtime settings loaded from a TOML file
//! - Catalog paging, cache lifetime and retry constants

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::DefinitionHash;
use crate::error::Result;

/// Remote catalog request configuration.
pub mod catalog {
    use std::time::Duration;

    /// Maximum number of hashes per batch request.
    pub const PAGE_SIZE: usize = 100;

    /// Global timeout for a single catalog request.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Base URL used when none is configured.
    pub const DEFAULT_BASE_URL: &str = "http://localhost:54321/rest/v1";

    /// Prefix for reconstructing full icon URLs from icon paths.
    pub const ICON_BASE_URL: &str = "https://www.bungie.net";
}

/// Persisted result lifetime.
pub mod cache {
    /// Per-user result sets older than this are re-fetched.
    pub const TTL_HOURS: i64 = 24;

    /// Directory name under the platform cache directory.
    pub const STORE_DIR_NAME: &str = "armory";
}

/// Transient fetch retry configuration.
///
/// Exponential backoff: 1s → 2s → 4s = total ~7s max, used by callers
/// that wrap a catalog source. The resolver itself never retries.
pub mod retry {
    /// Maximum number of attempts for one catalog request.
    pub const MAX_FETCH_ATTEMPTS: u32 = 3;

    /// Delay (in ms) after each failed attempt.
    pub const RETRY_DELAYS_MS: [u64; 3] = [1000, 2000, 4000];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    pub api_key: String,
    pub page_size: usize,
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: catalog::DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            page_size: catalog::PAGE_SIZE,
            timeout_secs: catalog::REQUEST_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_hours: i64,
    /// Store directory; `None` uses the platform cache directory
    pub store_dir: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_hours: cache::TTL_HOURS,
            store_dir: None,
        }
    }
}

impl CacheConfig {
    /// Resolve the directory holding the definition and rollup stores
    pub fn resolved_store_dir(&self) -> PathBuf {
        if let Some(dir) = &self.store_dir {
            return dir.clone();
        }
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(cache::STORE_DIR_NAME)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordsConfig {
    /// Name marker identifying tracked records (case-sensitive)
    pub name_marker: String,
    /// Keywords scanned in descriptions and objective text in discovery mode
    pub keywords: Vec<String>,
    /// Records tracked regardless of their name
    pub known_hashes: Vec<DefinitionHash>,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            name_marker: "Catalyst".to_string(),
            keywords: [
                "weapon catalyst",
                "catalyst for",
                "masterwork the",
                "exotic catalyst",
                "catalyst objectives",
            ]
            .iter()
            .map(|k| k.to_string())
            .collect(),
            known_hashes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub cache: CacheConfig,
    pub records: RecordsConfig,
}

impl Config {
    /// Load config from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse config from TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config.sanitized())
    }

    /// Load config, falling back to defaults when the file is missing or invalid
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {:?}: {}, using defaults",
                    path.as_ref(),
                    e
                );
                Self::default()
            }
        }
    }

    fn sanitized(mut self) -> Self {
        if self.catalog.page_size == 0 {
            warn!(
                "catalog.page_size must be positive, using {}",
                catalog::PAGE_SIZE
            );
            self.catalog.page_size = catalog::PAGE_SIZE;
        }
        if self.cache.ttl_hours < 0 {
            warn!("cache.ttl_hours must not be negative, using {}", cache::TTL_HOURS);
            self.cache.ttl_hours = cache::TTL_HOURS;
        }
        self
    }
}
