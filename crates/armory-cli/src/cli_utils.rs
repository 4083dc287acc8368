//! Common CLI utility functions shared across commands.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use armory_core::{
    CatalogClient, Config, DefinitionResolver, ExponentialBackoff, FileDefinitionStore,
    RecordFilter, RetryingSource, StalenessPolicy, SyncPipeline,
};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::cli::Args;

pub type RemoteSource = RetryingSource<CatalogClient, ExponentialBackoff>;
pub type RemoteResolver = DefinitionResolver<RemoteSource, FileDefinitionStore>;

/// Config file merged with command-line overrides.
pub struct Settings {
    pub config: Config,
    pub store_dir: PathBuf,
}

impl Settings {
    pub fn from_args(args: &Args) -> Self {
        let mut config = if args.config.exists() {
            Config::load_or_default(&args.config)
        } else {
            debug!("No config at {:?}, using defaults", args.config);
            Config::default()
        };

        if let Some(url) = &args.catalog_url {
            config.catalog.base_url = url.clone();
        }
        if let Some(key) = &args.api_key {
            config.catalog.api_key = key.clone();
        }
        if let Some(page_size) = args.page_size {
            config.catalog.page_size = page_size.max(1);
        }

        let store_dir = args
            .store_dir
            .clone()
            .unwrap_or_else(|| config.cache.resolved_store_dir());

        Self { config, store_dir }
    }

    /// Remote resolver over the on-disk definition store, stopped by `cancel`.
    pub fn resolver(&self, cancel: Arc<AtomicBool>) -> RemoteResolver {
        let client = CatalogClient::from_config(&self.config.catalog);
        info!("Catalog: {}", client.base_url());
        DefinitionResolver::new(
            RetryingSource::new(client, ExponentialBackoff::new()),
            FileDefinitionStore::in_dir(&self.store_dir),
        )
        .with_page_size(self.config.catalog.page_size)
        .with_cancel_flag(cancel)
    }

    pub fn pipeline(
        &self,
        cancel: Arc<AtomicBool>,
    ) -> SyncPipeline<RemoteSource, FileDefinitionStore> {
        SyncPipeline::open_in(self.resolver(Arc::clone(&cancel)), &self.store_dir)
            .with_policy(StalenessPolicy::from_hours(self.config.cache.ttl_hours))
            .with_filter(RecordFilter::from_config(&self.config.records))
            .with_cancel_flag(cancel)
    }
}

/// Read and deserialize a JSON input file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Install a Ctrl+C handler that raises the returned flag.
pub fn cancel_on_ctrlc() -> Result<Arc<AtomicBool>> {
    let cancel = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&cancel);
    ctrlc::set_handler(move || {
        eprintln!("\nCancelling...");
        handler_flag.store(true, Ordering::SeqCst);
    })
    .context("Failed to install Ctrl+C handler")?;
    Ok(cancel)
}

/// Persist newly resolved definitions, logging instead of failing.
pub fn flush_store(resolver: &RemoteResolver) {
    if let Err(e) = resolver.flush() {
        warn!("Failed to persist definition cache: {}", e);
    }
}
