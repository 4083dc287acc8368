//! HTTP client for a PostgREST-style manifest mirror.
//!
//! Each catalog table is exposed as `{base}/{table}` with rows of
//! `{id, json}`, where `id` is the signed form of the definition hash and
//! `json` is the document, either inline or as a JSON string.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::catalog::{CatalogSource, Definition, DefinitionHash, Table, from_signed_id, to_signed_id};
use crate::config::CatalogConfig;
use crate::error::Result;

#[derive(Debug, Clone, Deserialize)]
pub struct MirrorRow {
    pub id: i64,
    #[serde(default)]
    pub json: Value,
}

impl MirrorRow {
    /// Decode the row, skipping unknown ids and undecodable documents.
    pub fn into_definition(self) -> Option<(DefinitionHash, Definition)> {
        let Some(hash) = from_signed_id(self.id) else {
            warn!("Ignoring mirror row with out-of-range id {}", self.id);
            return None;
        };
        let decoded = match self.json {
            Value::String(text) => serde_json::from_str::<Definition>(&text),
            Value::Null => return None,
            other => serde_json::from_value::<Definition>(other),
        };
        match decoded {
            Ok(def) => Some((hash, def)),
            Err(e) => {
                warn!("Ignoring undecodable definition {}: {}", hash, e);
                None
            }
        }
    }
}

/// Filter value for a PostgREST `in.(...)` query.
pub fn in_filter(hashes: &[DefinitionHash]) -> String {
    let ids: Vec<String> = hashes
        .iter()
        .map(|&hash| to_signed_id(hash).to_string())
        .collect();
    format!("in.({})", ids.join(","))
}

pub struct CatalogClient {
    agent: ureq::Agent,
    base_url: String,
    api_key: String,
}

impl CatalogClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        let agent: ureq::Agent = config.into();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(
            &config.base_url,
            &config.api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn table_url(&self, table: Table) -> String {
        format!("{}/{}", self.base_url, table.name())
    }

    fn query(&self, table: Table, id_filter: &str) -> Result<Vec<MirrorRow>> {
        let url = self.table_url(table);
        debug!("GET {} id={}", url, id_filter);

        let mut request = self
            .agent
            .get(&url)
            .query("select", "id,json")
            .query("id", id_filter);
        if !self.api_key.is_empty() {
            request = request
                .header("apikey", &self.api_key)
                .header("Authorization", &format!("Bearer {}", self.api_key));
        }

        let mut response = request.call()?;
        let rows: Vec<MirrorRow> = response.body_mut().read_json()?;
        Ok(rows)
    }
}

impl CatalogSource for CatalogClient {
    fn fetch(&self, table: Table, hash: DefinitionHash) -> Result<Option<Definition>> {
        let filter = format!("eq.{}", to_signed_id(hash));
        let rows = self.query(table, &filter)?;
        Ok(rows
            .into_iter()
            .filter_map(MirrorRow::into_definition)
            .find(|(found, _)| *found == hash)
            .map(|(_, def)| def))
    }

    fn fetch_batch(
        &self,
        table: Table,
        hashes: &[DefinitionHash],
    ) -> Result<Vec<(DefinitionHash, Definition)>> {
        if hashes.is_empty() {
            return Ok(Vec::new());
        }
        let rows = self.query(table, &in_filter(hashes))?;
        debug!("{} returned {} of {} rows", table, rows.len(), hashes.len());
        Ok(rows
            .into_iter()
            .filter_map(MirrorRow::into_definition)
            .collect())
    }
}
