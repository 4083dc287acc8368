//! CLI argument definitions for armory.

use std::path::PathBuf;

use armory_core::catalog::{DefinitionHash, Table, parse_hash};
use armory_core::record::RelevanceMode;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "armory")]
#[command(about = "Weapon perk classifier and catalyst record tracker", version)]
pub struct Args {
    /// Path to config file
    #[arg(short, long, default_value = "armory.toml")]
    pub config: PathBuf,

    /// Directory holding the definition store and per-user tables
    #[arg(long, value_name = "DIR")]
    pub store_dir: Option<PathBuf>,

    /// Catalog mirror base URL
    #[arg(long, env = "ARMORY_CATALOG_URL")]
    pub catalog_url: Option<String>,

    /// Catalog mirror API key
    #[arg(long, env = "ARMORY_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Hashes per catalog request
    #[arg(long)]
    pub page_size: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Resolve definitions by hash and print them as JSON
    Resolve {
        /// Catalog table (e.g. DestinyInventoryItemDefinition)
        #[arg(value_parser = parse_table)]
        table: Table,
        /// Definition hashes, unsigned or signed
        #[arg(required = true, allow_negative_numbers = true, value_parser = parse_hash)]
        hashes: Vec<DefinitionHash>,
    },
    /// Classify the perks of a single weapon
    Classify {
        /// Weapon item hash
        #[arg(allow_negative_numbers = true, value_parser = parse_hash)]
        weapon: DefinitionHash,
        /// Instance sockets component (JSON) with the live plugs
        #[arg(long, value_name = "FILE")]
        plugs: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Decode catalyst records from a profile records component
    Records {
        /// Profile records component (JSON)
        #[arg(value_name = "FILE")]
        profile: PathBuf,
        /// User the results are persisted under
        #[arg(short, long)]
        user: String,
        /// Relevance mode: strict or discovery
        #[arg(long, default_value = "strict")]
        mode: RelevanceMode,
        /// Recompute even when the persisted set is fresh
        #[arg(long)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Classify every owned weapon of a user
    Sync {
        /// Weapon instances (JSON array)
        #[arg(value_name = "FILE")]
        instances: PathBuf,
        /// User the results are persisted under
        #[arg(short, long)]
        user: String,
        /// Recompute even when the persisted set is fresh
        #[arg(long)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the age of a user's persisted sets
    CacheStatus {
        /// User to inspect
        #[arg(short, long)]
        user: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_table(value: &str) -> armory_core::Result<Table> {
    Table::parse(value)
}
