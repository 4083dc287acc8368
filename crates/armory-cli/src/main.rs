mod cli;
mod cli_utils;
mod commands;
mod console;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so JSON output stays clean
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("armory=info,armory_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let settings = cli_utils::Settings::from_args(&args);

    match args.command {
        Command::Resolve { table, hashes } => commands::resolve::run(&settings, table, &hashes),
        Command::Classify { weapon, plugs, json } => {
            commands::classify::run(&settings, weapon, plugs.as_deref(), json)
        }
        Command::Records {
            profile,
            user,
            mode,
            force,
            json,
        } => commands::records::run(&settings, &profile, &user, mode, force, json),
        Command::Sync {
            instances,
            user,
            force,
            json,
        } => commands::sync::run(&settings, &instances, &user, force, json),
        Command::CacheStatus { user, json } => commands::cache_status::run(&settings, &user, json),
    }
}
