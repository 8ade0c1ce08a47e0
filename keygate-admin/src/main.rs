//! keygate administration CLI
//!
//! Usage:
//!   keygate-admin --config keygate.toml --as 777857263548497920 create alice s3cret 2030-01-01
//!   keygate-admin --as 777857263548497920 list
//!   keygate-admin verify alice s3cret --hwid "$(keygate-admin fingerprint)"

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use keygate_admin::{open_store, run, AppConfig, Command};
use keygate_service::{CallerId, CredentialService, ServiceConfig};
use keygate_store::{DocumentStore, MemoryStore};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "keygate-admin")]
#[command(about = "Manage keygate license credentials")]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "keygate.toml")]
    config: PathBuf,

    /// Administrator id to act as
    #[arg(long = "as", value_name = "ADMIN_ID", default_value_t = 0)]
    caller: u64,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let (store, service_config) = if args.command.needs_store() {
        let config = AppConfig::load(&args.config)?;
        debug!(?config, "configuration loaded");
        (open_store(&config.store)?, config.service)
    } else {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        (store, ServiceConfig::default())
    };

    let service = CredentialService::new(store, service_config);
    info!(caller = args.caller, "running command");

    let outcome = run(&service, CallerId(args.caller), args.command).await;
    println!("{}", outcome.message);
    if !outcome.ok {
        std::process::exit(1);
    }
    Ok(())
}
