use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rentdesk::pages;
use rentdesk_data::{BackendConfig, Repositories};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rentdesk")]
#[command(version)]
#[command(about = "Front desk for an equipment-rental business", long_about = None)]
struct Cli {
    /// Backend configuration file (TOML). Without it, settings come from
    /// RENTDESK_* environment variables only.
    #[arg(long, short, env = "RENTDESK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add equipment to the inventory
    Inventory,
    /// Register a client, or edit one with --id
    Client {
        #[arg(long)]
        id: Option<i64>,
    },
    /// Register a rental, or edit one with --id
    Rental {
        #[arg(long)]
        id: Option<i64>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => BackendConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => BackendConfig::from_env().context("reading configuration from the environment")?,
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting the async runtime")?;
    let repos = Repositories::connect(&config)?;

    let saved = match cli.command {
        Command::Inventory => pages::inventory::open(&runtime, repos)?,
        Command::Client { id } => pages::client::open(&runtime, repos, id)?,
        Command::Rental { id } => pages::rental::open(&runtime, repos, id)?,
    };

    if let Some(message) = saved {
        println!("{message}");
    }
    Ok(())
}
