use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::{Parser, Subcommand};
use gatecast_config::DEFAULT_STORE_PATH;
use gatecast_contracts::clock::{Clock, SystemClock};
use gatecast_core::storage::MemoryStore;
use gatecast_model::ClientId;
use gatecastctl::{
    BlockStoreLocation, CheckOptions, ClearScope, SimulateOptions,
    clear_blocks, list_blocks, render_blocks, render_check, run_config_check,
    run_simulation,
};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "gatecastctl",
    version,
    about = "Gatecast funnel checker and headless simulator"
)]
struct Cli {
    /// Env file read before the configuration is resolved
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the funnel configuration and run its guard rails
    Check {
        /// TOML or JSON funnel file; otherwise GATECAST_CONFIG_PATH,
        /// GATECAST_CONFIG_JSON, a default file or the built-in funnel
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Run the funnel headless with simulated players
    Simulate {
        #[arg(long)]
        config: Option<PathBuf>,
        /// Visitor identity (defaults to a random 192.168.1.x address)
        #[arg(long)]
        client: Option<ClientId>,
        /// Seconds (or a humantime span) before the visitor presses a
        /// revealed call-to-action; never pressed when left out
        #[arg(long, value_parser = parse_delay)]
        activate_after: Option<Duration>,
        /// Simulated seconds per wall-clock second
        #[arg(long, default_value_t = 1.0)]
        speed: f64,
        /// Simulated time per tick
        #[arg(long, value_parser = parse_delay, default_value = "250ms")]
        tick: Duration,
        /// Length used for players that do not know their duration
        #[arg(long, value_parser = parse_delay, default_value = "30s")]
        fallback: Duration,
        /// Give up after this much simulated time
        #[arg(long, value_parser = parse_delay, default_value = "1h")]
        limit: Duration,
        /// Block store file; defaults to storage.path from the configuration
        #[arg(long, conflicts_with = "memory_store")]
        store: Option<PathBuf>,
        /// Keep access blocks in memory for this run only
        #[arg(long)]
        memory_store: bool,
        /// Visit from an in-app browser, starting on the funnel's notice
        #[arg(long)]
        in_app_browser: bool,
    },
    /// Inspect or clear access blocks
    Blocks {
        #[command(subcommand)]
        action: BlocksAction,
    },
}

#[derive(Subcommand)]
enum BlocksAction {
    /// List every access block in the store
    List {
        #[arg(long, default_value = DEFAULT_STORE_PATH)]
        store: PathBuf,
    },
    /// Remove access blocks (all of them unless narrowed down)
    Clear {
        #[arg(long, default_value = DEFAULT_STORE_PATH)]
        store: PathBuf,
        /// Only this visitor's block
        #[arg(long, conflicts_with = "expired")]
        client: Option<ClientId>,
        /// Only blocks that have already lapsed
        #[arg(long)]
        expired: bool,
    },
}

fn parse_delay(raw: &str) -> Result<Duration, String> {
    let raw = raw.trim();
    if let Ok(secs) = raw.parse::<f64>() {
        return Duration::try_from_secs_f64(secs).map_err(|err| err.to_string());
    }
    humantime::parse_duration(raw).map_err(|err| err.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Check { config } => {
            let load = run_config_check(&CheckOptions {
                config_path: config,
                env_file: cli.env_file,
            })?;
            print!("{}", render_check(&load));
        }
        Command::Simulate {
            config,
            client,
            activate_after,
            speed,
            tick,
            fallback,
            limit,
            store,
            memory_store,
            in_app_browser,
        } => {
            let load = run_config_check(&CheckOptions {
                config_path: config,
                env_file: cli.env_file,
            })?;
            for warning in &load.warnings.items {
                warn!(hint = ?warning.hint, "{}", warning.message);
            }

            let location = if memory_store {
                BlockStoreLocation::Memory(MemoryStore::new())
            } else {
                BlockStoreLocation::File(
                    store.unwrap_or_else(|| load.config.storage.path.clone()),
                )
            };
            let options = SimulateOptions {
                client,
                activate_after,
                speed,
                tick,
                fallback,
                limit,
                in_app_browser,
            };

            let report =
                run_simulation(&load.definition, location, &options).await?;
            println!("client: {}", report.client);
            println!(
                "simulated: {}",
                humantime::format_duration(report.elapsed)
            );
            println!("outcome: {}", report.outcome);
        }
        Command::Blocks { action } => match action {
            BlocksAction::List { store } => {
                let blocks = list_blocks(&store)?;
                print!("{}", render_blocks(&blocks, SystemClock.now()));
            }
            BlocksAction::Clear {
                store,
                client,
                expired,
            } => {
                let scope = match (client, expired) {
                    (Some(client), _) => ClearScope::Client(client),
                    (None, true) => ClearScope::Expired,
                    (None, false) => ClearScope::All,
                };
                let removed = clear_blocks(&store, &scope, SystemClock.now())?;
                println!("removed {removed} access block(s)");
            }
        },
    }

    Ok(())
}
