use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tctx_cli::commands::{add, current, delete, list, preview, update, util};
use tctx_cli::{Cli, Commands, Config, Zone};
use tctx_store::ContextStore;

/// Open the contexts file named by the config, seeding it on first use.
fn open_store(config: &Config) -> Result<ContextStore> {
    ContextStore::open(&config.contexts_path)
        .with_context(|| format!("failed to open {}", config.contexts_path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so --json output stays parseable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let zone: Zone = cli
        .timezone
        .as_deref()
        .unwrap_or(&config.timezone)
        .parse()?;

    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Some(Commands::Current { json }) => {
            let mut store = open_store(&config)?;
            current::run(&mut stdout, &mut store, zone.now(), *json)?;
        }
        Some(Commands::Preview { at, json }) => {
            let store = open_store(&config)?;
            let now = zone.now();
            let at = match at {
                Some(at) => util::parse_datetime(at, zone, now)?,
                None => now,
            };
            preview::run(&mut stdout, &store, at, zone, *json)?;
        }
        Some(Commands::Add(args)) => {
            let mut store = open_store(&config)?;
            add::run(&mut stdout, &mut store, args, Utc::now())?;
        }
        Some(Commands::List(args)) => {
            let store = open_store(&config)?;
            list::run(&mut stdout, &store, args, zone.now())?;
        }
        Some(Commands::Update(args)) => {
            let mut store = open_store(&config)?;
            update::run(&mut stdout, &mut store, args)?;
        }
        Some(Commands::Delete { id }) => {
            let mut store = open_store(&config)?;
            delete::run(&mut stdout, &mut store, id)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
