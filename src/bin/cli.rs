//! Debtor crawler CLI
//!
//! Selects one of the six registry variants and runs either an incremental
//! crawl-and-reap cycle or a full shadow-swap replacement.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use debtor_crawler::{
    config::Config,
    error::{AppError, Result},
    models::Variant,
    pipeline,
    storage::DebtorStore,
    utils::http::{self, Fetcher},
};

/// Insolvency registry debtor crawler
#[derive(Parser, Debug)]
#[command(
    name = "debtor-crawler",
    version,
    about = "Crawls the public insolvency registry debtor lists into PostgreSQL"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl one variant incrementally, then reap rows it did not touch
    Crawl {
        /// Registry variant to crawl (1..=6)
        #[arg(short = 't', long)]
        type_id: u8,
    },

    /// Replace one variant's dataset through an atomic shadow-table swap
    Swap {
        /// Registry variant to crawl (1..=6)
        #[arg(short = 't', long)]
        type_id: u8,
    },

    /// Create tables and seed the variant reference rows
    Init,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging; run commands append to a per-variant log file when
/// `log_dir` is configured, everything else goes to stderr.
fn init_logging(verbose: bool, config: &Config, type_id: Option<u8>) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level));
    builder.format_timestamp_secs();

    if let (Some(dir), Some(id)) = (&config.log_dir, type_id) {
        std::fs::create_dir_all(dir)?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(format!("type_{id}.log")))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

fn resolve_variant(type_id: u8) -> Result<Variant> {
    Variant::from_id(type_id)
        .ok_or_else(|| AppError::config(format!("type_id must be 1..=6, got {type_id}")))
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_or_default(&cli.config);

    let type_id = match &cli.command {
        Command::Crawl { type_id } | Command::Swap { type_id } => Some(*type_id),
        Command::Init | Command::Validate => None,
    };
    init_logging(cli.verbose, &config, type_id)?;

    match cli.command {
        Command::Validate => {
            config.validate()?;
            log::info!("configuration OK");
            log::info!("  base_url: {}", config.crawler.base_url);
            log::info!("  table: {}", config.database.table);
            log::info!("  page_size: {}", config.crawler.page_size);
        }

        Command::Init => {
            config.validate()?;
            let store = DebtorStore::connect(&config.database).await?;
            store.init_schema(&config.database.table).await?;
            log::info!("schema ready, reference rows seeded");
        }

        Command::Crawl { type_id } => {
            let variant = resolve_variant(type_id)?;
            config.validate()?;

            let store = DebtorStore::connect(&config.database).await?;
            let proxy = http::acquire_proxy(&config.proxy).await;
            let fetcher = Fetcher::new(&config.crawler, &config.http, proxy.as_ref())?;

            let run = pipeline::run_crawl(&config, &store, &fetcher, variant).await?;

            log::info!("{}", "*".repeat(30));
            log::info!("finished with state: {}", run.state_line());
            log::info!("{}", "*".repeat(30));
        }

        Command::Swap { type_id } => {
            let variant = resolve_variant(type_id)?;
            config.validate()?;

            let store = DebtorStore::connect(&config.database).await?;
            let proxy = http::acquire_proxy(&config.proxy).await;
            let fetcher = Fetcher::new(&config.crawler, &config.http, proxy.as_ref())?;

            let run = pipeline::run_swap(&config, &store, &fetcher, variant).await?;

            log::info!("{}", "*".repeat(30));
            log::info!("swap finished with state: {}", run.state_line());
            log::info!("{}", "*".repeat(30));
        }
    }

    Ok(())
}
