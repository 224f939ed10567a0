//! LeGM CLI: the main entry point.
//!
//! Commands:
//! - `analyze`: Analyze a single take and print the verdict as JSON
//! - `bot`: Run the mention/search loops against a replay of posts
//! - `config`: Initialize, show or validate configuration
//! - `doctor`: Diagnose setup

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "legm",
    about = "LeGM — NBA take analysis with receipts",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one take
    Analyze {
        /// The take to analyze
        #[arg(short, long)]
        take: String,

        /// Stats fixture file (overrides stats.fixture_path)
        #[arg(long)]
        stats_fixture: Option<PathBuf>,
    },

    /// Run the bot against a JSON file of posts
    Bot {
        /// JSON array of posts served as mentions and search results
        #[arg(long)]
        replay: PathBuf,

        /// Stats fixture file (overrides stats.fixture_path)
        #[arg(long)]
        stats_fixture: Option<PathBuf>,

        /// Take store file (default ~/.legm/data/legm.json)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Log replies instead of posting them
        #[arg(long)]
        dry_run: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Diagnose configuration, stats source and model access
    Doctor,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default config file if none exists
    Init,
    /// Print the effective configuration with secrets redacted
    Show,
    /// Print the config file path
    Path,
    /// Load and validate the configuration
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    if cli.json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Analyze {
            take,
            stats_fixture,
        } => commands::analyze::run(take, stats_fixture).await?,
        Commands::Bot {
            replay,
            stats_fixture,
            store,
            dry_run,
        } => commands::bot::run(replay, stats_fixture, store, dry_run).await?,
        Commands::Config { action } => match action {
            ConfigAction::Init => commands::config_cmd::init().await?,
            ConfigAction::Show => commands::config_cmd::show().await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
            ConfigAction::Validate => commands::config_cmd::validate().await?,
        },
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
