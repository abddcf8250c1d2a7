use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ynab_splitwise_sync::cli::{handle_config_command, handle_status_command, handle_sync_command};
use ynab_splitwise_sync::config::{Credentials, Settings, SyncPaths};

#[derive(Parser)]
#[command(
    name = "ynab-splitwise-sync",
    version,
    about = "Sync shared YNAB transactions into Splitwise",
    long_about = "Creates an equally-split Splitwise expense for every cleared YNAB \
                  outflow in the shared category group (or tagged in its memo) \
                  since the last successful sync."
)]
struct Cli {
    /// Print the expenses that would be created without calling Splitwise
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a sync pass (the default)
    Sync,

    /// Show the last sync date and stored state
    Status,

    /// Show configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ynab_splitwise_sync=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // A .env file is optional; real environment variables take precedence
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            tracing::warn!(error = %e, "could not load .env file");
        }
    }

    let paths = SyncPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command.unwrap_or(Commands::Sync) {
        Commands::Sync => {
            let credentials = Credentials::from_env()?;
            handle_sync_command(&paths, &settings, credentials, cli.dry_run)?;
        }
        Commands::Status => handle_status_command(&paths)?,
        Commands::Config => handle_config_command(&paths, &settings)?,
    }

    Ok(())
}
