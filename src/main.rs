//! Shelf CLI
//!
//! Catalogs a directory of disk backups and imports new raw backups into it.

use clap::Parser;
use shelf::cli::{
    args::{Cli, Commands},
    commands::{import, inbox, scan},
};
use shelf::core::store::SessionStore;
use shelf::models::config::{load_config, Config};
use shelf::preflight;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let mut config = load_config();
    if let Some(media_dir) = cli.media_dir {
        config.media_dir = media_dir;
    }
    if let Some(import_dir) = cli.import_dir {
        config.import_dir = Some(import_dir);
    }
    tracing::debug!("Using media dir {:?}, import dir {:?}", config.media_dir, config.import_dir);

    // Run the appropriate command
    match cli.command {
        Commands::Scan { details, json } => {
            scan::scan(&config.media_dir, &config.play_url_prefix, details, json).await?;
        }

        Commands::Inbox => {
            let import_dir = config
                .import_dir
                .as_deref()
                .ok_or(shelf::Error::ImportDirMissing)?;
            inbox::list(import_dir).await?;
        }

        Commands::Import(args) => {
            if !cli.skip_preflight {
                run_preflight_checks(&config).await?;
            }

            let store = SessionStore::new();
            import::import(&config, &store, args).await?;
        }
    }

    Ok(())
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("shelf=debug")
    } else {
        EnvFilter::new("shelf=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

/// Run preflight checks and exit if any fail.
async fn run_preflight_checks(config: &Config) -> anyhow::Result<()> {
    use colored::Colorize;

    println!("{}", "Running preflight checks...".bold());
    println!();

    let results = preflight::run_preflight_checks(config).await;
    preflight::print_results(&results);

    println!();

    if !preflight::all_passed(&results) {
        anyhow::bail!("Preflight checks failed. Fix the issues above and try again.");
    }

    Ok(())
}
