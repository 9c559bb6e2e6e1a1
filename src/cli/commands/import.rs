//! Import command implementation.
//!
//! Walks one import session through every workflow step, shows the
//! destination, and executes the move.

use crate::cli::args::ImportArgs;
use crate::core::executor;
use crate::core::scanner::Catalog;
use crate::core::store::SessionStore;
use crate::core::workflow;
use crate::models::config::Config;
use crate::services::tmdb::{self, TmdbClient};
use anyhow::{Context, Result};
use colored::Colorize;

/// Run the import workflow for one inbox entry.
pub async fn import(config: &Config, store: &SessionStore, args: ImportArgs) -> Result<()> {
    let import_dir = config
        .import_dir
        .as_deref()
        .ok_or(crate::Error::ImportDirMissing)?;

    println!("{}", "[IMPORT] Preparing import...".bold().cyan());

    let session = workflow::start(import_dir, &args.source)?;
    println!("  {} {}", "Source:".bold(), session.source.path.display());
    println!("  {} {:.1} GB", "Size:".bold(), session.source.size_gb());
    if let Some(ref detected) = session.detected_format {
        println!("  {} {}", "Detected format:".bold(), detected);
    }

    let id = store.create(session);
    let result = run_steps(config, store, &id, &args).await;
    if result.is_err() || args.dry_run {
        store.delete(&id);
    }
    result
}

async fn run_steps(config: &Config, store: &SessionStore, id: &str, args: &ImportArgs) -> Result<()> {
    let media_dir = config.media_dir.as_path();

    let kind = store.update(id, |s| {
        workflow::choose_kind(s, &args.kind)?;
        Ok(s.kind)
    })?;

    match (&args.tmdb_id, kind) {
        (Some(tmdb_id), Some(kind)) => {
            let client = TmdbClient::from_config(&config.tmdb)?;
            let identity = client
                .lookup(kind, tmdb_id)
                .await
                .with_context(|| format!("TMDB lookup for {} failed", tmdb_id))?;
            println!(
                "  {} {} ({})",
                "TMDB:".bold(),
                identity.title,
                if identity.year > 0 { identity.year.to_string() } else { "no year".to_string() }
            );
            if let Some(year) = args.year.as_deref() {
                // Manual year is only used when TMDB has none.
                store.update(id, |s| {
                    workflow::enter_identity(s, args.title.as_deref().unwrap_or(&identity.title), Some(year))
                })?;
            }
            store.update(id, |s| workflow::apply_provider_identity(s, identity))?;
        }
        _ => {
            let title = args.title.as_deref().unwrap_or_default();
            store.update(id, |s| workflow::enter_identity(s, title, args.year.as_deref()))?;
        }
    }

    store.update(id, |s| {
        workflow::choose_disk(
            s,
            args.series.as_deref(),
            args.disk.as_deref(),
            &args.format,
            args.custom_format.as_deref(),
        )
    })?;

    let catalog = {
        let root = media_dir.to_path_buf();
        tokio::task::spawn_blocking(move || Catalog::scan(&root)).await??
    };
    let (placement, slug) = match args.existing.as_deref() {
        Some(slug) => ("existing", Some(slug)),
        None => ("new", None),
    };
    store.update(id, |s| workflow::choose_placement(s, placement, slug, &catalog))?;

    let session = store
        .get(id)
        .ok_or_else(|| crate::Error::SessionNotFound(id.to_string()))?;
    let destination = workflow::destination(&session, media_dir)?;
    println!();
    println!("  {} {}", "Destination:".bold(), destination.disk_dir.display().to_string().green());
    println!();

    if args.dry_run {
        println!("{}", "[DRY RUN] Nothing was moved.".yellow());
        return Ok(());
    }

    let outcome = executor::execute_stored(store, id, media_dir)?;
    println!("{} {}", "[OK] Imported to".bold().green(), outcome.disk_dir.display());
    for warning in &outcome.warnings {
        println!("{} {}", "[WARN]".yellow(), warning);
    }

    if let Some(identity) = session.provider.as_ref() {
        match tmdb::save_metadata(&outcome.title_dir, identity) {
            Ok(written) => tracing::debug!("Saved {} metadata files", written.len()),
            Err(e) => println!("{} Failed to save metadata: {}", "[WARN]".yellow(), e),
        }
        if let (Some(poster), Ok(client)) = (
            identity.poster_path.as_deref(),
            TmdbClient::from_config(&config.tmdb),
        ) {
            if let Err(e) = client.download_poster(poster, &outcome.title_dir).await {
                println!("{} Failed to download poster: {}", "[WARN]".yellow(), e);
            }
        }
    }

    Ok(())
}
