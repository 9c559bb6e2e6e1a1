//! Command line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Shelf - Manage a disk-backup media archive
#[derive(Parser, Debug)]
#[command(name = "shelf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip preflight checks
    #[arg(long, global = true)]
    pub skip_preflight: bool,

    /// Archive root (overrides MEDIA_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    pub media_dir: Option<PathBuf>,

    /// Inbox of raw disk backups (overrides IMPORT_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    pub import_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan the archive and list titles
    Scan {
        /// Show disk paths and player commands
        #[arg(long)]
        details: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List raw backups waiting in the inbox
    Inbox,

    /// Import a raw backup from the inbox into the archive
    Import(ImportArgs),
}

/// Arguments for the import workflow.
#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// Directory name inside the inbox
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Media kind: film or tv
    #[arg(short, long)]
    pub kind: String,

    /// Title (ignored when --tmdb-id is given)
    #[arg(short, long, required_unless_present = "tmdb_id")]
    pub title: Option<String>,

    /// Release year (films only)
    #[arg(short, long)]
    pub year: Option<String>,

    /// Look up title and year on TMDB
    #[arg(long)]
    pub tmdb_id: Option<String>,

    /// Series number (TV only)
    #[arg(long)]
    pub series: Option<String>,

    /// Disk number within the series (TV only)
    #[arg(long)]
    pub disk: Option<String>,

    /// Disk format: bluray, bluray_uhd, dvd or custom
    #[arg(short, long)]
    pub format: String,

    /// Format text when --format custom
    #[arg(long)]
    pub custom_format: Option<String>,

    /// Append to the existing title with this slug instead of creating one
    #[arg(long, value_name = "SLUG")]
    pub existing: Option<String>,

    /// Dry run - show the destination without moving anything
    #[arg(long)]
    pub dry_run: bool,
}
