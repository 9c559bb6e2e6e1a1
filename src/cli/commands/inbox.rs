//! Inbox command implementation.

use crate::core::scanner::{detect_disk_format, scan_inbox};
use anyhow::Result;
use colored::Colorize;
use std::path::Path;

/// List raw backups waiting in the inbox.
pub async fn list(import_dir: &Path) -> Result<()> {
    println!("{} {}", "[Inbox]".bold().cyan(), import_dir.display());
    println!();

    let dir = import_dir.to_path_buf();
    let sources = tokio::task::spawn_blocking(move || scan_inbox(&dir)).await??;

    if sources.is_empty() {
        println!("Nothing to import.");
        return Ok(());
    }

    println!(
        "{:<40} {:>10}  {}",
        "Source".bold(),
        "Size".bold(),
        "Detected format".bold()
    );
    println!("{}", "-".repeat(70));

    for source in &sources {
        let detected = detect_disk_format(&source.path)
            .map(|f| format!("{} (--format {})", f.label(), f.selector()))
            .unwrap_or_else(|| "unknown".to_string());
        println!(
            "{:<40} {:>7.1} GB  {}",
            source.name,
            source.size_gb(),
            detected
        );
    }

    Ok(())
}
