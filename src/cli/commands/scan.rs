//! Scan command implementation.

use crate::core::scanner::Catalog;
use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Scan the archive and print its titles.
pub async fn scan(media_dir: &Path, play_url_prefix: &str, details: bool, json: bool) -> Result<()> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Scanning {} (new disks are measured)...", media_dir.display()));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let media_dir = media_dir.to_path_buf();
    let catalog = tokio::task::spawn_blocking(move || Catalog::scan(&media_dir)).await??;
    pb.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(catalog.titles())?);
        return Ok(());
    }

    println!("{}", "[Catalog]".bold().cyan());
    println!(
        "{:<40} {:<6} {:<6} {:>10}  {}",
        "Slug".bold(),
        "Kind".bold(),
        "Disks".bold(),
        "Size".bold(),
        "Title".bold()
    );
    println!("{}", "-".repeat(90));

    for title in catalog.titles() {
        let size_gb = title.total_size() as f64 / (1024.0 * 1024.0 * 1024.0);
        println!(
            "{:<40} {:<6} {:<6} {:>7.1} GB  {}",
            title.slug(),
            title.kind.to_string(),
            title.disks.len(),
            size_gb,
            title.display_title()
        );

        if details {
            for disk in &title.disks {
                println!(
                    "    {} [{}] {:.1} GB",
                    disk.name,
                    disk.format,
                    disk.size_gb()
                );
                println!("      {}", disk.vlc_command(play_url_prefix).dimmed());
                println!("      {}", disk.mpv_command(play_url_prefix).dimmed());
            }
        }
    }

    println!();
    println!("{} {}", "Titles:".bold(), catalog.titles().len());

    for (slug, paths) in catalog.slug_collisions() {
        println!(
            "{} slug '{}' is shared by: {}",
            "[WARN]".yellow(),
            slug,
            paths.join(", ")
        );
    }

    Ok(())
}
